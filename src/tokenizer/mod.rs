use jieba_rs::Jieba;
use tokio::sync::OnceCell;
use tracing::{info, trace};

use crate::{
    config::SegmenterConfig,
    error::{Error, Result},
};

pub mod detect;
pub mod dictionary;
mod latin;
mod script;
mod stopwords;

pub use detect::{
    LanguageDetector, LanguageFamily, LanguageScore, MIN_DETECT_LEN, ScriptDetector, classify,
    detect_family,
};
pub use dictionary::{DictionaryTrainingConfig, JapaneseSegmenter, ScriptDictionary};
pub use latin::{is_filler, tokenize_latin};
pub use script::{SegmentScript, classify_script, script_runs};
pub use stopwords::Stopwords;

/// Splits a span of text into candidate tokens. Implementations may return blanks and
/// punctuation; [`Segmenter`] filters them.
pub trait WordSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<String>>;
}

/// Chinese segmentation in jieba's search mode, which also emits the shorter words
/// contained in each longest match.
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    /// Loads the bundled jieba dictionary; this takes a noticeable amount of CPU.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSegmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .jieba
            .cut_for_search(text, true)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Language-aware tokenizer: classify, dispatch to a family segmenter, then drop
/// punctuation/symbol/whitespace-only tokens and stopwords and sort by code point.
pub struct Segmenter {
    detector: Box<dyn LanguageDetector>,
    chinese: Box<dyn WordSegmenter>,
    japanese: Box<dyn WordSegmenter>,
    stopwords: Stopwords,
    min_detect_len: usize,
}

impl Segmenter {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            detector: Box::new(ScriptDetector),
            chinese: Box::new(JiebaSegmenter::new()),
            japanese: Box::new(JapaneseSegmenter::new(config.japanese_dictionary.clone())),
            stopwords: Stopwords::with_extra(&config.extra_stopwords),
            min_detect_len: config.min_detect_len,
        }
    }

    pub fn with_detector<D>(mut self, detector: D) -> Self
    where
        D: LanguageDetector + 'static,
    {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_chinese_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: WordSegmenter + 'static,
    {
        self.chinese = Box::new(segmenter);
        self
    }

    pub fn with_japanese_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: WordSegmenter + 'static,
    {
        self.japanese = Box::new(segmenter);
        self
    }

    pub fn with_stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn family(&self, text: &str) -> LanguageFamily {
        detect_family(self.detector.as_ref(), text, self.min_detect_len)
    }

    /// Tokenize `text`. Duplicates are kept; the output may be empty.
    pub fn segment(&self, text: &str) -> Result<Vec<String>> {
        let family = self.family(text);
        let raw = match family {
            LanguageFamily::Chinese => self.chinese.segment(text)?,
            LanguageFamily::Japanese => self.japanese.segment(text)?,
            LanguageFamily::Latin => tokenize_latin(text)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let mut tokens: Vec<String> = raw
            .into_iter()
            .filter_map(|token| {
                let trimmed = token.trim();
                if trimmed.is_empty() || is_filler(trimmed) || self.stopwords.contains(trimmed) {
                    return None;
                }
                Some(if trimmed.len() == token.len() {
                    token
                } else {
                    trimmed.to_string()
                })
            })
            .collect();
        tokens.sort_unstable();

        trace!(?family, tokens = tokens.len(), "segmented text");
        Ok(tokens)
    }
}

/// A segmenter that becomes available after one asynchronous initialization.
///
/// Concurrent callers of [`SegmenterCell::init`] share one initialization; once it has
/// succeeded later configs are ignored. Reads before that fail with [`Error::NotReady`].
#[derive(Default)]
pub struct SegmenterCell {
    cell: OnceCell<Segmenter>,
}

impl SegmenterCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    pub async fn init(&self, config: SegmenterConfig) -> Result<&Segmenter> {
        self.cell
            .get_or_try_init(|| async move {
                let segmenter = tokio::task::spawn_blocking(move || Segmenter::new(&config))
                    .await
                    .map_err(|err| Error::Init(err.to_string()))?;
                info!("segmenter initialized");
                Ok(segmenter)
            })
            .await
    }

    pub fn get(&self) -> Result<&Segmenter> {
        self.cell.get().ok_or(Error::NotReady)
    }

    pub fn segment(&self, text: &str) -> Result<Vec<String>> {
        self.get()?.segment(text)
    }
}

static SEGMENTER: SegmenterCell = SegmenterCell::new();

/// Initialize the process-wide segmenter.
pub async fn init_segmenter(config: SegmenterConfig) -> Result<&'static Segmenter> {
    SEGMENTER.init(config).await
}

/// The process-wide segmenter, or [`Error::NotReady`] before `init_segmenter` completes.
pub fn global_segmenter() -> Result<&'static Segmenter> {
    SEGMENTER.get()
}

/// Tokenize with the process-wide segmenter.
pub fn segment(text: &str) -> Result<Vec<String>> {
    SEGMENTER.segment(text)
}
