use std::{
    collections::{HashMap, HashSet},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use super::{WordSegmenter, latin::tokenize_latin, script::classify_script, script::runs_by};
use crate::error::Result;

/// Known words for longest-match segmentation of kana/kanji runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDictionary {
    pub version: Option<String>,
    pub entries: HashSet<String>,
}

impl ScriptDictionary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Japanese word segmenter.
///
/// Han/kana runs are matched longest-first against the dictionary; spans the dictionary
/// does not cover fall back to character unigrams and bigrams. Other runs (Latin words,
/// digits, punctuation) go through the Latin tokenizer.
#[derive(Debug, Clone, Default)]
pub struct JapaneseSegmenter {
    dictionary: Option<ScriptDictionary>,
    max_entry_chars: usize,
}

impl JapaneseSegmenter {
    pub fn new(dictionary: Option<ScriptDictionary>) -> Self {
        let dictionary = dictionary.filter(|d| !d.is_empty());
        let max_entry_chars = dictionary
            .as_ref()
            .and_then(|d| d.entries.iter().map(|e| e.chars().count()).max())
            .unwrap_or(0);
        Self {
            dictionary,
            max_entry_chars,
        }
    }

    /// Greedy longest match left to right; each maximal unmatched gap becomes n-grams.
    fn segment_run(&self, run: &str, out: &mut Vec<String>) {
        let Some(dictionary) = &self.dictionary else {
            char_ngrams(run, out);
            return;
        };

        let bounds: Vec<usize> = run
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(run.len()))
            .collect();
        let chars = bounds.len() - 1;
        let mut gap_from: Option<usize> = None;
        let mut pos = 0;

        while pos < chars {
            let widest = chars.min(pos + self.max_entry_chars);
            let word_end = (pos + 1..=widest)
                .rev()
                .find(|&end| dictionary.entries.contains(&run[bounds[pos]..bounds[end]]));
            match word_end {
                Some(end) => {
                    if let Some(from) = gap_from.take() {
                        char_ngrams(&run[bounds[from]..bounds[pos]], out);
                    }
                    out.push(run[bounds[pos]..bounds[end]].to_string());
                    pos = end;
                }
                None => {
                    gap_from.get_or_insert(pos);
                    pos += 1;
                }
            }
        }
        if let Some(from) = gap_from {
            char_ngrams(&run[bounds[from]..], out);
        }
    }
}

impl WordSegmenter for JapaneseSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for (japanese, start, end) in runs_by(text, |c| classify_script(c).is_japanese()) {
            let run = &text[start..end];
            if japanese {
                self.segment_run(run, &mut out);
            } else {
                out.extend(tokenize_latin(run).into_iter().map(str::to_string));
            }
        }
        Ok(out)
    }
}

/// Emit every character and every adjacent character pair.
fn char_ngrams(segment: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = segment.chars().collect();
    for (i, ch) in chars.iter().enumerate() {
        out.push(ch.to_string());
        if let Some(next) = chars.get(i + 1) {
            out.push([*ch, *next].iter().collect());
        }
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryTrainingConfig {
    pub min_freq: usize,
    pub min_token_len: usize,
    pub max_token_len: usize,
    pub max_entries: usize,
    pub version: Option<String>,
}

impl Default for DictionaryTrainingConfig {
    fn default() -> Self {
        Self {
            min_freq: 2,
            min_token_len: 2,
            max_token_len: 8,
            max_entries: 8_000,
            version: None,
        }
    }
}

/// Build a Japanese dictionary from the most frequent kana/kanji n-grams of a corpus.
///
/// Ties rank longer n-grams first, then lexicographically.
pub fn train_dictionary(corpus: &[String], config: DictionaryTrainingConfig) -> ScriptDictionary {
    let shortest = config.min_token_len.max(1);
    let longest = config.max_token_len.max(shortest);
    let mut frequencies: HashMap<String, usize> = HashMap::new();

    let japanese_runs = corpus.iter().flat_map(|text| {
        runs_by(text, |c| classify_script(c).is_japanese())
            .into_iter()
            .filter(|(japanese, _, _)| *japanese)
            .map(move |(_, start, end)| text[start..end].chars().collect::<Vec<char>>())
    });
    for run in japanese_runs {
        for width in shortest..=longest.min(run.len()) {
            for window in run.windows(width) {
                *frequencies.entry(window.iter().collect()).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, String)> = frequencies
        .into_iter()
        .filter(|(_, count)| *count >= config.min_freq)
        .map(|(gram, count)| (count, gram))
        .collect();
    ranked.sort_by(|(count_a, gram_a), (count_b, gram_b)| {
        count_b
            .cmp(count_a)
            .then(gram_b.len().cmp(&gram_a.len()))
            .then(gram_a.cmp(gram_b))
    });
    let keep = match config.max_entries {
        0 => ranked.len(),
        cap => cap,
    };

    ScriptDictionary {
        version: Some(config.version.unwrap_or_else(default_version)),
        entries: ranked.into_iter().take(keep).map(|(_, gram)| gram).collect(),
    }
}

fn default_version() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("ja-{ts}")
}
