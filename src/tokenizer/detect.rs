use std::collections::HashMap;

use unicode_script::{Script as UniScript, UnicodeScript};

use super::script::{SegmentScript, classify_script};

/// Texts shorter than this (in chars) carry too little signal to classify.
pub const MIN_DETECT_LEN: usize = 3;

const CHINESE_CODES: &[&str] = &["zho", "cmn", "yue"];
const JAPANESE_CODES: &[&str] = &["jpn"];
const LATIN_CODES: &[&str] = &["eng", "deu", "nld", "fra", "ita"];

/// Tokenizer family chosen for a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFamily {
    Chinese,
    Japanese,
    /// Latin-alphabet and everything else; also used when detection is undetermined.
    Latin,
}

impl LanguageFamily {
    pub fn from_code(code: &str) -> Option<Self> {
        if CHINESE_CODES.contains(&code) {
            Some(LanguageFamily::Chinese)
        } else if JAPANESE_CODES.contains(&code) {
            Some(LanguageFamily::Japanese)
        } else if LATIN_CODES.contains(&code) {
            Some(LanguageFamily::Latin)
        } else {
            None
        }
    }
}

/// ISO 639-3 language code with a detector confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageScore {
    pub code: String,
    pub score: f64,
}

impl LanguageScore {
    pub fn new(code: impl Into<String>, score: f64) -> Self {
        Self {
            code: code.into(),
            score,
        }
    }
}

pub trait LanguageDetector: Send + Sync {
    /// Ranked candidates for `text`; empty when shorter than `min_len` or without signal.
    fn detect(&self, text: &str, min_len: usize) -> Vec<LanguageScore>;
}

/// Pick the family of the highest-scored candidate that belongs to a known family.
///
/// Candidates outside every family are skipped rather than blocking lower-scored ones.
/// Returns `None` when nothing matches, which callers treat as [`LanguageFamily::Latin`].
pub fn classify(candidates: &[LanguageScore]) -> Option<LanguageFamily> {
    let mut ranked: Vec<&LanguageScore> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
        .into_iter()
        .find_map(|candidate| LanguageFamily::from_code(&candidate.code))
}

pub fn detect_family(detector: &dyn LanguageDetector, text: &str, min_len: usize) -> LanguageFamily {
    classify(&detector.detect(text, min_len)).unwrap_or(LanguageFamily::Latin)
}

/// Detector that scores languages by the share of letters written in each script.
///
/// Han counts towards Japanese as soon as any kana is present, otherwise towards Mandarin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str, min_len: usize) -> Vec<LanguageScore> {
        if text.trim().chars().count() < min_len {
            return Vec::new();
        }

        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        let mut han = 0usize;
        let mut kana = 0usize;
        let mut letters = 0usize;

        for ch in text.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            let code = match classify_script(ch) {
                SegmentScript::Han => {
                    han += 1;
                    continue;
                }
                SegmentScript::Kana => {
                    kana += 1;
                    continue;
                }
                SegmentScript::Hangul => "kor",
                SegmentScript::Latin => "eng",
                SegmentScript::Other => match other_script_code(ch) {
                    Some(code) => code,
                    None => continue,
                },
            };
            *counts.entry(code).or_default() += 1;
        }

        if kana > 0 {
            *counts.entry("jpn").or_default() += kana + han;
        } else if han > 0 {
            *counts.entry("cmn").or_default() += han;
        }

        if letters == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<LanguageScore> = counts
            .into_iter()
            .map(|(code, count)| LanguageScore::new(code, count as f64 / letters as f64))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.code.cmp(&b.code)));
        ranked
    }
}

fn other_script_code(ch: char) -> Option<&'static str> {
    match ch.script() {
        UniScript::Cyrillic => Some("rus"),
        UniScript::Greek => Some("ell"),
        UniScript::Arabic => Some("arb"),
        UniScript::Hebrew => Some("heb"),
        UniScript::Thai => Some("tha"),
        UniScript::Devanagari => Some("hin"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> Vec<LanguageScore> {
        pairs
            .iter()
            .map(|(code, score)| LanguageScore::new(*code, *score))
            .collect()
    }

    #[test]
    fn unknown_top_candidate_does_not_block_lower_match() {
        let candidates = scores(&[("kor", 0.95), ("eng", 0.40)]);
        assert_eq!(classify(&candidates), Some(LanguageFamily::Latin));
    }

    #[test]
    fn candidates_are_ranked_before_matching() {
        let candidates = scores(&[("eng", 0.2), ("jpn", 0.7), ("cmn", 0.5)]);
        assert_eq!(classify(&candidates), Some(LanguageFamily::Japanese));
    }

    #[test]
    fn every_chinese_code_maps_to_chinese() {
        for code in ["zho", "cmn", "yue"] {
            assert_eq!(
                classify(&scores(&[(code, 1.0)])),
                Some(LanguageFamily::Chinese)
            );
        }
    }

    #[test]
    fn no_known_candidate_is_undetermined() {
        assert_eq!(classify(&[]), None);
        assert_eq!(classify(&scores(&[("kor", 0.9), ("rus", 0.1)])), None);
    }

    #[test]
    fn short_text_is_undetermined() {
        assert!(ScriptDetector.detect("hi", MIN_DETECT_LEN).is_empty());
        assert!(ScriptDetector.detect("  中 ", MIN_DETECT_LEN).is_empty());
    }

    #[test]
    fn detects_script_families() {
        assert_eq!(
            detect_family(&ScriptDetector, "中华人民共和国", MIN_DETECT_LEN),
            LanguageFamily::Chinese
        );
        assert_eq!(
            detect_family(&ScriptDetector, "東京へようこそ", MIN_DETECT_LEN),
            LanguageFamily::Japanese
        );
        assert_eq!(
            detect_family(&ScriptDetector, "Hello world", MIN_DETECT_LEN),
            LanguageFamily::Latin
        );
    }

    #[test]
    fn hangul_falls_back_to_latin_family() {
        let detected = ScriptDetector.detect("안녕하세요", MIN_DETECT_LEN);
        assert_eq!(detected[0].code, "kor");
        assert_eq!(
            detect_family(&ScriptDetector, "안녕하세요", MIN_DETECT_LEN),
            LanguageFamily::Latin
        );
    }

    #[test]
    fn digits_only_text_has_no_candidates() {
        assert!(ScriptDetector.detect("12345", MIN_DETECT_LEN).is_empty());
    }
}
