use unicode_script::{Script as UniScript, UnicodeScript};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentScript {
    Han,
    Kana,
    Hangul,
    Latin,
    Other,
}

impl SegmentScript {
    /// Han and kana share a run when segmenting Japanese text.
    pub fn is_japanese(self) -> bool {
        matches!(self, SegmentScript::Han | SegmentScript::Kana)
    }
}

pub fn classify_script(c: char) -> SegmentScript {
    if is_cjk_char(c) {
        return SegmentScript::Han;
    }
    if is_kana(c) {
        return SegmentScript::Kana;
    }
    match c.script() {
        UniScript::Han => SegmentScript::Han,
        UniScript::Hangul => SegmentScript::Hangul,
        UniScript::Latin => SegmentScript::Latin,
        _ => SegmentScript::Other,
    }
}

/// Split `text` into maximal byte ranges whose chars map to the same key.
pub fn runs_by<K, F>(text: &str, mut key: F) -> Vec<(K, usize, usize)>
where
    K: Copy + PartialEq,
    F: FnMut(char) -> K,
{
    let mut runs = Vec::new();
    let mut current: Option<(K, usize)> = None;

    for (idx, ch) in text.char_indices() {
        let k = key(ch);
        match current {
            Some((cur, start)) if cur != k => {
                runs.push((cur, start, idx));
                current = Some((k, idx));
            }
            Some(_) => {}
            None => current = Some((k, idx)),
        }
    }

    if let Some((cur, start)) = current {
        runs.push((cur, start, text.len()));
    }
    runs
}

pub fn script_runs(text: &str) -> Vec<(SegmentScript, usize, usize)> {
    runs_by(text, classify_script)
}

pub fn is_kana(c: char) -> bool {
    // U+30FC (prolonged sound mark) is Common script but only appears in kana words.
    c == '\u{30FC}' || matches!(c.script(), UniScript::Hiragana | UniScript::Katakana)
}

pub fn is_cjk_char(c: char) -> bool {
    matches!(
      c,
      '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{2A700}'..='\u{2B73F}'
        | '\u{2B740}'..='\u{2B81F}'
        | '\u{2B820}'..='\u{2CEAF}'
    )
}
