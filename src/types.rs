use serde::{Deserialize, Serialize};

/// Bumped whenever the persisted trie layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Structural form of a key or query: trimmed and lowercased.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// A key to index and the value returned when a search reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub key: String,
    pub value: String,
}

impl KeywordRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A vocabulary entry: the value is the keyword itself, case preserved.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self {
            key: keyword.clone(),
            value: keyword,
        }
    }
}

impl From<&str> for KeywordRecord {
    fn from(value: &str) -> Self {
        Self::keyword(value)
    }
}

impl From<String> for KeywordRecord {
    fn from(value: String) -> Self {
        Self::keyword(value)
    }
}

impl From<&String> for KeywordRecord {
    fn from(value: &String) -> Self {
        Self::keyword(value.as_str())
    }
}

impl<K, V> From<(K, V)> for KeywordRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// One pull from a streaming keyword supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordBatch {
    One(KeywordRecord),
    Many(Vec<KeywordRecord>),
}

impl KeywordBatch {
    pub fn one(record: impl Into<KeywordRecord>) -> Self {
        KeywordBatch::One(record.into())
    }

    pub fn many<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<KeywordRecord>,
    {
        KeywordBatch::Many(records.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, KeywordBatch::Many(records) if records.is_empty())
    }

    pub fn len(&self) -> usize {
        match self {
            KeywordBatch::One(_) => 1,
            KeywordBatch::Many(records) => records.len(),
        }
    }
}

impl IntoIterator for KeywordBatch {
    type Item = KeywordRecord;
    type IntoIter = std::vec::IntoIter<KeywordRecord>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            KeywordBatch::One(record) => vec![record].into_iter(),
            KeywordBatch::Many(records) => records.into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_sizes_and_end_marker() {
        assert_eq!(KeywordBatch::one("a").len(), 1);
        assert!(!KeywordBatch::one("").is_empty());

        let many = KeywordBatch::many([("k1", "v1"), ("k2", "v2")]);
        assert_eq!(many.len(), 2);
        assert_eq!(
            many.into_iter().map(|r| r.value).collect::<Vec<_>>(),
            vec!["v1", "v2"]
        );

        let empty = KeywordBatch::many(Vec::<String>::new());
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn keywords_keep_case_in_value() {
        let record = KeywordRecord::from("  Apple ");
        assert_eq!(record.value, "  Apple ");
        assert_eq!(normalize_key(&record.key), "apple");
    }
}
