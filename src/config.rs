use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    tokenizer::{MIN_DETECT_LEN, ScriptDictionary},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Texts shorter than this many chars are not classified and use the Latin tokenizer.
    pub min_detect_len: usize,
    pub japanese_dictionary: Option<ScriptDictionary>,
    pub extra_stopwords: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_detect_len: MIN_DETECT_LEN,
            japanese_dictionary: None,
            extra_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Skip keys that normalize to the empty string instead of storing them at the root.
    pub reject_empty_keys: bool,
    /// Cap on vocabulary entries added per query term during expansion.
    pub expansion_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub segmenter: SegmenterConfig,
    pub index: IndexConfig,
}

impl EngineConfig {
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(Error::Config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_slice(&std::fs::read(path)?)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_vec_pretty(self).map_err(Error::Config)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
