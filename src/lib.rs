mod config;
mod error;
mod index;
mod search;
mod store;
mod tokenizer;
mod trie;
mod types;

pub use config::{EngineConfig, IndexConfig, SegmenterConfig};
pub use error::{Error, Result};
pub use index::{
    IndexBuilder, IndexHandle, KeywordSupplier, LoadedIndex, build_index, build_index_streaming,
    load_index,
};
pub use search::{QueryExpander, expand_query, expand_text};
pub use store::{BlobStore, FsBlobStore, MemoryBlobStore, load_snapshot, save_snapshot};
pub use tokenizer::{
    DictionaryTrainingConfig, JapaneseSegmenter, JiebaSegmenter, LanguageDetector,
    LanguageFamily, LanguageScore, MIN_DETECT_LEN, ScriptDetector, ScriptDictionary,
    SegmentScript, Segmenter, SegmenterCell, Stopwords, WordSegmenter, classify,
    classify_script, detect_family, dictionary::train_dictionary, global_segmenter,
    init_segmenter, is_filler, script_runs, segment, tokenize_latin,
};
pub use trie::{NodeId, PrefixTrie, SnapshotNode, TrieSnapshot};
pub use types::{KeywordBatch, KeywordRecord, SNAPSHOT_VERSION, normalize_key};
