use std::{future::Future, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

use crate::{
    config::IndexConfig,
    error::Result,
    tokenizer::Segmenter,
    trie::{PrefixTrie, TrieSnapshot},
    types::{KeywordBatch, KeywordRecord, normalize_key},
};

/// Pull-based source of keyword batches for streaming builds.
///
/// `Ok(None)` and an empty batch both mark the end of the stream. The builder awaits each
/// pull and inserts its batch before issuing the next one, so implementations may advance
/// internal cursors without locking.
pub trait KeywordSupplier {
    fn next_batch(&mut self) -> impl Future<Output = Result<Option<KeywordBatch>>> + Send;
}

impl<F, Fut> KeywordSupplier for F
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<KeywordBatch>>> + Send,
{
    fn next_batch(&mut self) -> impl Future<Output = Result<Option<KeywordBatch>>> + Send {
        self()
    }
}

/// Accumulates keywords into a fresh trie and freezes it into a snapshot.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    trie: PrefixTrie,
    config: IndexConfig,
    skipped: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Insert one record. Returns false when the key is blank and the config rejects it.
    pub fn insert(&mut self, record: impl Into<KeywordRecord>) -> bool {
        let KeywordRecord { key, value } = record.into();
        if self.config.reject_empty_keys && normalize_key(&key).is_empty() {
            warn!(%value, "skipping keyword with empty key");
            self.skipped += 1;
            return false;
        }
        self.trie.insert(&key, value);
        true
    }

    /// Insert records in order; returns how many were accepted.
    pub fn extend<I, R>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = R>,
        R: Into<KeywordRecord>,
    {
        records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|accepted| *accepted)
            .count()
    }

    /// Segment `text` and index each token as a vocabulary entry.
    pub fn insert_text(&mut self, segmenter: &Segmenter, text: &str) -> Result<usize> {
        let tokens = segmenter.segment(text)?;
        Ok(self.extend(tokens))
    }

    /// Drain `supplier` one batch at a time until it signals the end.
    pub async fn extend_from_supplier<S>(&mut self, mut supplier: S) -> Result<u64>
    where
        S: KeywordSupplier,
    {
        let mut batches = 0u64;
        let mut inserted = 0u64;
        while let Some(batch) = supplier.next_batch().await? {
            if batch.is_empty() {
                break;
            }
            batches += 1;
            let offered = batch.len();
            let accepted = self.extend(batch);
            inserted += accepted as u64;
            trace!(batch = batches, offered, accepted, "inserted keyword batch");
        }
        debug!(batches, inserted, "keyword supplier exhausted");
        Ok(inserted)
    }

    /// Inserts performed so far, duplicates included.
    pub fn len(&self) -> u64 {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn finish(self) -> TrieSnapshot {
        debug!(
            size = self.trie.len(),
            nodes = self.trie.node_count(),
            skipped = self.skipped,
            "index build finished"
        );
        self.trie.to_snapshot()
    }
}

/// Build a snapshot from an in-memory keyword corpus.
pub fn build_index<I, R>(records: I) -> TrieSnapshot
where
    I: IntoIterator<Item = R>,
    R: Into<KeywordRecord>,
{
    let mut builder = IndexBuilder::new();
    builder.extend(records);
    builder.finish()
}

/// Build a snapshot by pulling batches from `supplier` until it is exhausted.
pub async fn build_index_streaming<S>(supplier: S) -> Result<TrieSnapshot>
where
    S: KeywordSupplier,
{
    let mut builder = IndexBuilder::new();
    builder.extend_from_supplier(supplier).await?;
    Ok(builder.finish())
}

/// A trie restored from a snapshot. Only exposes reads, so it can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct LoadedIndex {
    trie: PrefixTrie,
}

impl LoadedIndex {
    pub fn prefix_search(&self, query: &str, limit: Option<usize>) -> Vec<&str> {
        self.trie.prefix_search(query, limit)
    }

    pub fn len(&self) -> u64 {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn to_snapshot(&self) -> TrieSnapshot {
        self.trie.to_snapshot()
    }
}

/// Restore a searchable index without replaying any insertions.
pub fn load_index(snapshot: TrieSnapshot) -> Result<LoadedIndex> {
    let trie = PrefixTrie::from_snapshot(snapshot)?;
    info!(size = trie.len(), nodes = trie.node_count(), "index loaded");
    Ok(LoadedIndex { trie })
}

/// Shared reference to the live index. Rebuilds swap in a new `Arc`; searches already
/// holding the previous one are unaffected.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Arc<LoadedIndex>>,
}

impl IndexHandle {
    pub fn new(index: LoadedIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    pub fn current(&self) -> Arc<LoadedIndex> {
        Arc::clone(&self.current.read())
    }

    /// Swap in `index`, returning the one it replaced.
    pub fn replace(&self, index: LoadedIndex) -> Arc<LoadedIndex> {
        std::mem::replace(&mut *self.current.write(), Arc::new(index))
    }

    /// Load `snapshot` and swap it in. On error the current index stays in place.
    pub fn replace_from_snapshot(&self, snapshot: TrieSnapshot) -> Result<Arc<LoadedIndex>> {
        Ok(self.replace(load_index(snapshot)?))
    }
}
