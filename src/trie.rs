use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{Error, Result},
    types::{KeywordRecord, SNAPSHOT_VERSION, normalize_key},
};

pub type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TrieNode {
    children: BTreeMap<char, NodeId>,
    values: Vec<String>,
}

/// Persisted form of a [`PrefixTrie`]: the node arena in storage order plus the item counter.
///
/// Node 0 is the root. Fields are optional on the wire so a partial blob decodes and is
/// then rejected by [`PrefixTrie::from_snapshot`] as a corrupt index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<(char, NodeId)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl TrieSnapshot {
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::Serialization)
    }

    /// Decode a blob; undecodable bytes are a corrupt index.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|err| {
            warn!(error = %err, "failed to decode index snapshot");
            Error::CorruptIndex(err.to_string())
        })
    }
}

/// Character trie mapping normalized keys to one or more case-preserved values.
///
/// Nodes live in an arena; each parent exclusively owns its children through a
/// char-keyed map, so the graph is always a tree rooted at node 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    size: u64,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            size: 0,
        }
    }

    /// Number of inserts performed, duplicates included.
    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Store `value` under the normalized form of `key`. Duplicate keys accumulate values.
    ///
    /// An empty normalized key stores the value on the root, where no prefix search reaches it.
    ///
    /// # Panics
    ///
    /// When the arena already holds `NodeId::MAX + 1` nodes and the key needs a new one.
    /// Use [`PrefixTrie::try_insert`] to get an error instead.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        if let Err(err) = self.try_insert(key, value) {
            panic!("{err}");
        }
    }

    /// Like [`PrefixTrie::insert`], but fails with [`Error::Capacity`] when the arena is
    /// full. Nodes created before the failure stay in place without a value, and the
    /// counter is left untouched.
    pub fn try_insert(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut node = ROOT;
        for ch in normalize_key(key).chars() {
            node = match self.nodes[node as usize].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = next_node_id(self.nodes.len())?;
                    self.nodes.push(TrieNode::default());
                    self.nodes[node as usize].children.insert(ch, child);
                    child
                }
            };
        }
        self.nodes[node as usize].values.push(value.into());
        self.size += 1;
        Ok(())
    }

    pub fn bulk_insert<I, R>(&mut self, records: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<KeywordRecord>,
    {
        for record in records {
            let KeywordRecord { key, value } = record.into();
            self.insert(&key, value);
        }
    }

    /// Values of every key starting with `query`, depth-first with children in char order.
    ///
    /// Blank queries match nothing. At most `limit` values are returned when given.
    pub fn prefix_search(&self, query: &str, limit: Option<usize>) -> Vec<&str> {
        let query = normalize_key(query);
        let limit = limit.unwrap_or(usize::MAX);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let Some(start) = self.descend(&query) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            for value in &node.values {
                if results.len() >= limit {
                    return results;
                }
                results.push(value.as_str());
            }
            stack.extend(node.children.values().rev().copied());
        }
        results
    }

    fn descend(&self, normalized: &str) -> Option<NodeId> {
        normalized.chars().try_fold(ROOT, |node, ch| {
            self.nodes[node as usize].children.get(&ch).copied()
        })
    }

    pub fn to_snapshot(&self) -> TrieSnapshot {
        TrieSnapshot {
            version: SNAPSHOT_VERSION,
            nodes: self
                .nodes
                .iter()
                .map(|node| SnapshotNode {
                    children: node.children.iter().map(|(ch, id)| (*ch, *id)).collect(),
                    values: node.values.clone(),
                })
                .collect(),
            size: Some(self.size),
        }
    }

    /// Rebuild the arena by structural copy, rejecting anything that is not a single tree
    /// rooted at node 0 with a counter matching its stored values.
    pub fn from_snapshot(snapshot: TrieSnapshot) -> Result<Self> {
        let corrupt = |reason: String| {
            warn!(%reason, "rejecting index snapshot");
            Error::CorruptIndex(reason)
        };

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "snapshot version {} does not match expected {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        let Some(size) = snapshot.size else {
            return Err(corrupt("missing item counter".to_string()));
        };
        if snapshot.nodes.is_empty() {
            return Err(corrupt("missing root node".to_string()));
        }
        if snapshot.nodes.len() > NodeId::MAX as usize {
            return Err(corrupt(format!("{} nodes exceed arena limit", snapshot.nodes.len())));
        }

        let count = snapshot.nodes.len();
        let mut has_parent = vec![false; count];
        let mut nodes = Vec::with_capacity(count);
        let mut stored_values = 0u64;

        for (id, node) in snapshot.nodes.into_iter().enumerate() {
            let mut children = BTreeMap::new();
            for (ch, child) in node.children {
                let idx = child as usize;
                if child == ROOT || idx >= count {
                    return Err(corrupt(format!("node {id} links to invalid child {child}")));
                }
                if std::mem::replace(&mut has_parent[idx], true) {
                    return Err(corrupt(format!("node {child} has more than one parent")));
                }
                if children.insert(ch, child).is_some() {
                    return Err(corrupt(format!("node {id} has duplicate edge {ch:?}")));
                }
            }
            stored_values += node.values.len() as u64;
            nodes.push(TrieNode {
                children,
                values: node.values,
            });
        }

        // Every non-root node has exactly one parent; reachability then rules out cycles.
        let mut reachable = 0usize;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node: &TrieNode = &nodes[id as usize];
            stack.extend(node.children.values().copied());
        }
        if reachable != count {
            return Err(corrupt(format!(
                "{} of {count} nodes unreachable from root",
                count - reachable
            )));
        }

        if stored_values != size {
            return Err(corrupt(format!(
                "item counter {size} disagrees with {stored_values} stored values"
            )));
        }

        Ok(Self { nodes, size })
    }
}

/// Id for the node appended to an arena of `len` nodes.
fn next_node_id(len: usize) -> Result<NodeId> {
    NodeId::try_from(len)
        .map_err(|_| Error::Capacity(format!("arena is limited to {} nodes", NodeId::MAX)))
}
