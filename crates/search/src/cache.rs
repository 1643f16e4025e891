//! Solution cache - trie over the exact board rows
//! One level per row, leaves hold the verdict. Entries are written once and
//! never evicted: a well's verdict depends only on its rows.

use hatetris_core::Row;
use rustc_hash::FxHashMap;

use crate::verdict::Verdict;

#[derive(Default, Debug)]
struct TrieNode {
    /// Next-level trie node, or on the last level an index into `verdicts`.
    children: FxHashMap<Row, u32>,
}

#[derive(Debug)]
pub struct SolutionCache {
    key_len: usize,
    nodes: Vec<TrieNode>,
    verdicts: Vec<Verdict>,
}

impl SolutionCache {
    /// Cache for boards of exactly `key_len` rows.
    pub fn new(key_len: usize) -> Self {
        Self {
            key_len,
            nodes: vec![TrieNode::default()],
            verdicts: Vec::new(),
        }
    }

    #[inline]
    pub fn lookup(&self, rows: &[Row]) -> Option<&Verdict> {
        debug_assert_eq!(rows.len(), self.key_len, "board height changed");
        let (last, prefix) = rows.split_last()?;
        let mut node = 0usize;
        for row in prefix {
            node = *self.nodes[node].children.get(row)? as usize;
        }
        let leaf = *self.nodes[node].children.get(last)?;
        Some(&self.verdicts[leaf as usize])
    }

    /// Record a verdict. Returns false if the board was already present, in
    /// which case the first verdict is kept.
    pub fn store(&mut self, rows: &[Row], verdict: Verdict) -> bool {
        debug_assert_eq!(rows.len(), self.key_len, "board height changed");
        let Some((&last, prefix)) = rows.split_last() else {
            return false;
        };
        let mut node = 0usize;
        for &row in prefix {
            node = match self.nodes[node].children.get(&row) {
                Some(&child) => child as usize,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(row, child as u32);
                    child
                }
            };
        }
        match self.nodes[node].children.entry(last) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                debug_assert_eq!(
                    self.verdicts[*entry.get() as usize].winner(),
                    verdict.winner(),
                    "a well's winner cannot change"
                );
                false
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(self.verdicts.len() as u32);
                self.verdicts.push(verdict);
                true
            }
        }
    }

    /// Number of cached wells.
    #[inline]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Interior trie nodes, root included.
    #[inline]
    pub fn trie_nodes(&self) -> usize {
        self.nodes.len()
    }
}
