//! Longest-match string replacement.

use super::table::FontEncs;
use std::collections::HashMap;

/// A successful trie lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMatch<'a> {
    /// The replacement code
    pub output: &'a str,
    /// Encodings the replacement is valid in
    pub fontencs: FontEncs,
    /// Number of input characters consumed
    pub len: usize,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, usize>,
    output: Option<(String, FontEncs)>,
}

/// Replacement dictionary with longest-match lookup.
///
/// Inputs share prefixes in a character trie; intermediate nodes carry
/// no output and are transparent to lookup. A lookup walks as far as
/// the input allows and answers with the last output-bearing node it
/// passed, so the longest applicable replacement always wins.
#[derive(Debug)]
pub struct ReplacementTrie {
    nodes: Vec<TrieNode>,
}

impl Default for ReplacementTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }
}

impl ReplacementTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored replacements
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.output.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a replacement. Empty inputs are rejected; inserting an
    /// existing input replaces its output.
    pub fn put(&mut self, input: &str, output: &str, fontencs: FontEncs) {
        if input.is_empty() {
            return;
        }
        let mut node = 0;
        for c in input.chars() {
            node = match self.nodes[node].children.get(&c).copied() {
                Some(next) => next,
                None => {
                    self.nodes.push(TrieNode::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children.insert(c, next);
                    next
                },
            };
        }
        self.nodes[node].output = Some((output.to_string(), fontencs));
    }

    /// Find the longest replacement starting at `start`, not looking at
    /// or past `end`
    pub fn get(&self, chars: &[char], start: usize, end: usize) -> Option<TrieMatch<'_>> {
        let end = end.min(chars.len());
        let mut node = 0;
        let mut best = None;
        for (consumed, &c) in chars[start.min(end)..end].iter().enumerate() {
            node = *self.nodes[node].children.get(&c)?;
            if let Some((output, fontencs)) = &self.nodes[node].output {
                best = Some(TrieMatch {
                    output,
                    fontencs: *fontencs,
                    len: consumed + 1,
                });
            }
        }
        best
    }
}
