//! Prefix codes derived from a Huffman tree.

use crate::bit_vec::BitVec;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::ALPHABET_SIZE;

/// Symbol to prefix code mapping.
///
/// Left edges read as `0`, right edges as `1`; the decoder walks the tree
/// with the same convention. Only symbols that are leaves of the tree have
/// an entry. The leaf of a single-leaf tree gets an empty code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<BitVec>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        let mut path = BitVec::new();
        Self::walk(&tree.root, &mut path, &mut codes);
        CodeTable { codes }
    }

    fn walk(node: &HuffNode, path: &mut BitVec, codes: &mut [Option<BitVec>]) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                if let Some(slot) = codes.get_mut(*symbol as usize) {
                    *slot = Some(path.clone());
                }
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                Self::walk(left, path, codes);
                path.pop();

                path.push(true);
                Self::walk(right, path, codes);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u16) -> Option<&BitVec> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Assigned codes in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &BitVec)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u16, code)))
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_code_len(&self) -> usize {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// No code is a prefix of a different symbol's code
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitVec> = self.iter().map(|(_, code)| code).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}
