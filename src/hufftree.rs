use std::cmp::Ordering;

use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;
use crate::END_OF_STREAM;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u16,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: u16, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    /// Internal node over `left` (bit 0) and `right` (bit 1)
    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<u16> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Same shape and same leaf symbols, weights ignored
    pub fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal { left: l1, right: r1, .. },
                HuffNode::Internal { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn render_into(&self, out: &mut String, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        match self {
            HuffNode::Leaf { symbol, weight } => {
                out.push_str(&format!(
                    "{indent}{label}-> Leaf: {} [weight: {weight}]\n",
                    describe_symbol(*symbol)
                ));
            }
            HuffNode::Internal { weight, left, right } => {
                out.push_str(&format!("{indent}{label}-> Internal [weight: {weight}]\n"));
                left.render_into(out, depth + 1, "L");
                right.render_into(out, depth + 1, "R");
            }
        }
    }
}

pub(crate) fn describe_symbol(symbol: u16) -> String {
    match symbol {
        END_OF_STREAM => "EOS".to_string(),
        0x20..=0x7e => format!("{:?} ({symbol})", symbol as u8 as char),
        _ => format!("{symbol:#04x}"),
    }
}

/// Heap entry for tree construction.
///
/// Lighter nodes come out first; equal weights come out in creation order,
/// leaves (created in ascending symbol order) before any merged node, and
/// older merged nodes before newer ones.
struct Pending {
    weight: u64,
    seq: usize,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn new(root: HuffNode) -> Self {
        HuffmanTree { root }
    }

    /// Greedy Huffman construction over every symbol with a non-zero count.
    ///
    /// The two lightest nodes are merged, first extracted on the left, until
    /// one node remains. A table with a single present symbol yields a
    /// single-leaf tree.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        let leaves: Vec<Pending> = frequencies
            .present()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq,
                node: HuffNode::leaf(symbol, weight),
            })
            .collect();
        let mut seq = leaves.len();
        let mut heap = MinHeap::build(leaves);

        let root = loop {
            match (heap.extract_min(), heap.extract_min()) {
                (Some(a), Some(b)) => {
                    let node = HuffNode::internal(a.node, b.node);
                    heap.insert(Pending {
                        weight: node.weight(),
                        seq,
                        node,
                    });
                    seq += 1;
                }
                (Some(last), None) => break last.node,
                // the end-of-stream count is pinned to 1, so the heap never starts empty
                (None, _) => break HuffNode::leaf(END_OF_STREAM, 1),
            }
        };

        HuffmanTree { root }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// The root is a leaf, so that leaf's code is zero bits long
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        self.root.same_shape(&other.root)
    }

    /// Indented dump of the tree, one node per line
    pub fn render(&self) -> String {
        let mut out = String::from("Huffman Tree Structure:\n");
        self.root.render_into(&mut out, 0, "root");
        out
    }
}
