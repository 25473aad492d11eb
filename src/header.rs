//! Tree header: the preorder bit encoding of a Huffman tree.
//!
//! ```text
//! node     := internal | leaf
//! internal := 0 node node
//! leaf     := 1 symbol      (symbol is 9 bits, 0..=256)
//! ```
//!
//! No node count or length prefix is stored. Every internal node is followed
//! by exactly two subtrees, so the reader stops on the last bit the writer
//! produced.

use crate::bit_io::{BitSink, BitSource};
use crate::error::{HuffError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::{END_OF_STREAM, SYMBOL_BITS};

/// Deepest nesting a header may describe. A tree over 257 symbols can't be
/// deeper than 256 edges.
pub const MAX_TREE_DEPTH: usize = END_OF_STREAM as usize;

const INTERNAL_MARKER: u32 = 0;
const LEAF_MARKER: u32 = 1;

/// Serialize `tree` into `out`, returning the number of bits written.
pub fn write_tree<K: BitSink + ?Sized>(tree: &HuffmanTree, out: &mut K) -> Result<u64> {
    write_node(&tree.root, out)
}

fn write_node<K: BitSink + ?Sized>(node: &HuffNode, out: &mut K) -> Result<u64> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            out.write_bits(1, LEAF_MARKER)?;
            out.write_bits(SYMBOL_BITS, u32::from(*symbol))?;
            Ok(1 + u64::from(SYMBOL_BITS))
        }
        HuffNode::Internal { left, right, .. } => {
            out.write_bits(1, INTERNAL_MARKER)?;
            let left_bits = write_node(left, out)?;
            let right_bits = write_node(right, out)?;
            Ok(1 + left_bits + right_bits)
        }
    }
}

/// Number of bits [`write_tree`] produces for `tree`
pub fn header_bits(tree: &HuffmanTree) -> u64 {
    fn count(node: &HuffNode) -> u64 {
        match node {
            HuffNode::Leaf { .. } => 1 + u64::from(SYMBOL_BITS),
            HuffNode::Internal { left, right, .. } => 1 + count(left) + count(right),
        }
    }
    count(&tree.root)
}

/// Rebuild a tree from its header, returning it with the number of bits read.
///
/// Reconstructed nodes carry weight 0.
pub fn read_tree<S: BitSource + ?Sized>(input: &mut S) -> Result<(HuffmanTree, u64)> {
    let mut bits = 0;
    let root = read_node(input, 0, &mut bits)?;
    Ok((HuffmanTree::new(root), bits))
}

fn read_node<S: BitSource + ?Sized>(
    input: &mut S,
    depth: usize,
    bits: &mut u64,
) -> Result<HuffNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(HuffError::malformed_header(format!(
            "tree nests deeper than {MAX_TREE_DEPTH} levels"
        )));
    }

    let marker = input.read_bits(1)?.ok_or_else(|| {
        HuffError::malformed_header(format!("input ended before node marker at bit {bits}"))
    })?;
    *bits += 1;

    if marker == INTERNAL_MARKER {
        let left = read_node(input, depth + 1, bits)?;
        let right = read_node(input, depth + 1, bits)?;
        return Ok(HuffNode::Internal {
            weight: 0,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    let value = input.read_bits(SYMBOL_BITS)?.ok_or_else(|| {
        HuffError::malformed_header(format!("input ended inside leaf value at bit {bits}"))
    })?;
    *bits += u64::from(SYMBOL_BITS);

    if value > u32::from(END_OF_STREAM) {
        return Err(HuffError::malformed_header(format!(
            "leaf value {value} is outside the symbol range"
        )));
    }
    Ok(HuffNode::leaf(value as u16, 0))
}
