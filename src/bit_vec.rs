use std::fmt;
use std::io;

use crate::bit_io::BitSink;

/// Growable string of bits, used for one symbol's prefix code.
///
/// Codes can run to 256 bits on a fully skewed tree, so they don't fit a
/// machine word.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn push(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn pop(&mut self) -> Option<bool> {
        if self.bit_count == 0 {
            return None;
        }
        self.bit_count -= 1;
        let byte_index = self.bit_count / 8;
        let mask = 1 << (7 - self.bit_count % 8);
        let bit = self.bits[byte_index] & mask != 0;
        self.bits[byte_index] &= !mask;
        if self.bit_count % 8 == 0 {
            self.bits.pop();
        }
        Some(bit)
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).filter_map(move |i| self.get(i))
    }

    /// True when `self` is a prefix of `other` (every code is a prefix of itself)
    pub fn is_prefix_of(&self, other: &BitVec) -> bool {
        self.bit_count <= other.bit_count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Write the bits to `sink` in order, in chunks of up to 32.
    pub fn write_to<K: BitSink + ?Sized>(&self, sink: &mut K) -> io::Result<()> {
        let mut value = 0u32;
        let mut pending = 0u8;
        for bit in self.iter() {
            value = (value << 1) | u32::from(bit);
            pending += 1;
            if pending == 32 {
                sink.write_bits(pending, value)?;
                value = 0;
                pending = 0;
            }
        }
        if pending > 0 {
            sink.write_bits(pending, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bit_vec = BitVec::new();
        for bit in iter {
            bit_vec.push(bit);
        }
        bit_vec
    }
}
