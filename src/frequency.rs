//! Symbol occurrence counts.

use std::fmt;

use crate::bit_io::BitSource;
use crate::error::{HuffError, Result};
use crate::{ALPHABET_SIZE, BITS_PER_WORD, END_OF_STREAM};

/// Occurrence count per symbol, indexed `0..=256`.
///
/// The end-of-stream count is pinned to exactly 1 whatever the input held.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count 8-bit chunks until `input` signals end of stream.
    ///
    /// The source is left at its end; rewinding it is up to the caller. A
    /// source that hands back a chunk wider than a byte is `CorruptData`.
    pub fn from_source<S: BitSource + ?Sized>(input: &mut S) -> Result<Self> {
        let mut table = Self::default();
        while let Some(chunk) = input.read_bits(BITS_PER_WORD)? {
            let byte = u8::try_from(chunk).map_err(|_| {
                HuffError::corrupt_data(format!("8-bit read returned out-of-range value {chunk}"))
            })?;
            table.counts[byte as usize] += 1;
        }
        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &byte in data {
            table.counts[byte as usize] += 1;
        }
        table
    }

    pub fn count(&self, symbol: u16) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a non-zero count, ascending, paired with their counts
    pub fn present(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// Number of input bytes counted, end-of-stream excluded
    pub fn total_bytes(&self) -> u64 {
        self.counts[..END_OF_STREAM as usize].iter().sum()
    }

    /// Number of symbols that will become leaves, end-of-stream included
    pub fn distinct(&self) -> usize {
        self.present().count()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        counts[END_OF_STREAM as usize] = 1;
        FrequencyTable { counts }
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.present()).finish()
    }
}
