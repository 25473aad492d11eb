use std::io::{Cursor, Read, Seek, Write};

use crate::bit_io::{BitReader, BitSink, BitSource, BitWriter, Rewind};
use crate::code_table::CodeTable;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::header;
use crate::hufftree::{describe_symbol, HuffNode, HuffmanTree};
use crate::{BITS_PER_INT, BITS_PER_WORD, END_OF_STREAM, HUFF_MAGIC};

/// How much of the codec's work gets logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    #[default]
    Off,
    /// Code table and per-operation summaries, at `debug`
    Low,
    /// Everything in `Low` plus counts, the tree, and each decoded leaf, at `trace`
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    pub debug: DebugLevel,
}

impl CodecConfig {
    pub fn with_debug(debug: DebugLevel) -> Self {
        CodecConfig { debug }
    }
}

/// Bits moved by one compress or decompress call.
///
/// `bits_read` counts both passes over the input when compressing.
/// `bits_written` excludes the zero padding added when the output closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    pub bits_read: u64,
    pub bits_written: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn low(&self) -> bool {
        self.config.debug >= DebugLevel::Low
    }

    fn high(&self) -> bool {
        self.config.debug >= DebugLevel::High
    }

    /// Compress `input` into `output`.
    ///
    /// The input is read twice, once to count and once to encode, with a
    /// rewind in between. `output` is closed before this returns, whether or
    /// not compression succeeded.
    pub fn compress<S, K>(&self, input: &mut S, output: &mut K) -> Result<CodecStats>
    where
        S: BitSource + Rewind + ?Sized,
        K: BitSink + ?Sized,
    {
        let result = self.compress_inner(input, output);
        finish(result, output)
    }

    /// Decompress `input` into `output`.
    ///
    /// Nothing is written when the magic number is wrong. On other failures
    /// `output` keeps whatever bytes were decoded before the failure point.
    /// `output` is closed before this returns either way.
    pub fn decompress<S, K>(&self, input: &mut S, output: &mut K) -> Result<CodecStats>
    where
        S: BitSource + ?Sized,
        K: BitSink + ?Sized,
    {
        let result = self.decompress_inner(input, output);
        finish(result, output)
    }

    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut reader = BitReader::new(Cursor::new(data));
        let mut writer = BitWriter::new(Vec::new());
        self.compress(&mut reader, &mut writer)?;
        Ok(writer.into_inner()?)
    }

    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut reader = BitReader::new(Cursor::new(data));
        let mut writer = BitWriter::new(Vec::new());
        self.decompress(&mut reader, &mut writer)?;
        Ok(writer.into_inner()?)
    }

    /// [`compress`](Self::compress) over byte streams. Both passes over
    /// `reader` start at offset 0, wherever its cursor was on entry.
    pub fn compress_stream<R, W>(&self, reader: R, writer: W) -> Result<CodecStats>
    where
        R: Read + Seek,
        W: Write,
    {
        let mut input = BitReader::new(reader);
        input.rewind()?;
        let mut output = BitWriter::new(writer);
        self.compress(&mut input, &mut output)
    }

    pub fn decompress_stream<R, W>(&self, reader: R, writer: W) -> Result<CodecStats>
    where
        R: Read,
        W: Write,
    {
        let mut input = BitReader::new(reader);
        let mut output = BitWriter::new(writer);
        self.decompress(&mut input, &mut output)
    }

    fn compress_inner<S, K>(&self, input: &mut S, output: &mut K) -> Result<CodecStats>
    where
        S: BitSource + Rewind + ?Sized,
        K: BitSink + ?Sized,
    {
        let counts = FrequencyTable::from_source(input)?;
        input.rewind()?;
        if self.high() {
            for (symbol, count) in counts.present() {
                log::trace!("chunk {} occurs {count} times", describe_symbol(symbol));
            }
        }

        let tree = HuffmanTree::from_frequencies(&counts);
        let codes = CodeTable::from_tree(&tree);
        if self.low() {
            for (symbol, code) in codes.iter() {
                log::debug!("encoding for {} is {code}", describe_symbol(symbol));
            }
        }
        if self.high() {
            log::trace!("{}", tree.render());
        }
        if tree.is_single_leaf() && self.low() {
            log::debug!("single-leaf tree: end-of-stream code is empty, no payload bits");
        }

        output.write_bits(BITS_PER_INT, HUFF_MAGIC)?;
        let header_bits = header::write_tree(&tree, output)?;
        let (bytes, payload_bits) = write_payload(&codes, input, output)?;

        let stats = CodecStats {
            bits_read: (counts.total_bytes() + bytes) * u64::from(BITS_PER_WORD),
            bits_written: u64::from(BITS_PER_INT) + header_bits + payload_bits,
        };
        if self.low() {
            log::debug!(
                "compressed {bytes} bytes: {} leaves, {header_bits} header bits, {payload_bits} payload bits",
                tree.leaf_count()
            );
        }
        Ok(stats)
    }

    fn decompress_inner<S, K>(&self, input: &mut S, output: &mut K) -> Result<CodecStats>
    where
        S: BitSource + ?Sized,
        K: BitSink + ?Sized,
    {
        let magic = input.read_bits(BITS_PER_INT)?;
        if magic != Some(HUFF_MAGIC) {
            return Err(HuffError::invalid_magic(magic));
        }

        let (tree, header_bits) = header::read_tree(input)?;
        if self.high() {
            log::trace!("{}", tree.render());
        }

        let mut stats = CodecStats {
            bits_read: u64::from(BITS_PER_INT) + header_bits,
            bits_written: 0,
        };
        self.decode_payload(&tree, input, output, &mut stats)?;
        if self.low() {
            log::debug!(
                "decompressed {} bytes from {} bits",
                stats.bits_written / u64::from(BITS_PER_WORD),
                stats.bits_read
            );
        }
        Ok(stats)
    }

    /// Walk the tree one bit at a time, emitting a byte at every leaf until
    /// the end-of-stream leaf is reached.
    fn decode_payload<S, K>(
        &self,
        tree: &HuffmanTree,
        input: &mut S,
        output: &mut K,
        stats: &mut CodecStats,
    ) -> Result<()>
    where
        S: BitSource + ?Sized,
        K: BitSink + ?Sized,
    {
        let root = &tree.root;

        // zero-length code: nothing to read
        if let HuffNode::Leaf { symbol, .. } = root {
            return if *symbol == END_OF_STREAM {
                Ok(())
            } else {
                Err(HuffError::corrupt_data(format!(
                    "single-leaf tree holds {} instead of the end-of-stream symbol",
                    describe_symbol(*symbol)
                )))
            };
        }

        let mut current = root;
        loop {
            let HuffNode::Internal { left, right, .. } = current else {
                return Err(HuffError::corrupt_data("tree walk stepped past a leaf"));
            };

            let bit = input.read_bits(1)?.ok_or_else(|| {
                HuffError::corrupt_data(format!(
                    "input ended after {} bits without an end-of-stream code",
                    stats.bits_read
                ))
            })?;
            stats.bits_read += 1;

            let next = if bit == 0 { &**left } else { &**right };
            match next {
                HuffNode::Leaf { symbol, .. } if *symbol == END_OF_STREAM => {
                    if self.high() {
                        log::trace!("reached end-of-stream leaf");
                    }
                    return Ok(());
                }
                HuffNode::Leaf { symbol, .. } => {
                    if self.high() {
                        log::trace!("decoded {}", describe_symbol(*symbol));
                    }
                    output.write_bits(BITS_PER_WORD, u32::from(*symbol))?;
                    stats.bits_written += u64::from(BITS_PER_WORD);
                    current = root;
                }
                HuffNode::Internal { .. } => current = next,
            }
        }
    }
}

/// Second pass: one code per 8-bit chunk, then the end-of-stream code.
/// Returns the number of chunks encoded and the payload bits written.
fn write_payload<S, K>(codes: &CodeTable, input: &mut S, output: &mut K) -> Result<(u64, u64)>
where
    S: BitSource + ?Sized,
    K: BitSink + ?Sized,
{
    let mut bytes = 0u64;
    let mut bits = 0u64;
    while let Some(chunk) = input.read_bits(BITS_PER_WORD)? {
        let byte = u8::try_from(chunk).map_err(|_| {
            HuffError::corrupt_data(format!("8-bit read returned out-of-range value {chunk}"))
        })?;
        let code = codes.get(u16::from(byte)).ok_or_else(|| {
            HuffError::corrupt_data(format!(
                "byte {chunk:#04x} was not seen on the counting pass; input changed between passes"
            ))
        })?;
        code.write_to(output)?;
        bytes += 1;
        bits += code.len() as u64;
    }

    let end = codes
        .get(END_OF_STREAM)
        .ok_or_else(|| HuffError::corrupt_data("code table has no end-of-stream code"))?;
    end.write_to(output)?;
    bits += end.len() as u64;
    Ok((bytes, bits))
}

/// Close `output` on every path. A close failure only surfaces when the
/// operation itself succeeded.
fn finish<K: BitSink + ?Sized>(result: Result<CodecStats>, output: &mut K) -> Result<CodecStats> {
    let closed = output.close();
    match (result, closed) {
        (Ok(stats), Ok(())) => Ok(stats),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            log::warn!("closing output after {} error failed: {close_err}", e.category());
            Err(e)
        }
    }
}

/// Compress with the default configuration
pub fn compress<S, K>(input: &mut S, output: &mut K) -> Result<CodecStats>
where
    S: BitSource + Rewind + ?Sized,
    K: BitSink + ?Sized,
{
    HuffmanCodec::default().compress(input, output)
}

/// Decompress with the default configuration
pub fn decompress<S, K>(input: &mut S, output: &mut K) -> Result<CodecStats>
where
    S: BitSource + ?Sized,
    K: BitSink + ?Sized,
{
    HuffmanCodec::default().decompress(input, output)
}

#[cfg(test)]
mod test {
    use std::io;

    use super::*;

    /// Sink that fails every write and records how often it was closed
    #[derive(Default)]
    struct FailingSink {
        closes: usize,
    }

    impl BitSink for FailingSink {
        fn write_bits(&mut self, _count: u8, _value: u32) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }

        fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            Ok(())
        }
    }

    /// Source that yields `first` on the counting pass and `second` after a rewind
    struct ShiftingSource {
        first: Vec<u32>,
        second: Vec<u32>,
        rewound: bool,
        pos: usize,
    }

    impl BitSource for ShiftingSource {
        fn read_bits(&mut self, _count: u8) -> io::Result<Option<u32>> {
            let values = if self.rewound { &self.second } else { &self.first };
            let value = values.get(self.pos).copied();
            self.pos += 1;
            Ok(value)
        }
    }

    impl Rewind for ShiftingSource {
        fn rewind(&mut self) -> io::Result<()> {
            self.rewound = true;
            self.pos = 0;
            Ok(())
        }
    }

    #[test]
    fn test_oversized_chunk_on_encode_pass() {
        let mut source = ShiftingSource {
            first: vec![0x41, 0x42],
            second: vec![0x41, 0x100],
            rewound: false,
            pos: 0,
        };
        let mut writer = BitWriter::new(Vec::new());
        let err = compress(&mut source, &mut writer).unwrap_err();
        match err {
            HuffError::CorruptData { reason } => assert!(reason.contains("256")),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(writer.is_closed());
    }

    #[test]
    fn test_empty_input_layout() {
        let codec = HuffmanCodec::default();
        let packed = codec.compress_bytes(&[]).unwrap();
        // magic, then leaf marker + 256, padded
        assert_eq!(packed, vec![0xFA, 0xCE, 0x82, 0x01, 0xC0, 0x00]);
        assert_eq!(codec.decompress_bytes(&packed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_repeated_byte_size() {
        let codec = HuffmanCodec::default();
        let data = vec![0x41u8; 1000];
        let mut reader = BitReader::new(Cursor::new(&data[..]));
        let mut writer = BitWriter::new(Vec::new());
        let stats = codec.compress(&mut reader, &mut writer).unwrap();

        // 32 magic + 21 header + 1000 one-bit codes + 1 end code
        assert_eq!(stats.bits_written, 1054);
        assert_eq!(stats.bits_read, 2 * 8000);
        let packed = writer.into_inner().unwrap();
        assert_eq!(packed.len(), 132);

        let mut reader = BitReader::new(Cursor::new(&packed[..]));
        let mut writer = BitWriter::new(Vec::new());
        let stats = codec.decompress(&mut reader, &mut writer).unwrap();
        assert_eq!(stats.bits_read, 1054);
        assert_eq!(stats.bits_written, 8000);
        assert_eq!(writer.into_inner().unwrap(), data);
    }

    #[test]
    fn test_output_closed_on_failure() {
        let mut reader = BitReader::new(Cursor::new(b"hello".to_vec()));
        let mut sink = FailingSink::default();
        let err = compress(&mut reader, &mut sink).unwrap_err();
        assert!(matches!(err, HuffError::Io(_)));
        assert_eq!(sink.closes, 1);

        let mut reader = BitReader::new(Cursor::new(vec![0u8; 8]));
        let mut sink = FailingSink::default();
        let err = decompress(&mut reader, &mut sink).unwrap_err();
        assert!(matches!(err, HuffError::InvalidMagic { found: Some(0), .. }));
        assert_eq!(sink.closes, 1);
    }

    #[test]
    fn test_single_non_eos_leaf_is_rejected() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(BITS_PER_INT, HUFF_MAGIC).unwrap();
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(9, u32::from(b'x')).unwrap();
        let packed = writer.into_inner().unwrap();

        let err = HuffmanCodec::default().decompress_bytes(&packed).unwrap_err();
        assert!(matches!(err, HuffError::CorruptData { .. }), "{err}");
    }

    #[test]
    fn test_debug_levels_order() {
        assert!(DebugLevel::High > DebugLevel::Low);
        assert!(DebugLevel::Low > DebugLevel::Off);
        let codec = HuffmanCodec::new(CodecConfig::with_debug(DebugLevel::High));
        assert_eq!(codec.config().debug, DebugLevel::High);

        // verbose logging must not change the output
        let data = b"logging does not alter the stream";
        let quiet = HuffmanCodec::default().compress_bytes(data).unwrap();
        let loud = codec.compress_bytes(data).unwrap();
        assert_eq!(quiet, loud);
        assert_eq!(codec.decompress_bytes(&loud).unwrap(), data);
    }
}
