//! Compression over real files through the byte-stream adapters.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};

use tempfile::NamedTempFile;
use tree_huff::{CodecConfig, DebugLevel, HuffError, HuffmanCodec};

#[test]
fn test_file_round_trip() {
    let text = "Huffman encoding is a greedy algorithm that builds optimal prefix codes.\n".repeat(64);

    let mut source = NamedTempFile::new().unwrap();
    source.write_all(text.as_bytes()).unwrap();
    source.flush().unwrap();

    let codec = HuffmanCodec::new(CodecConfig::with_debug(DebugLevel::Low));

    let compressed = NamedTempFile::new().unwrap();
    let stats = codec
        .compress_stream(
            File::open(source.path()).unwrap(),
            BufWriter::new(compressed.reopen().unwrap()),
        )
        .unwrap();
    assert_eq!(stats.bits_read, 2 * 8 * text.len() as u64);

    let packed_len = std::fs::metadata(compressed.path()).unwrap().len();
    assert_eq!(packed_len, (stats.bits_written + 7) / 8);
    assert!(packed_len < text.len() as u64);

    let restored = NamedTempFile::new().unwrap();
    codec
        .decompress_stream(
            File::open(compressed.path()).unwrap(),
            BufWriter::new(restored.reopen().unwrap()),
        )
        .unwrap();

    assert_eq!(std::fs::read_to_string(restored.path()).unwrap(), text);
}

#[test]
fn test_rewind_uses_offset_zero() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"abcabcabc").unwrap();
    // leave the cursor at the end; compression still sees every byte
    file.seek(SeekFrom::End(0)).unwrap();

    let mut packed = Vec::new();
    let codec = HuffmanCodec::default();
    codec.compress_stream(file.as_file_mut(), &mut packed).unwrap();
    assert_eq!(codec.decompress_bytes(&packed).unwrap(), b"abcabcabc");
}

#[test]
fn test_foreign_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"PK\x03\x04 definitely a zip archive").unwrap();
    file.flush().unwrap();

    let mut out = Vec::new();
    let err = HuffmanCodec::default()
        .decompress_stream(File::open(file.path()).unwrap(), &mut out)
        .unwrap_err();
    assert!(matches!(err, HuffError::InvalidMagic { .. }));
    assert!(out.is_empty());
}
