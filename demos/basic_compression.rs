use std::fs::File;
use std::io::BufWriter;

use tree_huff::{CodecConfig, DebugLevel, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempfile::tempdir()?;
    let sample_path = workdir.path().join("sample.txt");
    let packed_path = workdir.path().join("sample.huff");
    let restored_path = workdir.path().join("restored.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
    std::fs::write(&sample_path, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let codec = HuffmanCodec::new(CodecConfig::with_debug(DebugLevel::Off));

    let stats = codec.compress_stream(
        File::open(&sample_path)?,
        BufWriter::new(File::create(&packed_path)?),
    )?;
    let compressed_size = std::fs::metadata(&packed_path)?.len();
    println!(
        "Compressed to: {} bytes ({:.1}% of original, {} bits before padding)",
        compressed_size,
        compressed_size as f64 / sample_text.len() as f64 * 100.0,
        stats.bits_written
    );

    codec.decompress_stream(
        File::open(&packed_path)?,
        BufWriter::new(File::create(&restored_path)?),
    )?;

    let restored = std::fs::read_to_string(&restored_path)?;
    if restored != sample_text {
        return Err("decompressed text does not match the original".into());
    }
    println!("Decompression successful, data matches exactly.");

    Ok(())
}
