//! Bit-level input and output.
//!
//! The codec only ever talks to a [`BitSource`] and a [`BitSink`]. The
//! [`BitReader`] and [`BitWriter`] adapters put those seams on top of any
//! byte stream. Bits are packed most significant first: the first bit
//! written to a byte lands in bit 7.

use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};

/// Readable stream of bits
pub trait BitSource {
    /// Read the next `count` bits (1..=32), first bit in the most significant
    /// position. Returns `Ok(None)` once fewer than `count` bits remain.
    fn read_bits(&mut self, count: u8) -> io::Result<Option<u32>>;
}

/// Source that can be restarted from its first bit
pub trait Rewind {
    fn rewind(&mut self) -> io::Result<()>;
}

/// Writable stream of bits
pub trait BitSink {
    /// Write the low `count` bits (1..=32) of `value`, most significant first.
    fn write_bits(&mut self, count: u8, value: u32) -> io::Result<()>;

    /// Pad the last partial byte with zeros and flush. Closing twice is a no-op.
    fn close(&mut self) -> io::Result<()>;
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn read_bits(&mut self, count: u8) -> io::Result<Option<u32>> {
        (**self).read_bits(count)
    }
}

impl<S: Rewind + ?Sized> Rewind for &mut S {
    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }
}

impl<K: BitSink + ?Sized> BitSink for &mut K {
    fn write_bits(&mut self, count: u8, value: u32) -> io::Result<()> {
        (**self).write_bits(count, value)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

fn check_count(count: u8) -> io::Result<()> {
    if (1..=32).contains(&count) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("bit count {count} outside 1..=32"),
        ))
    }
}

/// [`BitSource`] over a byte reader
pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    acc: u8,
    bits_left: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner: BufReader::new(inner),
            acc: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Bits handed out since construction or the last rewind
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bits(&mut self, count: u8) -> io::Result<Option<u32>> {
        check_count(count)?;
        let mut value = 0u32;
        for _ in 0..count {
            if self.bits_left == 0 {
                match self.next_byte()? {
                    Some(byte) => {
                        self.acc = byte;
                        self.bits_left = 8;
                    }
                    None => return Ok(None),
                }
            }
            self.bits_left -= 1;
            value = (value << 1) | u32::from((self.acc >> self.bits_left) & 1);
        }
        self.bits_read += u64::from(count);
        Ok(Some(value))
    }
}

impl<R: Read + Seek> Rewind for BitReader<R> {
    /// Seeks the underlying reader back to offset 0.
    fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.acc = 0;
        self.bits_left = 0;
        self.bits_read = 0;
        Ok(())
    }
}

/// [`BitSink`] over a byte writer
///
/// Dropping a writer that was never closed closes it, ignoring errors, the
/// same way `BufWriter` flushes on drop. Call [`BitSink::close`] or
/// [`BitWriter::into_inner`] to observe them.
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    acc: u8,
    pending: u8,
    bits_written: u64,
    closed: bool,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner: Some(inner),
            acc: 0,
            pending: 0,
            bits_written: 0,
            closed: false,
        }
    }

    /// Bits accepted so far, not counting close-time padding
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the writer and hand back the underlying stream
    pub fn into_inner(mut self) -> io::Result<W> {
        self.close()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::other("bit writer already taken"))
    }

    fn emit(&mut self, byte: u8) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&[byte]),
            None => Err(io::Error::other("bit writer already taken")),
        }
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bits(&mut self, count: u8, value: u32) -> io::Result<()> {
        check_count(count)?;
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write to a closed bit writer",
            ));
        }
        for shift in (0..count).rev() {
            let bit = ((value >> shift) & 1) as u8;
            self.acc = (self.acc << 1) | bit;
            self.pending += 1;
            if self.pending == 8 {
                let byte = self.acc;
                self.acc = 0;
                self.pending = 0;
                self.emit(byte)?;
            }
        }
        self.bits_written += u64::from(count);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        // pending bits survive a failed emit so a retry can still write them
        if self.pending > 0 {
            let byte = self.acc << (8 - self.pending);
            self.emit(byte)?;
            self.acc = 0;
            self.pending = 0;
        }
        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }
        self.closed = true;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if !self.closed && self.inner.is_some() {
            let _ = self.close();
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(3, 0b010).unwrap();
        writer.write_bits(9, 0x1FF).unwrap();
        assert_eq!(writer.bits_written(), 13);

        let bytes = writer.into_inner().unwrap();
        // 1 010 1111 | 11111 + 000 padding
        assert_eq!(bytes, vec![0b1010_1111, 0b1111_1000]);
    }

    #[test]
    fn test_read_back_mixed_widths() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(32, 0xface_8201).unwrap();
        writer.write_bits(9, 256).unwrap();
        writer.write_bits(1, 0).unwrap();
        writer.write_bits(7, 0x55).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = BitReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xface_8201));
        assert_eq!(reader.read_bits(9).unwrap(), Some(256));
        assert_eq!(reader.read_bits(1).unwrap(), Some(0));
        assert_eq!(reader.read_bits(7).unwrap(), Some(0x55));
        assert_eq!(reader.bits_read(), 49);
    }

    #[test]
    fn test_end_of_stream_sentinel() {
        let mut reader = BitReader::new(Cursor::new(vec![0xAB]));
        assert_eq!(reader.read_bits(4).unwrap(), Some(0xA));
        // only four bits remain
        assert_eq!(reader.read_bits(8).unwrap(), None);

        let mut empty = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert_eq!(empty.read_bits(1).unwrap(), None);
    }

    #[test]
    fn test_rewind() {
        let mut reader = BitReader::new(Cursor::new(vec![0x12, 0x34]));
        assert_eq!(reader.read_bits(12).unwrap(), Some(0x123));
        reader.rewind().unwrap();
        assert_eq!(reader.bits_read(), 0);
        assert_eq!(reader.read_bits(16).unwrap(), Some(0x1234));
    }

    #[test]
    fn test_bad_bit_counts() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 8]));
        let err = reader.read_bits(0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(reader.read_bits(33).is_err());

        let mut writer = BitWriter::new(Vec::new());
        assert!(writer.write_bits(40, 0).is_err());
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(2, 0b11).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());
        assert!(writer.write_bits(1, 1).is_err());
        assert_eq!(writer.into_inner().unwrap(), vec![0b1100_0000]);
    }

    /// Writer whose first `failures` writes fail
    struct FlakyWriter {
        failures: usize,
        data: Vec<u8>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::other("device busy"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_close_keeps_tail_byte() {
        let mut writer = BitWriter::new(FlakyWriter {
            failures: 1,
            data: Vec::new(),
        });
        writer.write_bits(4, 0b1011).unwrap();

        assert!(writer.close().is_err());
        assert!(!writer.is_closed());

        writer.close().unwrap();
        assert!(writer.is_closed());
        let inner = writer.into_inner().unwrap();
        assert_eq!(inner.data, vec![0b1011_0000]);
    }

    #[test]
    fn test_drop_flushes_partial_byte() {
        let mut out = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            writer.write_bits(4, 0xF).unwrap();
        }
        assert_eq!(out, vec![0xF0]);
    }
}
