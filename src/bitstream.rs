use std::io::{self, Read, Write};

use crate::bit_vec::BitVec;

/// Packs bits MSB-first and hands each completed byte to the inner writer.
pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    buffer_length: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            buffer: 0,
            buffer_length: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.buffer_length += 1;
        self.bits_written += 1;

        if self.buffer_length == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.buffer_length = 0;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitVec) -> io::Result<()> {
        for bit in bits.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero-pads and flushes a trailing partial byte, returning the inner
    /// writer and the number of payload bits (padding excluded).
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if self.buffer_length > 0 {
            let last = self.buffer << (8 - self.buffer_length);
            self.inner.write_all(&[last])?;
        }
        self.inner.flush()?;
        Ok((self.inner, self.bits_written))
    }
}

/// Yields bits MSB-first from a byte stream.
pub struct BitReader<R: Read> {
    inner: R,
    chunk: Box<[u8]>,
    chunk_len: usize,
    pos: usize,
    bit_offset: u8,
    bytes_read: u64,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            chunk: vec![0u8; 8192].into_boxed_slice(),
            chunk_len: 0,
            pos: 0,
            bit_offset: 0,
            bytes_read: 0,
            bits_read: 0,
        }
    }

    fn fill(&mut self) -> io::Result<bool> {
        loop {
            match self.inner.read(&mut self.chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.chunk_len = n;
                    self.pos = 0;
                    self.bytes_read += n as u64;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Next bit, or `None` once the stream is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.pos >= self.chunk_len && !self.fill()? {
            return Ok(None);
        }

        let byte = self.chunk[self.pos];
        let bit = byte & (0x80 >> self.bit_offset) != 0;
        self.bit_offset += 1;
        self.bits_read += 1;
        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.pos += 1;
        }
        Ok(Some(bit))
    }

    /// Bits handed out by `read_bit`, padding never read is not counted.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Bytes touched so far, counting a partially read byte as consumed.
    pub fn bytes_consumed(&self) -> u64 {
        let unread = self.chunk_len.saturating_sub(self.pos) as u64;
        self.bytes_read - unread + (self.bit_offset > 0) as u64
    }

    /// Bytes left in the stream after the byte currently being read. Drains the inner reader.
    pub fn remaining_bytes(&mut self) -> io::Result<u64> {
        let mut left = self.chunk_len.saturating_sub(self.pos) as u64;
        if self.bit_offset > 0 {
            left -= 1;
        }
        let before = self.bytes_read;
        while self.fill()? {}
        Ok(left + (self.bytes_read - before))
    }
}
