use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, info, warn};

use crate::bitstream::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::container::ContainerHeader;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

const OUTPUT_CHUNK: usize = 8192;

/// Sizes reported after a compress or decompress run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
}

impl CompressionStats {
    /// Output size as a fraction of input size. Empty input reports 0.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// A Huffman tree together with the code table derived from it.
pub struct HuffmanCodec {
    tree: HuffmanTree,
    code_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let code_table = CodeTable::from_tree(&tree);
        HuffmanCodec { tree, code_table }
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        Ok(Self::new(HuffmanTree::from_frequencies(frequencies)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    /// Appends the code of every byte in `input` to `bits`. Returns the number of bytes encoded.
    pub fn encode<R: Read, W: Write>(&self, mut input: R, bits: &mut BitWriter<W>) -> Result<u64> {
        let mut buf = [0u8; 8192];
        let mut count = 0u64;
        loop {
            let n = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                let code = self
                    .code_table
                    .get(byte)
                    .ok_or(HuffmanError::SymbolNotInTable(byte))?;
                bits.write_bits(code)?;
            }
            count += n as u64;
        }
        Ok(count)
    }

    /// Walks the tree bit by bit until exactly `original_length` symbols
    /// have been written. Padding after the last symbol is never read.
    pub fn decode<R: Read, W: Write>(
        &self,
        bits: &mut BitReader<R>,
        original_length: u64,
        output: &mut W,
    ) -> Result<u64> {
        let root = match &self.tree.root {
            Some(root) if original_length > 0 => root,
            _ => return Ok(0),
        };

        let mut pending = Vec::with_capacity(OUTPUT_CHUNK);
        let mut emitted = 0u64;
        let mut node = root;
        loop {
            let bit = bits
                .read_bit()?
                .ok_or(HuffmanError::Truncated("payload ends before all symbols were decoded"))?;

            if let HuffNode::Internal { left, right, .. } = node {
                node = if bit { &**right } else { &**left };
            }

            if let HuffNode::Leaf { symbol, .. } = node {
                pending.push(*symbol);
                emitted += 1;
                if emitted == original_length {
                    break;
                }
                if pending.len() == OUTPUT_CHUNK {
                    output.write_all(&pending)?;
                    pending.clear();
                }
                node = root;
            }
        }

        output.write_all(&pending)?;
        Ok(emitted)
    }

    /// Two-pass compression of a seekable source: count, rewind, encode.
    pub fn compress<R: Read + Seek, W: Write>(mut input: R, mut output: W) -> Result<CompressionStats> {
        let start = input.stream_position()?;
        let (frequencies, original_length) = FrequencyTable::from_reader(&mut input)?;
        input.seek(SeekFrom::Start(start))?;

        let header = ContainerHeader::new(original_length, frequencies);
        let codec = HuffmanCodec::from_frequencies(&header.frequencies)?;
        header.write(&mut output)?;

        let mut bits = BitWriter::new(&mut output);
        let encoded = codec.encode(&mut input, &mut bits)?;
        let (_, payload_bits) = bits.finish()?;

        if encoded != original_length {
            return Err(HuffmanError::InputChanged {
                expected: original_length,
                actual: encoded,
            });
        }

        let stats = CompressionStats {
            input_bytes: original_length,
            output_bytes: header.encoded_len() + payload_bits.div_ceil(8),
            distinct_symbols: header.frequencies.symbol_count(),
            payload_bits,
        };
        debug!(
            "compressed {} bytes into {} ({} distinct symbols, {} payload bits)",
            stats.input_bytes, stats.output_bytes, stats.distinct_symbols, stats.payload_bits
        );
        Ok(stats)
    }

    /// Compresses an in-memory buffer. Used for sources that cannot be rewound.
    pub fn compress_bytes<W: Write>(data: &[u8], output: W) -> Result<CompressionStats> {
        Self::compress(Cursor::new(data), output)
    }

    /// Buffers a source that cannot be rewound, then compresses it.
    pub fn compress_unseekable<R: Read, W: Write>(mut input: R, output: W) -> Result<CompressionStats> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        debug!("buffered {} bytes from a non-seekable source", data.len());
        Self::compress_bytes(&data, output)
    }

    pub fn compress_to_vec(data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        Self::compress_bytes(data, &mut out)?;
        Ok(out)
    }

    /// Reads a container and writes the original bytes to `output`.
    ///
    /// On a format error, bytes decoded before the failure may already have
    /// been written; callers that need all-or-nothing output should write to
    /// a scratch location first.
    pub fn decompress<R: Read, W: Write>(mut input: R, mut output: W) -> Result<CompressionStats> {
        let header = ContainerHeader::read(&mut input)?;
        let codec = HuffmanCodec::from_frequencies(&header.frequencies)?;

        let mut bits = BitReader::new(input);
        let emitted = codec.decode(&mut bits, header.original_length, &mut output)?;
        output.flush()?;

        let consumed = bits.bytes_consumed();
        let trailing = bits.remaining_bytes()?;
        if trailing > 0 {
            warn!("ignoring {} trailing bytes after the payload", trailing);
        }

        let stats = CompressionStats {
            input_bytes: header.encoded_len() + consumed,
            output_bytes: emitted,
            distinct_symbols: header.frequencies.symbol_count(),
            payload_bits: bits.bits_read(),
        };
        debug!(
            "decompressed {} bytes from {} byte container",
            stats.output_bytes, stats.input_bytes
        );
        Ok(stats)
    }

    pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        Self::decompress(data, &mut out)?;
        Ok(out)
    }

    pub fn encode_from_file(input: File, output: File) -> Result<CompressionStats> {
        let mut writer = BufWriter::new(output);
        let stats = Self::compress(BufReader::new(input), &mut writer)?;
        writer.flush()?;
        info!("wrote {} byte container", stats.output_bytes);
        Ok(stats)
    }

    pub fn decode_from_file(input: File, output: File) -> Result<CompressionStats> {
        let mut writer = BufWriter::new(output);
        let stats = Self::decompress(BufReader::new(input), &mut writer)?;
        writer.flush()?;
        info!("restored {} bytes", stats.output_bytes);
        Ok(stats)
    }
}
