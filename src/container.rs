//! On-disk container header.
//!
//! ```text
//! magic            4 bytes   "HUFF"
//! original_length  u64 LE
//! symbol_count     u32 LE
//! entries          symbol_count x (u8 symbol, u64 LE frequency), ascending symbol
//! payload          packed code bits, MSB-first, last byte zero-padded
//! ```

use std::io::{Read, Write};

use log::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

pub const MAGIC: [u8; 4] = *b"HUFF";
pub const FILE_EXTENSION: &str = "huff";

const FIXED_HEADER_LEN: u64 = 4 + 8 + 4;
const ENTRY_LEN: u64 = 1 + 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub original_length: u64,
    pub frequencies: FrequencyTable,
}

impl ContainerHeader {
    pub fn new(original_length: u64, frequencies: FrequencyTable) -> Self {
        ContainerHeader {
            original_length,
            frequencies,
        }
    }

    /// Serialized size of this header in bytes.
    pub fn encoded_len(&self) -> u64 {
        FIXED_HEADER_LEN + ENTRY_LEN * self.frequencies.symbol_count() as u64
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&self.original_length.to_le_bytes())?;

        let symbol_count = self.frequencies.symbol_count() as u32;
        writer.write_all(&symbol_count.to_le_bytes())?;

        for (symbol, count) in self.frequencies.iter_present() {
            writer.write_all(&[symbol])?;
            writer.write_all(&count.to_le_bytes())?;
        }
        Ok(())
    }

    /// Reads and validates a header. Nothing after the frequency table is consumed.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| HuffmanError::from_read(e, "missing magic tag"))?;
        if magic != MAGIC {
            return Err(HuffmanError::BadMagic {
                expected: MAGIC,
                found: magic,
            });
        }

        let original_length = read_u64(reader, "missing original length")?;
        let symbol_count = read_u32(reader, "missing symbol count")?;
        if symbol_count > 256 {
            return Err(HuffmanError::InvalidSymbolCount(symbol_count));
        }

        let mut frequencies = FrequencyTable::new();
        let mut previous: Option<u8> = None;
        let mut total: u64 = 0;
        for _ in 0..symbol_count {
            let mut symbol = [0u8; 1];
            reader
                .read_exact(&mut symbol)
                .map_err(|e| HuffmanError::from_read(e, "frequency table cut short"))?;
            let symbol = symbol[0];
            let count = read_u64(reader, "frequency table cut short")?;

            if previous.map_or(false, |p| p >= symbol) {
                return Err(HuffmanError::UnsortedSymbols(symbol));
            }
            if count == 0 {
                return Err(HuffmanError::ZeroFrequency(symbol));
            }
            total = total.checked_add(count).ok_or(HuffmanError::FrequencyMismatch {
                expected: original_length,
                actual: u64::MAX,
            })?;

            frequencies.set(symbol, count);
            previous = Some(symbol);
        }

        if total != original_length {
            return Err(HuffmanError::FrequencyMismatch {
                expected: original_length,
                actual: total,
            });
        }

        debug!(
            "read container header: {} bytes, {} distinct symbols",
            original_length, symbol_count
        );
        Ok(ContainerHeader {
            original_length,
            frequencies,
        })
    }
}

fn read_u64<R: Read>(reader: &mut R, what: &'static str) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| HuffmanError::from_read(e, what))?;
    Ok(u64::from_le_bytes(bytes))
}

fn read_u32<R: Read>(reader: &mut R, what: &'static str) -> Result<u32> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| HuffmanError::from_read(e, what))?;
    Ok(u32::from_le_bytes(bytes))
}
