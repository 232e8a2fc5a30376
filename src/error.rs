use std::io;

use thiserror::Error;

use crate::priority_queue::QueueErr;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a huffman container: expected magic {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("container is truncated: {0}")]
    Truncated(&'static str),

    #[error("symbol count {0} is larger than the 256 possible byte values")]
    InvalidSymbolCount(u32),

    #[error("frequency table is not in ascending symbol order at symbol {0}")]
    UnsortedSymbols(u8),

    #[error("symbol {0} is listed with a zero frequency")]
    ZeroFrequency(u8),

    #[error("frequencies sum to {actual} but the header claims {expected} bytes")]
    FrequencyMismatch { expected: u64, actual: u64 },

    #[error("byte {0:#04x} has no code; the input changed between passes")]
    SymbolNotInTable(u8),

    #[error("input changed between passes: counted {expected} bytes, re-read {actual}")]
    InputChanged { expected: u64, actual: u64 },

    #[error("priority queue error: {0:?}")]
    Queue(QueueErr),
}

impl From<QueueErr> for HuffmanError {
    fn from(e: QueueErr) -> Self {
        HuffmanError::Queue(e)
    }
}

impl HuffmanError {
    /// True for every error that means the container bytes themselves are bad.
    pub fn is_corrupt(&self) -> bool {
        !matches!(
            self,
            HuffmanError::Io(_)
                | HuffmanError::Queue(_)
                | HuffmanError::SymbolNotInTable(_)
                | HuffmanError::InputChanged { .. }
        )
    }

    /// Turns an unexpected EOF from `read_exact` into a [`HuffmanError::Truncated`].
    pub(crate) fn from_read(e: io::Error, what: &'static str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            HuffmanError::Truncated(what)
        } else {
            HuffmanError::Io(e)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eof_maps_to_truncated() {
        let e = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err = HuffmanError::from_read(e, "header");
        assert!(matches!(err, HuffmanError::Truncated("header")));
        assert!(err.is_corrupt());
    }

    #[test]
    fn other_io_errors_stay_io() {
        let e = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err = HuffmanError::from_read(e, "header");
        assert!(matches!(err, HuffmanError::Io(_)));
        assert!(!err.is_corrupt());
    }
}
