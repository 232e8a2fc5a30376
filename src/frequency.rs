use std::io::{self, Read};

/// Byte occurrence counts for all 256 symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable { counts: [0; 256] }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes.iter().fold(FrequencyTable::new(), |mut acc, &byte| {
            acc.increment(byte);
            acc
        })
    }

    /// Counts every byte until EOF. Returns the table and the number of bytes read.
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<(Self, u64)> {
        let mut table = FrequencyTable::new();
        let mut buf = [0u8; 8192];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            for &byte in &buf[..n] {
                table.increment(byte);
            }
            total += n as u64;
        }
        Ok((table, total))
    }

    pub fn increment(&mut self, symbol: u8) {
        self.counts[symbol as usize] += 1;
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    // only used when rehydrating from a container
    pub fn set(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = count;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct symbols with a nonzero count.
    pub fn symbol_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(symbol, count)` pairs for present symbols, ascending by symbol.
    pub fn iter_present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn counts_bytes() {
        let table = FrequencyTable::from_bytes(b"aaab");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 1);
        assert_eq!(table.get(b'c'), 0);
        assert_eq!(table.total(), 4);
        assert_eq!(table.symbol_count(), 2);
    }

    #[test]
    fn reader_matches_slice() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let (table, total) = FrequencyTable::from_reader(&mut Cursor::new(&data)).unwrap();
        assert_eq!(total, data.len() as u64);
        assert_eq!(table, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn present_symbols_are_ascending() {
        let table = FrequencyTable::from_bytes(b"zyxzz");
        let present: Vec<_> = table.iter_present().collect();
        assert_eq!(present, vec![(b'x', 1), (b'y', 1), (b'z', 3)]);
    }

    #[test]
    fn set_overrides_count() {
        let mut table = FrequencyTable::new();
        table.set(255, 42);
        table.increment(255);
        assert_eq!(table.get(255), 43);
        assert_eq!(table.total(), 43);
    }
}
