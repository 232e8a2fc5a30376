use std::fmt;

/// Growable bit sequence packed MSB-first into bytes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| self.bits[i / 8] & (1 << (7 - i % 8)) != 0)
    }

    /// True when every bit of `self` matches the start of `other`.
    pub fn is_prefix_of(&self, other: &BitVec) -> bool {
        self.bit_count <= other.bit_count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bv = BitVec::new();
        for bit in iter {
            bv.push_bit(bit);
        }
        bv
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn packs_msb_first() {
        let bv: BitVec = [true, false, true, true, false, false, false, false, true]
            .into_iter()
            .collect();
        assert_eq!(bv.len(), 9);
        assert_eq!(bv.bits, vec![0b1011_0000, 0b1000_0000]);
        assert_eq!(bv.to_string(), "101100001");
        assert_eq!(bv.iter().last(), Some(true));
    }

    #[test]
    fn prefix_check() {
        let a: BitVec = [true, false].into_iter().collect();
        let b: BitVec = [true, false, true].into_iter().collect();
        let c: BitVec = [true, true].into_iter().collect();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(!c.is_prefix_of(&b));
    }
}
