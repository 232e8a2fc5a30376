use log::trace;

use crate::bit_vec::BitVec;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Bit sequence assigned to one symbol.
pub type Code = BitVec;

/// Symbol to code mapping. Only symbols present in the tree have a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable { codes: vec![None; 256] };
        match &tree.root {
            None => {}
            // a lone leaf would otherwise get an empty code
            Some(HuffNode::Leaf { symbol, .. }) => {
                table.codes[*symbol as usize] = Some(std::iter::once(true).collect());
            }
            Some(root) => table.walk(root, &mut Vec::new()),
        }
        table
    }

    fn walk(&mut self, node: &HuffNode, path: &mut Vec<bool>) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                let code: Code = path.iter().copied().collect();
                trace!("code for {:#04x}: {}", symbol, code);
                self.codes[*symbol as usize] = Some(code);
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` pairs, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn table_for(bytes: &[u8]) -> CodeTable {
        CodeTable::from_tree(&HuffmanTree::from_bytes(bytes).unwrap())
    }

    #[test]
    fn two_symbols_get_one_bit_each() {
        let table = table_for(b"aaab");
        assert_eq!(table.get(b'b').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "1");
        assert_eq!(table.get(b'c'), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn single_symbol_gets_bit_one() {
        let table = table_for(&[7u8; 10]);
        assert_eq!(table.get(7).unwrap().to_string(), "1");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_tree_has_no_codes() {
        let table = table_for(b"");
        assert!(table.is_empty());
    }

    #[test]
    fn tied_frequencies_resolve_the_same_way() {
        let mut freq = FrequencyTable::new();
        freq.set(b'A', 3);
        freq.set(b'B', 3);
        freq.set(b'C', 3);
        let first = CodeTable::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap());
        let second = CodeTable::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap());
        assert_eq!(first, second);
        assert_eq!(first.get(b'C').unwrap().to_string(), "0");
        assert_eq!(first.get(b'A').unwrap().to_string(), "10");
        assert_eq!(first.get(b'B').unwrap().to_string(), "11");
    }

    #[test]
    fn codes_are_prefix_free() {
        let data: Vec<u8> = (0..4000u32).map(|i| ((i * i) % 97) as u8).collect();
        let table = table_for(&data);
        let codes: Vec<_> = table.iter().collect();
        for (a, ca) in &codes {
            for (b, cb) in &codes {
                if a != b {
                    assert!(!ca.is_prefix_of(cb), "{} is a prefix of {}", a, b);
                }
            }
        }
    }
}
