use std::fmt::Write as _;

use log::debug;

use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::priority_queue::{PriorityQueue, QueueOrder};

/// Huffman tree built from a frequency table. Empty input gives a tree with no root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: Option<HuffNode>,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Builds the tree by repeatedly merging the two front entries of the
    /// queue. The same table always produces the same tree, which is what
    /// lets the decoder rebuild it from the stored frequencies alone.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut queue = PriorityQueue::with_capacity(frequencies.symbol_count());
        for (symbol, count) in frequencies.iter_present() {
            queue.enqueue(HuffNode::new(symbol, count));
        }

        let tree = HuffmanTree::build_from_queue(queue)?;
        debug!(
            "built huffman tree: {} leaves, depth {}, weight {}",
            tree.leaf_count(),
            tree.depth(),
            tree.weight()
        );
        Ok(tree)
    }

    fn build_from_queue(mut queue: PriorityQueue<HuffNode>) -> Result<Self> {
        if queue.is_empty() {
            return Ok(HuffmanTree { root: None });
        }

        while queue.len() >= 2 {
            let left = queue.dequeue()?;
            let right = queue.dequeue()?;
            queue.enqueue(HuffNode::merge(left, right));
            debug_assert!(queue.is_sorted());
        }

        let root = queue.dequeue()?;
        Ok(HuffmanTree { root: Some(root) })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn weight(&self) -> u64 {
        self.root.as_ref().map_or(0, HuffNode::weight)
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::leaf_count)
    }

    /// Longest root-to-leaf path. A lone leaf still counts as depth 1 since it gets a 1-bit code.
    pub fn depth(&self) -> usize {
        match &self.root {
            None => 0,
            Some(HuffNode::Leaf { .. }) => 1,
            Some(node) => node.depth(),
        }
    }

    /// Indented textual dump of the tree structure.
    pub fn render(&self) -> String {
        let mut out = String::from("Huffman Tree Structure:\n");
        match &self.root {
            None => out.push_str("  (empty)\n"),
            Some(root) => render_node(&mut out, root, 0, "root"),
        }
        out
    }
}

fn render_node(out: &mut String, node: &HuffNode, depth: usize, label: &str) {
    let indent = "  ".repeat(depth);
    match node {
        HuffNode::Leaf { symbol, weight } => {
            let shown = if symbol.is_ascii_graphic() { *symbol as char } else { '.' };
            let _ = writeln!(
                out,
                "{}{}-> Leaf: '{}' ({}) [weight: {}]",
                indent, label, shown, symbol, weight
            );
        }
        HuffNode::Internal { weight, left, right } => {
            let _ = writeln!(out, "{}{}-> Internal [weight: {}]", indent, label, weight);
            render_node(out, left, depth + 1, "L");
            render_node(out, right, depth + 1, "R");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: u8, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// `left` was dequeued first and becomes the 0 branch.
    pub fn merge(left: Self, right: Self) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl QueueOrder for HuffNode {
    // Two leaves tie-break strictly on symbol. Anything involving an internal
    // node compares weights with `<=`, so a merged node queues up behind
    // every equal-weight entry already present. Containers depend on this
    // exact order; do not collapse it into one relation.
    fn precedes(&self, other: &Self) -> bool {
        match (self, other) {
            (
                HuffNode::Leaf { weight: w1, symbol: s1 },
                HuffNode::Leaf { weight: w2, symbol: s2 },
            ) => {
                if w1 == w2 {
                    s1 < s2
                } else {
                    w1 < w2
                }
            }
            _ => self.weight() <= other.weight(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaf(symbol: u8, weight: u64) -> HuffNode {
        HuffNode::new(symbol, weight)
    }

    #[test]
    fn empty_input_has_no_root() {
        let tree = HuffmanTree::from_bytes(b"").unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.weight(), 0);
    }

    #[test]
    fn single_symbol_root_is_leaf() {
        let tree = HuffmanTree::from_bytes(b"zzzz").unwrap();
        assert_eq!(tree.root, Some(leaf(b'z', 4)));
        assert!(tree.root.as_ref().unwrap().is_leaf());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn two_symbols_lighter_goes_left() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        assert_eq!(tree.root, Some(HuffNode::merge(leaf(b'b', 1), leaf(b'a', 3))));
    }

    #[test]
    fn equal_leaves_break_ties_on_symbol() {
        let tree = HuffmanTree::from_bytes(b"CBACBACBA").unwrap();
        // A and B merge first; the merged node (6) queues behind C (3).
        let expected = HuffNode::merge(
            leaf(b'C', 3),
            HuffNode::merge(leaf(b'A', 3), leaf(b'B', 3)),
        );
        assert_eq!(tree.root, Some(expected));
    }

    #[test]
    fn merged_node_goes_behind_equal_weight_leaf() {
        // a:1 b:1 c:2 -> (a,b)=2 queues behind c
        let mut freq = FrequencyTable::new();
        freq.set(b'a', 1);
        freq.set(b'b', 1);
        freq.set(b'c', 2);
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let expected = HuffNode::merge(
            leaf(b'c', 2),
            HuffNode::merge(leaf(b'a', 1), leaf(b'b', 1)),
        );
        assert_eq!(tree.root, Some(expected));
    }

    #[test]
    fn equal_weight_internal_nodes_merge_in_creation_order() {
        // (a,b)=2 is created before (c,d)=2, so it stays in front and becomes the 0 branch
        let mut freq = FrequencyTable::new();
        for symbol in [b'a', b'b', b'c', b'd'] {
            freq.set(symbol, 1);
        }
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let expected = HuffNode::merge(
            HuffNode::merge(leaf(b'a', 1), leaf(b'b', 1)),
            HuffNode::merge(leaf(b'c', 1), leaf(b'd', 1)),
        );
        assert_eq!(tree.root, Some(expected));

        let codes = crate::code_table::CodeTable::from_tree(&tree);
        let rendered: Vec<String> = [b'a', b'b', b'c', b'd']
            .iter()
            .map(|&s| codes.get(s).unwrap().to_string())
            .collect();
        assert_eq!(rendered, vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn leaf_order_is_strict_internal_order_is_not() {
        let a = leaf(1, 5);
        let b = leaf(2, 5);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));
        assert!(!a.precedes(&a));

        let i = HuffNode::merge(leaf(3, 2), leaf(4, 3));
        assert!(i.precedes(&a));
        assert!(a.precedes(&i));
        assert!(i.precedes(&i.clone()));
    }

    #[test]
    fn weight_is_sum_of_leaves() {
        let data: Vec<u8> = (0..=255u8).chain(0..=127u8).collect();
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        assert_eq!(tree.weight(), data.len() as u64);
        assert_eq!(tree.leaf_count(), 256);
    }

    #[test]
    fn same_table_same_tree() {
        let freq = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let a = HuffmanTree::from_frequencies(&freq).unwrap();
        let b = HuffmanTree::from_frequencies(&freq.clone()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn render_lists_leaves() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        let text = tree.render();
        assert!(text.contains("root-> Internal [weight: 4]"));
        assert!(text.contains("L-> Leaf: 'b' (98) [weight: 1]"));
        assert!(text.contains("R-> Leaf: 'a' (97) [weight: 3]"));
    }
}
