/// Ordering used by [`PriorityQueue`]. `a.precedes(b)` means `a` may sit in
/// front of `b`. The relation does not need to be a total order.
pub trait QueueOrder {
    fn precedes(&self, other: &Self) -> bool;
}

/// Sorted queue, front is the minimum. Insertion is a linear scan, which is
/// fine for the at most 256 entries a byte alphabet produces.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    elements: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueErr {
    QueueUnderflow,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue { elements: vec![] }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQueue { elements: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }
}

impl<T: QueueOrder> PriorityQueue<T> {
    /// Inserts behind every entry that precedes `value`.
    pub fn enqueue(&mut self, value: T) {
        let pos = self
            .elements
            .iter()
            .position(|existing| !existing.precedes(&value))
            .unwrap_or(self.elements.len());
        self.elements.insert(pos, value);
    }

    pub fn dequeue(&mut self) -> Result<T, QueueErr> {
        if self.elements.is_empty() {
            return Err(QueueErr::QueueUnderflow);
        }
        Ok(self.elements.remove(0))
    }

    pub fn is_sorted(&self) -> bool {
        self.elements.windows(2).all(|w| w[0].precedes(&w[1]))
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // weight plus an insertion tag; equal weights compare non-strictly
    #[derive(Debug, PartialEq)]
    struct Item(u32, char);

    impl QueueOrder for Item {
        fn precedes(&self, other: &Self) -> bool {
            self.0 <= other.0
        }
    }

    #[test]
    fn dequeues_in_order() {
        let mut q = PriorityQueue::new();
        for w in [5, 1, 4, 2, 3] {
            q.enqueue(Item(w, 'x'));
        }
        assert!(q.is_sorted());
        let order: Vec<u32> = (0..5).map(|_| q.dequeue().unwrap().0).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_entries_keep_insertion_order() {
        let mut q = PriorityQueue::new();
        q.enqueue(Item(2, 'a'));
        q.enqueue(Item(2, 'b'));
        q.enqueue(Item(1, 'c'));
        q.enqueue(Item(2, 'd'));
        let tags: Vec<char> = q.iter().map(|i| i.1).collect();
        assert_eq!(tags, vec!['c', 'a', 'b', 'd']);
    }

    #[test]
    fn underflow() {
        let mut q: PriorityQueue<Item> = PriorityQueue::new();
        assert_eq!(q.dequeue(), Err(QueueErr::QueueUnderflow));
        assert!(q.is_empty());
    }
}
