//! Deferred removal for lists that are walked by index
//!
//! Indices are marked during a pass and compacted once the pass is over,
//! so no element is skipped or visited twice.

/// Indices scheduled for removal from one list
#[derive(Debug, Clone, Default)]
pub struct RemovalQueue {
    marked: Vec<usize>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `index` for removal (repeat marks are ignored)
    pub fn mark(&mut self, index: usize) {
        if !self.contains(index) {
            self.marked.push(index);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Remove every marked index from `items`, keeping the order of the rest
    ///
    /// Returns the number of removed elements.
    pub fn apply<T>(&mut self, items: &mut Vec<T>) -> usize {
        if self.marked.is_empty() {
            return 0;
        }
        let before = items.len();
        let mut index = 0;
        items.retain(|_| {
            let keep = !self.marked.contains(&index);
            index += 1;
            keep
        });
        self.marked.clear();
        before - items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_order() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        let mut queue = RemovalQueue::new();
        queue.mark(3);
        queue.mark(1);
        queue.mark(3);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.apply(&mut items), 2);
        assert_eq!(items, vec!['a', 'c', 'e']);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_marking_does_not_touch_list() {
        let items = vec![1, 2, 3];
        let mut queue = RemovalQueue::new();
        queue.mark(0);
        assert_eq!(items.len(), 3);
        assert!(queue.contains(0));
        assert!(!queue.contains(1));
    }

    #[test]
    fn test_out_of_range_marks_are_harmless() {
        let mut items = vec![1, 2];
        let mut queue = RemovalQueue::new();
        queue.mark(7);
        assert_eq!(queue.apply(&mut items), 0);
        assert_eq!(items, vec![1, 2]);
    }
}
