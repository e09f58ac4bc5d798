use std::collections::VecDeque;

/// One priority level: items in arrival order, oldest at the head.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    items: VecDeque<T>,
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bucket<T> {
    /// Create a new, empty bucket
    pub fn new() -> Self {
        Self { items: VecDeque::new() }
    }

    /// Append an item at the tail
    pub fn append(&mut self, item: T) {
        let len_before = self.items.len();
        self.items.push_back(item);
        // -- post op assertion: exactly one item more
        debug_assert_eq!(self.items.len(), len_before + 1, "Bucket length should grow by 1");
    }

    /// Look at the oldest item without removing it
    pub fn peek_head(&self) -> Option<&T> {
        self.items.front()
    }

    /// Remove and return the oldest item
    pub fn pop_head(&mut self) -> Option<T> {
        let len_before = self.items.len();
        let result = self.items.pop_front();
        // -- post op assertion: length shrinks only if something came out
        match result {
            Some(_) => debug_assert_eq!(self.items.len(), len_before - 1, "Bucket length should decrease by 1"),
            None => debug_assert_eq!(self.items.len(), len_before, "Bucket length unchanged when empty"),
        }
        result
    }

    /// Number of items held
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.items.is_empty(), self.peek_head().is_none());
        self.items.is_empty()
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Ordered copy of the contents, detached from later mutation
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

impl<T: PartialEq> Bucket<T> {
    /// Remove the first item (from the head) equal to `item`.
    /// Returns whether anything was removed.
    pub fn remove_value(&mut self, item: &T) -> bool {
        match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => self.items.remove(index).is_some(),
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}
