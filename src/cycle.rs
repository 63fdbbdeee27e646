//! Round-robin rotation over the actions of one schedule.

/// Endless round-robin over a fixed list of items.
///
/// `next()` yields `items[0], items[1], …, items[n-1], items[0], …`. An empty
/// cycle yields nothing, so callers must not build one for an action plan
/// that is empty.
#[derive(Debug, Clone)]
pub struct ActionCycle<T> {
    items: Vec<T>,
    position: usize,
}

impl<T> ActionCycle<T> {
    /// Build a cycle positioned at the first item.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, position: 0 }
    }

    /// Number of distinct slots in one rotation.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Iterator for ActionCycle<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.get(self.position)?.clone();
        self.position = (self.position + 1) % self.items.len();
        Some(item)
    }
}
