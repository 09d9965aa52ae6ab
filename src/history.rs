use crate::graph::Graph;
use tracing::{debug, warn};

/// Linear undo/redo over full, independent graph snapshots.
///
/// The stack is never empty: it is seeded with the graph the editing session
/// starts from, and `index` always points at the snapshot matching the live
/// graph. Appending a snapshot discards everything after `index`.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Graph>,
    index: usize,
    max_entries: Option<usize>,
}

impl HistoryStack {
    pub fn new(initial: &Graph) -> Self {
        Self {
            entries: vec![initial.clone()],
            index: 0,
            max_entries: None,
        }
    }

    /// Caps the number of retained snapshots; the oldest ones are evicted first.
    /// A cap below 2 would make undo impossible and is raised to 2.
    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries.map(|m| m.max(2));
        self.evict_overflow();
        self
    }

    /// Deep-copies `graph`, drops the redo tail, appends the copy and moves the
    /// index onto it.
    pub fn snapshot(&mut self, graph: &Graph) {
        let discarded = self.entries.len() - (self.index + 1);
        if discarded > 0 {
            debug!(discarded, "discarding redo history");
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(graph.clone());
        self.index = self.entries.len() - 1;
        self.evict_overflow();
    }

    /// Steps back one snapshot. `None` when already at the oldest one.
    pub fn undo(&mut self) -> Option<&Graph> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Steps forward one snapshot. `None` when already at the newest one.
    pub fn redo(&mut self) -> Option<&Graph> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> &Graph {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all snapshots and starts over from `graph`.
    pub fn reset(&mut self, graph: &Graph) {
        self.entries.clear();
        self.entries.push(graph.clone());
        self.index = 0;
    }

    fn evict_overflow(&mut self) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.entries.len() <= max {
            return;
        }
        // Only snapshots before the index are evicted, so the current one survives.
        let overflow = (self.entries.len() - max).min(self.index);
        if overflow > 0 {
            warn!(evicted = overflow, max, "history limit reached, evicting oldest snapshots");
            self.entries.drain(..overflow);
            self.index -= overflow;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Graph {
        Graph::new(name)
    }

    #[test]
    fn test_eviction_preserves_index_invariant() {
        let mut history = HistoryStack::new(&named("0")).with_max_entries(Some(3));
        for i in 1..=5 {
            history.snapshot(&named(&i.to_string()));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().name(), "5");
        assert_eq!(history.undo().map(Graph::name), Some("4"));
        assert_eq!(history.undo().map(Graph::name), Some("3"));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_tiny_cap_is_raised() {
        let mut history = HistoryStack::new(&named("0")).with_max_entries(Some(0));
        history.snapshot(&named("1"));
        history.snapshot(&named("2"));
        assert_eq!(history.len(), 2);
        assert!(history.can_undo());
    }
}
