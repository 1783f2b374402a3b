use crate::model::board::BoardCollection;

/// Maximum number of snapshots kept; older ones are discarded first.
pub const UNDO_STACK_LIMIT: usize = 50;

/// Bounded history of whole-collection snapshots.
///
/// Each snapshot is a full deep copy taken before a mutation, so undo is a
/// plain replace. There is no redo.
#[derive(Debug, Default)]
pub struct UndoStack {
    snapshots: Vec<BoardCollection>,
}

impl UndoStack {
    pub fn new() -> Self {
        UndoStack {
            snapshots: Vec::new(),
        }
    }

    /// Push the state as it was before a mutation.
    pub fn record(&mut self, snapshot: BoardCollection) {
        self.snapshots.push(snapshot);
        if self.snapshots.len() > UNDO_STACK_LIMIT {
            self.snapshots
                .drain(..self.snapshots.len() - UNDO_STACK_LIMIT);
        }
    }

    /// Take the most recent snapshot, if any.
    pub fn pop(&mut self) -> Option<BoardCollection> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn peek(&self) -> Option<&BoardCollection> {
        self.snapshots.last()
    }
}
