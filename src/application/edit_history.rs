// Edit history - undo/redo over whole-dashboard snapshots
use crate::domain::snapshot::DashboardSnapshot;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct EditHistory {
    current: Option<DashboardSnapshot>,
    past: Vec<DashboardSnapshot>,
    future: VecDeque<DashboardSnapshot>,
    dirty: bool,
}

/// A run of intermediate updates (e.g. a live drag) that lands in the history
/// as a single commit. Dropping it without `EditHistory::end_batch` discards it.
#[derive(Debug, Default)]
#[must_use = "a batch does nothing unless passed to EditHistory::end_batch"]
pub struct EditBatch {
    latest: Option<DashboardSnapshot>,
    updates: usize,
}

impl EditBatch {
    /// Record an intermediate state; only the last one is kept.
    pub fn apply(&mut self, snapshot: DashboardSnapshot) {
        self.latest = Some(snapshot);
        self.updates += 1;
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new state. Any pending redo branch is discarded.
    pub fn commit(&mut self, snapshot: DashboardSnapshot) {
        if let Some(previous) = self.current.take() {
            self.past.push(previous);
        }
        self.future.clear();
        self.current = Some(snapshot);
        self.dirty = true;

        tracing::debug!("history commit: {} past entries", self.past.len());
    }

    /// Step back one entry. Returns the new current snapshot, or `None` when
    /// there was nothing to undo.
    pub fn undo(&mut self) -> Option<&DashboardSnapshot> {
        let previous = self.past.pop()?;
        if let Some(current) = self.current.replace(previous) {
            self.future.push_front(current);
        }
        self.dirty = true;
        self.current.as_ref()
    }

    /// Step forward one entry. Returns the new current snapshot, or `None`
    /// when there was nothing to redo.
    pub fn redo(&mut self) -> Option<&DashboardSnapshot> {
        let next = self.future.pop_front()?;
        if let Some(current) = self.current.replace(next) {
            self.past.push(current);
        }
        self.dirty = true;
        self.current.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn current(&self) -> Option<&DashboardSnapshot> {
        self.current.as_ref()
    }

    pub fn past(&self) -> &[DashboardSnapshot] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<DashboardSnapshot> {
        &self.future
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called once the current state has been persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn begin_batch(&self) -> EditBatch {
        EditBatch::default()
    }

    /// Commit the last state applied to `batch`, if any. Returns whether a
    /// commit happened.
    pub fn end_batch(&mut self, batch: EditBatch) -> bool {
        match batch.latest {
            Some(snapshot) => {
                tracing::debug!("history batch coalesced {} updates", batch.updates);
                self.commit(snapshot);
                true
            }
            None => false,
        }
    }
}
