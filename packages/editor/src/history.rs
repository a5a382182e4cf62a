//! # Undo/Redo History
//!
//! Past/present/future snapshots of the site.
//!
//! ## Design
//!
//! - Every site edit snapshots the previous site onto `past` before the
//!   new site becomes `present`
//! - Undo moves `present` onto `future` and restores the last `past` entry
//! - Redo is the mirror image
//! - A new edit clears `future`
//! - `past` is bounded; the oldest snapshot is dropped first
//! - Edits made while a batch is open undo as a single step
//!
//! Snapshots are `Arc<Site>`, so undo and redo never copy a site.

use crate::model::Site;
use std::sync::Arc;

/// Default number of undo levels
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// One recorded site snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub site: Arc<Site>,

    /// Label of the edit that moved away from this snapshot
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
struct OpenBatch {
    label: Option<String>,
    /// Whether the pre-batch site has already been recorded
    recorded: bool,
}

#[derive(Debug, Clone)]
pub struct History {
    /// Older snapshots, most recent last
    past: Vec<Snapshot>,

    present: Arc<Site>,

    /// Undone snapshots, next redo last
    future: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    batch: Option<OpenBatch>,
}

impl History {
    pub fn new(present: Site) -> Self {
        Self::with_max_levels(present, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(present: Site, max_levels: usize) -> Self {
        Self {
            past: Vec::new(),
            present: Arc::new(present),
            future: Vec::new(),
            max_levels,
            batch: None,
        }
    }

    pub fn present(&self) -> &Site {
        &self.present
    }

    /// Make `next` the present site, recording the old one for undo
    pub fn commit(&mut self, next: Site, label: &str) {
        let previous = std::mem::replace(&mut self.present, Arc::new(next));

        let record = match &mut self.batch {
            // Already snapshotted at the start of the batch
            Some(batch) if batch.recorded => None,
            Some(batch) => {
                batch.recorded = true;
                Some(batch.label.clone().unwrap_or_else(|| label.to_string()))
            }
            None => Some(label.to_string()),
        };

        if let Some(label) = record {
            self.push_past(Snapshot {
                site: previous,
                label: Some(label),
            });
        }

        self.future.clear();
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);

        if self.max_levels > 0 && self.past.len() > self.max_levels {
            let excess = self.past.len() - self.max_levels;
            self.past.drain(..excess);
        }
    }

    /// Start a batch; edits until `end_batch` undo together
    pub fn begin_batch(&mut self, label: Option<String>) {
        if self.batch.is_none() {
            self.batch = Some(OpenBatch {
                label,
                recorded: false,
            });
        }
    }

    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        self.end_batch();

        match self.past.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(&mut self.present, snapshot.site);
                self.future.push(Snapshot {
                    site: current,
                    label: snapshot.label,
                });
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone snapshot. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        self.end_batch();

        match self.future.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(&mut self.present, snapshot.site);
                self.past.push(Snapshot {
                    site: current,
                    label: snapshot.label,
                });
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Past snapshots, oldest first
    pub fn past(&self) -> impl Iterator<Item = &Site> {
        self.past.iter().map(|s| s.site.as_ref())
    }

    /// Future snapshots, next redo first
    pub fn future(&self) -> impl Iterator<Item = &Site> {
        self.future.iter().rev().map(|s| s.site.as_ref())
    }

    /// Apply `amend` to the present site and every snapshot without
    /// recording an undo step. Undo and redo keep the amended fields.
    pub fn amend<F>(&mut self, amend: F)
    where
        F: Fn(&mut Site),
    {
        amend(Arc::make_mut(&mut self.present));
        for snapshot in self.past.iter_mut().chain(self.future.iter_mut()) {
            amend(Arc::make_mut(&mut snapshot.site));
        }
    }

    /// Label of the edit the next undo reverts
    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().and_then(|s| s.label.as_deref())
    }

    /// Label of the edit the next redo re-applies
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().and_then(|s| s.label.as_deref())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Site::default())
    }
}
