use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rustc_hash::FxHashSet;

/// FIFO of modules awaiting analysis plus the set already analyzed.
///
/// A path is in at most one of `pending` and `processed`, and a processed
/// path is never handed out again.
#[derive(Debug, Default)]
pub struct Worklist {
    queue: VecDeque<PathBuf>,
    pending: FxHashSet<PathBuf>,
    processed: IndexSet<PathBuf>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `path` unless it is already queued or processed.
    /// Returns `true` if it was added.
    pub fn enqueue(&mut self, path: PathBuf) -> bool {
        if self.processed.contains(&path) || self.pending.contains(&path) {
            return false;
        }
        self.pending.insert(path.clone());
        self.queue.push_back(path);
        true
    }

    /// Take the next pending path.
    pub fn next(&mut self) -> Option<PathBuf> {
        let path = self.queue.pop_front()?;
        self.pending.remove(&path);
        Some(path)
    }

    /// Record `path` as analyzed. Returns `false` if it already was.
    pub fn mark_processed(&mut self, path: &Path) -> bool {
        self.processed.insert(path.to_path_buf())
    }

    pub fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(path)
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }
}
