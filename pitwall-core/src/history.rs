//! Bounded log of recent runs, most recent first.

use std::collections::VecDeque;

use serde::Serialize;

use crate::scoring::RunRecord;

/// How many runs the log keeps.
pub const RUN_HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct RunHistory {
    runs: VecDeque<RunRecord>,
    #[serde(skip)]
    next_id: u64,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            runs: VecDeque::with_capacity(RUN_HISTORY_CAPACITY),
            next_id: 1,
        }
    }

    /// Stamp `record` with the next id and put it at the front, evicting the
    /// oldest entry when full. Returns the stored record.
    pub fn push(&mut self, mut record: RunRecord) -> RunRecord {
        record.id = self.next_id;
        self.next_id += 1;
        if self.runs.len() >= RUN_HISTORY_CAPACITY {
            self.runs.pop_back();
        }
        self.runs.push_front(record.clone());
        record
    }

    pub fn latest(&self) -> Option<&RunRecord> {
        self.runs.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
