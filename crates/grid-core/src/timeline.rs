//! Delayed card actions.
//!
//! Stands in for the host's timer queue: entries become due at an absolute
//! time and are drained, in due order, at the start of a frame.

use crate::card::CellCoord;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardAction {
    Show,
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scheduled {
    pub due_ms: f64,
    pub seq: u64,
    pub cell: CellCoord,
    pub action: CardAction,
}

#[derive(Debug, Default)]
pub struct Timeline {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timeline {
    pub fn schedule(&mut self, due_ms: f64, cell: CellCoord, action: CardAction) {
        self.pending.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            cell,
            action,
        });
        self.next_seq += 1;
    }

    /// Remove and return every entry due at or before `now_ms`, ordered by
    /// due time and then by scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> SmallVec<[Scheduled; 8]> {
        let mut due: SmallVec<[Scheduled; 8]> = SmallVec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now_ms {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.pending.iter()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|s| s.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
