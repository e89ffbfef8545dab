//! Animation batches.
//!
//! A [`Transaction`] groups the animations started by one picker operation
//! and remembers what has to happen once the longest of them has played
//! out. Committing hands the batch to the [`Timeline`], which releases it
//! from [`Timeline::advance`] once the host clock passes its settle time.

use crate::wedge::ShapeId;
use std::fmt;
use std::time::Duration;

pub type Completion = Box<dyn FnOnce()>;

/// Follow-up work a picker performs on its own state when a batch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    EnableInteraction,
    Detach(ShapeId),
}

pub struct Batch {
    pub settles_at: Duration,
    pub actions: Vec<SettleAction>,
    pub on_complete: Option<Completion>,
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("settles_at", &self.settles_at)
            .field("actions", &self.actions)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    pending: Vec<Batch>,
}

impl Timeline {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Moves the clock to `now` and hands back every settled batch in
    /// commit order. The clock never runs backwards.
    pub fn advance(&mut self, now: Duration) -> Vec<Batch> {
        self.now = self.now.max(now);
        let (settled, pending): (Vec<Batch>, Vec<Batch>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|b| b.settles_at <= self.now);
        self.pending = pending;
        settled
    }

    fn push(&mut self, batch: Batch) {
        self.pending.push(batch);
    }
}

/// Open animation batch. Dropping it commits.
pub struct Transaction<'a> {
    timeline: &'a mut Timeline,
    batch: Option<Batch>,
}

impl<'a> Transaction<'a> {
    pub fn begin(timeline: &'a mut Timeline) -> Self {
        let now = timeline.now;
        Self {
            timeline,
            batch: Some(Batch {
                settles_at: now,
                actions: Vec::new(),
                on_complete: None,
            }),
        }
    }

    pub fn now(&self) -> Duration {
        self.timeline.now
    }

    /// Extends the batch so it settles no earlier than `settles_at`.
    pub fn track(&mut self, settles_at: Option<Duration>) {
        if let (Some(batch), Some(end)) = (self.batch.as_mut(), settles_at) {
            batch.settles_at = batch.settles_at.max(end);
        }
    }

    pub fn on_settle(&mut self, action: SettleAction) {
        if let Some(batch) = self.batch.as_mut() {
            batch.actions.push(action);
        }
    }

    pub fn on_complete(&mut self, completion: Completion) {
        if let Some(batch) = self.batch.as_mut() {
            batch.on_complete = Some(completion);
        }
    }

    pub fn commit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(batch) = self.batch.take() {
            log::trace!(
                "Committing batch settling at {:?} with {} actions",
                batch.settles_at,
                batch.actions.len()
            );
            self.timeline.push(batch);
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
