//! Cancellable one-shot timers on a virtual millisecond clock
//!
//! Each `schedule` returns a handle; cancelling removes the pending entry so
//! it can never fire. Repeating timers re-schedule themselves from their
//! handler. Firing order is by due time, then by scheduling order.

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Once-per-second match countdown
    Countdown,
    /// Rock spawner (self-rescheduling with a shrinking delay)
    Spawn,
}

/// Cancellation handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub due_ms: f64,
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: f64,
}

/// Pending timers
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Pending>,
    next_handle: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, kind: TimerKind) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.pending.push(Pending {
            handle,
            kind,
            due_ms,
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time, if anything is pending
    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|i| self.pending[i].due_ms)
    }

    /// Earliest due time among pending timers of `kind`
    pub fn pending_due(&self, kind: TimerKind) -> Option<f64> {
        self.pending
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.due_ms)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<FiredTimer> {
        let idx = self.earliest()?;
        if self.pending[idx].due_ms > now_ms {
            return None;
        }
        let p = self.pending.remove(idx);
        Some(FiredTimer {
            handle: p.handle,
            kind: p.kind,
            due_ms: p.due_ms,
        })
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.0.cmp(&b.handle.0))
            })
            .map(|(i, _)| i)
    }
}
