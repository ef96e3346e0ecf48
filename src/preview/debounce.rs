//! Quiet-period scheduler for preview renders
//!
//! Each keystroke pushes the render deadline out by the configured delay, so
//! a burst of typing produces a single render once the user pauses. The
//! scheduler never reads the clock itself; callers pass `now` in, which keeps
//! it deterministic under test.

use std::time::{Duration, Instant};

/// Default quiet period before a render fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Pending { deadline: Instant },
}

/// Coalesces rapid edit notifications into one deferred render.
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    delay: Duration,
    state: SchedulerState,
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: SchedulerState::Idle,
        }
    }

    #[cfg(test)]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the quiet period. A pending deadline keeps its old value.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Record an edit, replacing any pending deadline.
    pub fn on_edit(&mut self, now: Instant) {
        self.state = SchedulerState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Drop the pending render, if any.
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            SchedulerState::Pending { deadline } if now >= deadline => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// How long until the pending render fires; `None` when idle.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Pending { deadline } => Some(deadline.saturating_duration_since(now)),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::Pending { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
