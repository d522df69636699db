// timer.rs

use std::time::{Duration, Instant};

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(2000);

/// Deferred reset after an error is shown. Nothing runs in the background:
/// the owner polls [`AutoClear::fire_if_due`] before handling each event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoClear {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutoClear {
    fn default() -> Self {
        Self::new(DEFAULT_RESET_DELAY)
    }
}

impl AutoClear {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm the timer; a deadline that is already pending is pushed back.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once when the deadline has passed, disarming the timer.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
