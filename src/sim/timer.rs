//! Deferred one-shot timers
//!
//! Fades and announcement delays are scheduled here instead of as loose
//! callbacks. A reset cancels everything pending, so a timer from a previous
//! run can never fire into the next one.

use serde::{Deserialize, Serialize};

/// What to do when a timer expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Death fade finished: Dying -> GameOver
    FinishDeathFade,
    /// Announcement delay finished: show the level-complete screen
    ShowLevelComplete,
}

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    id: TimerId,
    remaining: f32,
    delay: f32,
    action: TimerAction,
}

/// Pending timers in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Pending>,
    next_id: u64,
}

impl Timers {
    /// Fire `action` after `delay` seconds of [`Timers::advance`]
    pub fn schedule(&mut self, action: TimerAction, delay: f32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let delay = delay.max(0.0);
        self.pending.push(Pending {
            id,
            remaining: delay,
            delay,
            action,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending timer, returning how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, action: TimerAction) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }

    /// Fraction of the delay elapsed for the first pending `action` (0..=1)
    pub fn progress(&self, action: TimerAction) -> Option<f32> {
        self.pending
            .iter()
            .find(|p| p.action == action)
            .map(|p| {
                if p.delay > 0.0 {
                    1.0 - (p.remaining / p.delay).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            })
    }

    /// Count down and return the actions that expired, in scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<TimerAction> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|p| {
            p.remaining -= dt;
            if p.remaining <= 0.0 {
                fired.push(p.action);
                false
            } else {
                true
            }
        });
        fired
    }
}
