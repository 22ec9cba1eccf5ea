//! Scrobble gate
//!
//! Decides when a play counts. Listened time is accumulated from position
//! updates rather than read off the position itself, so seeking forward past
//! the midpoint does not make a track eligible. Position only moves while the
//! engine plays, so the deltas add up to playing time.
//!
//! ```text
//! NotEligible --(listened > threshold)--> Eligible --(take_report)--> Reported
//! ```

use crate::types::ScrobbleConfig;
use std::time::Duration;

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotEligible,
    Eligible,
    Reported,
}

/// Per-session scrobble state machine
#[derive(Debug, Clone)]
pub struct ScrobbleGate {
    state: GateState,
    threshold: Duration,
    seek_window: Duration,

    /// Time accrued from counted position deltas
    listened: Duration,

    /// Last observed position, `None` until the first observation
    last_position: Option<Duration>,

    /// Target of a commanded seek the engine has not confirmed yet
    pending_seek: Option<Duration>,
}

impl ScrobbleGate {
    /// Gate for a track of `duration`
    pub fn new(duration: Duration, config: &ScrobbleConfig) -> Self {
        Self {
            state: GateState::NotEligible,
            threshold: config.threshold(duration),
            seek_window: config.seek_window,
            listened: Duration::ZERO,
            last_position: None,
            pending_seek: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn listened(&self) -> Duration {
        self.listened
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn is_eligible(&self) -> bool {
        self.state == GateState::Eligible
    }

    /// True while a commanded seek waits for engine confirmation
    pub fn awaiting_seek(&self) -> bool {
        self.pending_seek.is_some()
    }

    /// Feed a position update
    ///
    /// Forward movement counts in full while the session is playing, however
    /// coarse the update cadence. Backward moves only move the baseline.
    /// While a seek is pending, reports outside the seek window are dropped
    /// and the first one inside it becomes the new baseline.
    pub fn observe(&mut self, position: Duration, playing: bool) {
        if let Some(target) = self.pending_seek {
            let distance = if position > target {
                position - target
            } else {
                target - position
            };
            if distance > self.seek_window {
                return;
            }
            self.pending_seek = None;
            self.last_position = Some(position);
            return;
        }

        if playing {
            if let Some(last) = self.last_position {
                if position > last {
                    self.listened += position - last;
                }
            }
        }
        self.last_position = Some(position);

        if self.state == GateState::NotEligible && self.listened > self.threshold {
            self.state = GateState::Eligible;
        }
    }

    /// A seek to `target` was commanded
    ///
    /// Nothing accrues until the engine reports a position near `target`.
    pub fn expect_seek(&mut self, target: Duration) {
        self.pending_seek = Some(target);
    }

    /// Claim the report
    ///
    /// Returns `true` exactly once, the first time it is called while eligible.
    pub fn take_report(&mut self) -> bool {
        if self.state == GateState::Eligible {
            self.state = GateState::Reported;
            true
        } else {
            false
        }
    }
}
