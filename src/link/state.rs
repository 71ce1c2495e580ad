//! Connection state machine.
//!
//! ```text
//! Idle ──connect──► Connecting ──open──► Open
//!                       │                  │
//!                     error              error / close
//!                       ▼                  ▼
//!                    Failed ──close──► Closed ──retry due──► Connecting
//!                                          │
//!                                   attempts exhausted
//!                                          ▼
//!                                      ManualOnly ──manual reconnect──► Connecting
//! ```
//!
//! Every transition is a named handler; the manager calls them as socket
//! events arrive and acts on what they return.

use std::fmt;
use std::time::Duration;

/// Where the link is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Idle,
    Connecting,
    Open,
    Closed,
    Failed,
    /// Automatic retries exhausted; only a manual reconnect leaves this state
    ManualOnly,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Failed => "failed",
            Self::ManualOnly => "manual-only",
        };
        f.write_str(name)
    }
}

/// Linear backoff: attempt `n` waits `base_delay * n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before automatic attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// What a close means for the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Attempt `attempt` should start after `delay`
    Retry { attempt: u32, delay: Duration },
    /// No automatic attempts left
    Exhausted,
}

/// Status and attempt counter of one link
#[derive(Debug, Clone)]
pub struct LinkState {
    status: LinkStatus,
    attempts: u32,
    policy: ReconnectPolicy,
}

impl LinkState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            status: LinkStatus::Idle,
            attempts: 0,
            policy,
        }
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Automatic attempts made since the last open or manual reconnect
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn is_open(&self) -> bool {
        self.status == LinkStatus::Open
    }

    /// First connection or a manual reconnect: start over from zero
    pub fn on_connect_requested(&mut self) {
        self.attempts = 0;
        self.status = LinkStatus::Connecting;
    }

    /// A scheduled retry is due
    pub fn on_retry_due(&mut self) {
        self.status = LinkStatus::Connecting;
    }

    pub fn on_open(&mut self) {
        self.attempts = 0;
        self.status = LinkStatus::Open;
    }

    /// An error is always followed by a close
    pub fn on_error(&mut self) {
        self.status = LinkStatus::Failed;
    }

    pub fn on_close(&mut self) -> CloseOutcome {
        if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            self.status = LinkStatus::Closed;
            CloseOutcome::Retry {
                attempt: self.attempts,
                delay: self.policy.delay_for(self.attempts),
            }
        } else {
            self.status = LinkStatus::ManualOnly;
            CloseOutcome::Exhausted
        }
    }

    /// Deliberate shutdown: closed, nothing scheduled
    pub fn on_shutdown(&mut self) {
        self.status = LinkStatus::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> LinkState {
        LinkState::new(ReconnectPolicy::default())
    }

    #[test]
    fn test_starts_idle() {
        let state = state();
        assert_eq!(state.status(), LinkStatus::Idle);
        assert_eq!(state.attempts(), 0);
    }

    #[test]
    fn test_linear_backoff() {
        let policy = ReconnectPolicy::default();
        let delays: Vec<u128> = (1..=5).map(|n| policy.delay_for(n).as_millis()).collect();
        assert_eq!(delays, vec![2000, 4000, 6000, 8000, 10000]);
    }

    #[test]
    fn test_closes_schedule_growing_delays_then_exhaust() {
        let mut state = state();
        state.on_connect_requested();

        let mut delays = Vec::new();
        loop {
            state.on_error();
            assert_eq!(state.status(), LinkStatus::Failed);
            match state.on_close() {
                CloseOutcome::Retry { attempt, delay } => {
                    assert_eq!(state.status(), LinkStatus::Closed);
                    assert_eq!(attempt, state.attempts());
                    delays.push(delay.as_millis());
                    state.on_retry_due();
                    assert_eq!(state.status(), LinkStatus::Connecting);
                }
                CloseOutcome::Exhausted => break,
            }
        }

        assert_eq!(delays, vec![2000, 4000, 6000, 8000, 10000]);
        assert_eq!(state.status(), LinkStatus::ManualOnly);
        assert_eq!(state.attempts(), 5);

        // Further closes stay exhausted
        assert_eq!(state.on_close(), CloseOutcome::Exhausted);
    }

    #[test]
    fn test_open_resets_attempts() {
        let mut state = state();
        state.on_connect_requested();
        state.on_close();
        state.on_retry_due();
        state.on_close();
        assert_eq!(state.attempts(), 2);

        state.on_retry_due();
        state.on_open();
        assert!(state.is_open());
        assert_eq!(state.attempts(), 0);

        // A drop after a good session starts again from the first delay
        assert_eq!(
            state.on_close(),
            CloseOutcome::Retry {
                attempt: 1,
                delay: Duration::from_millis(2000)
            }
        );
    }

    #[test]
    fn test_manual_reconnect_leaves_manual_only() {
        let mut state = LinkState::new(ReconnectPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(10),
        });
        state.on_connect_requested();
        state.on_close();
        state.on_retry_due();
        assert_eq!(state.on_close(), CloseOutcome::Exhausted);
        assert_eq!(state.status(), LinkStatus::ManualOnly);

        state.on_connect_requested();
        assert_eq!(state.status(), LinkStatus::Connecting);
        assert_eq!(state.attempts(), 0);
    }
}
