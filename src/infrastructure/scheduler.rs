//! Timer abstraction for debounced effects.
//!
//! The event handler never sleeps or spawns timers itself. It emits
//! `Schedule` / `Cancel` actions carrying a [`TimerToken`]; a [`Scheduler`]
//! owned by the host executes them and reports expired tokens back as
//! `TimerFired` events. [`VirtualScheduler`] implements the trait over
//! virtual time so tests can advance the clock deterministically.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one scheduled timer.
///
/// Tokens are allocated by the state machine and never reused, so a late
/// expiry of a cancelled timer can always be told apart from a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// Hands out fresh, never reused timer tokens.
#[derive(Debug, Default, Clone)]
pub struct TokenSource {
    issued: u64,
}

impl TokenSource {
    pub fn next_token(&mut self) -> TimerToken {
        self.issued += 1;
        TimerToken(self.issued)
    }
}

/// Executes timer requests emitted by the event handler.
pub trait Scheduler {
    /// Arms a one-shot timer that expires after `delay`.
    ///
    /// Scheduling an already armed token re-arms it with the new delay.
    fn schedule(&mut self, delay: Duration, token: TimerToken);

    /// Disarms a timer. Cancelling an unknown or expired token is a no-op.
    fn cancel(&mut self, token: TimerToken);
}

/// Deterministic scheduler driven by explicit calls to [`advance`](Self::advance).
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    deadlines: BTreeMap<TimerToken, Duration>,
}

impl VirtualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether `token` is armed.
    #[must_use]
    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.deadlines.contains_key(&token)
    }

    /// Moves virtual time forward and returns the tokens that expired, earliest first.
    ///
    /// Timers with equal deadlines fire in token order.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_discovery::infrastructure::scheduler::{Scheduler, TimerToken, VirtualScheduler};
    /// use std::time::Duration;
    ///
    /// let mut scheduler = VirtualScheduler::new();
    /// scheduler.schedule(Duration::from_millis(300), TimerToken(1));
    /// scheduler.schedule(Duration::from_millis(100), TimerToken(2));
    ///
    /// assert!(scheduler.advance(Duration::from_millis(50)).is_empty());
    /// assert_eq!(scheduler.advance(Duration::from_millis(300)), vec![TimerToken(2), TimerToken(1)]);
    /// ```
    pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<(Duration, TimerToken)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(token, deadline)| (*deadline, *token))
            .collect();
        due.sort();

        for (_, token) in &due {
            self.deadlines.remove(token);
        }

        due.into_iter().map(|(_, token)| token).collect()
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        tracing::trace!(token = token.0, delay_ms = delay.as_millis() as u64, "timer armed");
        self.deadlines.insert(token, self.now + delay);
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.deadlines.remove(&token).is_some() {
            tracing::trace!(token = token.0, "timer cancelled");
        }
    }
}
