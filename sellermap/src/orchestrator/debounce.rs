//! Timer-and-token debouncing.
//!
//! Every [`Debouncer::schedule`] call stores the latest value and hands out a
//! fresh token. The caller arms a timer carrying that token; when the timer
//! fires, [`Debouncer::take_if_current`] only yields the value if no newer
//! call has happened since. Superseded timers fire into nothing.

use std::time::Duration;

/// Reference quiescence window for viewport changes.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Identifies one scheduling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebounceToken(u64);

impl DebounceToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Collapses bursts of values into the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    latest: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            latest: 0,
            pending: None,
        }
    }

    /// Quiescence window a timer must wait before firing.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Store `value` as the pending one and invalidate earlier tokens.
    ///
    /// Returns the token the new timer must carry, and whether an earlier
    /// pending value was replaced.
    pub fn schedule(&mut self, value: T) -> (DebounceToken, bool) {
        self.latest += 1;
        let replaced = self.pending.replace(value).is_some();
        (DebounceToken(self.latest), replaced)
    }

    /// Whether `token` belongs to the most recent scheduling call.
    pub fn is_current(&self, token: DebounceToken) -> bool {
        token.0 == self.latest
    }

    /// Take the pending value if `token` is still current.
    pub fn take_if_current(&mut self, token: DebounceToken) -> Option<T> {
        if self.is_current(token) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a value is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value; outstanding timers become no-ops.
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_schedule_fires() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let (token, replaced) = debouncer.schedule("a");

        assert!(!replaced);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_if_current(token), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_superseded_token_is_ignored() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let (first, _) = debouncer.schedule(1);
        let (second, replaced) = debouncer.schedule(2);

        assert!(replaced);
        assert!(!debouncer.is_current(first));
        assert_eq!(debouncer.take_if_current(first), None);
        assert_eq!(debouncer.take_if_current(second), Some(2));
    }

    #[test]
    fn test_token_fires_once() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let (token, _) = debouncer.schedule(1);

        assert_eq!(debouncer.take_if_current(token), Some(1));
        assert_eq!(debouncer.take_if_current(token), None);
    }

    #[test]
    fn test_cancel_invalidates_timers() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
        let (token, _) = debouncer.schedule(1);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_if_current(token), None);
    }

    #[test]
    fn test_tokens_increase() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let (a, _) = debouncer.schedule(());
        let (b, _) = debouncer.schedule(());
        assert!(b > a);
        assert_eq!(b.value(), a.value() + 1);
    }

    proptest! {
        /// Whatever order the timers fire in, only the last value comes out,
        /// and it comes out exactly once.
        #[test]
        fn prop_only_last_value_survives(
            values in prop::collection::vec(any::<u32>(), 1..50),
            seed in any::<u64>(),
        ) {
            let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE_WINDOW);
            let mut tokens: Vec<_> = values.iter().map(|v| debouncer.schedule(*v).0).collect();

            // Deterministic shuffle of firing order
            let len = tokens.len();
            for i in 0..len {
                let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
                tokens.swap(i, j);
            }

            let fired: Vec<u32> = tokens
                .into_iter()
                .filter_map(|t| debouncer.take_if_current(t))
                .collect();

            prop_assert_eq!(fired, vec![*values.last().unwrap()]);
        }
    }
}
