//! One-shot debounce timer
//!
//! Continuous drags issue many commands per second; the receiver status only
//! needs refreshing once the gesture pauses. A [`Debouncer`] holds at most one
//! pending value: scheduling again replaces it and pushes the deadline out.
//! Time is passed in explicitly, so the timer has no global state and is
//! deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

/// Cancellable one-shot timer where a new schedule replaces the pending one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire `delay` after `now`, replacing any pending
    /// value. Returns `true` if a pending value was replaced.
    pub fn schedule(&mut self, now: Instant, value: T) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            deadline: now + self.delay,
            value,
        });
        replaced
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().map_or(false, |p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        assert!(!d.schedule(t0, 1));
        assert_eq!(d.poll(t0 + Duration::from_millis(99)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(100)), Some(1));
        assert_eq!(d.poll(t0 + Duration::from_millis(500)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.schedule(t0, "first");
        assert!(d.schedule(t0 + Duration::from_millis(80), "second"));
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(180)));

        // First deadline passes without firing
        assert_eq!(d.poll(t0 + Duration::from_millis(120)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(180)), Some("second"));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.schedule(t0, 5u32);
        assert_eq!(d.cancel(), Some(5));
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(d.cancel(), None);
    }
}
