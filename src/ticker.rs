//! Re-armable periodic timer that paces gravity.

use std::time::{Duration, Instant};

/// One pending deadline at most. Arming always replaces the previous deadline, so
/// there are never two overlapping periodic ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect on the next `arm` or the next fired tick.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// True once per elapsed period; the next deadline is measured from `now`, so a
    /// stalled loop never fires a burst of catch-up ticks.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next tick, `None` while disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_500: Duration = Duration::from_millis(500);

    #[test]
    fn test_disarmed_never_fires() {
        let mut t = Ticker::new(MS_500);
        let now = Instant::now();
        assert!(!t.fire(now + Duration::from_secs(10)));
        assert_eq!(t.remaining(now), None);
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut t = Ticker::new(MS_500);
        let start = Instant::now();
        t.arm(start);
        assert!(!t.fire(start + Duration::from_millis(499)));
        assert!(t.fire(start + MS_500));
        assert!(!t.fire(start + MS_500));
        assert_eq!(t.remaining(start + MS_500), Some(MS_500));
        // Late loop: one tick, then a fresh period from the late instant.
        let late = start + Duration::from_secs(5);
        assert!(t.fire(late));
        assert!(!t.fire(late + Duration::from_millis(1)));
    }

    #[test]
    fn test_rearm_replaces_pending_deadline() {
        let mut t = Ticker::new(MS_500);
        let start = Instant::now();
        t.arm(start);
        t.set_interval(Duration::from_millis(450));
        let later = start + Duration::from_millis(300);
        t.arm(later);
        assert!(!t.fire(start + MS_500));
        assert!(t.fire(later + Duration::from_millis(450)));
    }

    #[test]
    fn test_disarm() {
        let mut t = Ticker::new(MS_500);
        let start = Instant::now();
        t.arm(start);
        assert!(t.remaining(start).is_some());
        t.disarm();
        assert_eq!(t.remaining(start), None);
        assert!(!t.fire(start + MS_500));
    }
}
