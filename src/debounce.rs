use std::time::{Duration, Instant};

/// Trailing-edge debouncer. `update` re-arms the deadline on every call;
/// `poll` hands out the value once the input has been stable for the full
/// delay, exactly once per settled value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn update(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_last_value_only() {
        let start = Instant::now();
        let mut deb = Debouncer::new(Duration::from_millis(400));
        deb.update("a", start);
        deb.update("ab", start + Duration::from_millis(100));
        deb.update("abc", start + Duration::from_millis(200));

        assert_eq!(deb.poll(start + Duration::from_millis(350)), None);
        assert_eq!(
            deb.poll(start + Duration::from_millis(600)),
            Some("abc")
        );
        // Settled value is handed out once.
        assert_eq!(deb.poll(start + Duration::from_millis(700)), None);
    }

    #[test]
    fn update_before_deadline_cancels_pending() {
        let start = Instant::now();
        let mut deb = Debouncer::new(Duration::from_millis(400));
        deb.update("old", start);
        deb.update("new", start + Duration::from_millis(399));
        // The original deadline has passed, but "old" was replaced.
        assert_eq!(deb.poll(start + Duration::from_millis(401)), None);
        assert_eq!(
            deb.poll(start + Duration::from_millis(799)),
            Some("new")
        );
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut deb = Debouncer::new(Duration::from_millis(400));
        deb.update("x", start);
        deb.cancel();
        assert_eq!(deb.poll(start + Duration::from_secs(1)), None);
    }
}
