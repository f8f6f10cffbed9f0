/// Logical repeating timer driven by the frame clock.
///
/// Holds no browser resource: arming records the next due time, cancelling
/// forgets it. The owner cancels on pause, at the end of a run and on teardown.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    interval_ms: f64,
    next_due_ms: Option<f64>,
}

impl Ticker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_due_ms: None,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Takes effect from the next `fire`.
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    pub fn arm(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.next_due_ms.is_some_and(|due| now_ms >= due)
    }

    /// Schedule the following tick one interval after `now_ms`.
    pub fn fire(&mut self, now_ms: f64) {
        if self.is_armed() {
            self.arm(now_ms);
        }
    }
}
