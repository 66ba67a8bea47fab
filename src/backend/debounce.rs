use std::time::{Duration, Instant};

/// Delay-and-coalesce helper for bursty input: every `trigger` pushes the
/// deadline out by the full delay, and `poll` fires once after the input
/// has been quiet for that long. Polled each UI frame rather than running
/// its own timer thread.
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Changes the delay for future triggers; a pending countdown keeps
    /// its original deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Starts or restarts the countdown.
    pub fn trigger(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Returns true exactly once, when a triggered countdown has elapsed.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time until the pending countdown fires, for scheduling a repaint.
    pub fn time_left(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_debouncer_never_fires() {
        let mut d = Debouncer::new(Duration::from_millis(5));
        assert!(!d.poll());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_fires_once_after_delay() {
        let mut d = Debouncer::new(Duration::from_millis(5));
        d.trigger();
        assert!(d.is_pending());
        assert!(!d.poll());

        std::thread::sleep(Duration::from_millis(10));
        assert!(d.poll());
        // Consumed; does not fire again until retriggered.
        assert!(!d.poll());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_retrigger_pushes_deadline_out() {
        let mut d = Debouncer::new(Duration::from_millis(30));
        d.trigger();
        std::thread::sleep(Duration::from_millis(15));
        d.trigger();
        std::thread::sleep(Duration::from_millis(20));
        // 35ms after the first trigger but only 20ms after the second.
        assert!(!d.poll());
        std::thread::sleep(Duration::from_millis(15));
        assert!(d.poll());
    }
}
