use std::time::{Duration, Instant};

/// Fixed-interval step timer.
///
/// Time is passed in by the caller. Each elapsed interval yields at most one tick, and ticks
/// missed while the caller was busy are dropped rather than replayed.
#[derive(Debug)]
pub struct AutoRun {
    interval: Duration,
    /// `None` while stopped.
    next_tick: Option<Instant>,
    /// Ticks left before stopping by itself. `None` runs until toggled off.
    remaining: Option<u32>,
}

impl AutoRun {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
            remaining: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Start or stop. Returns whether the timer is now running.
    ///
    /// The first tick is due one interval after starting. `limit` is ignored when stopping.
    pub fn toggle(&mut self, now: Instant, limit: Option<u32>) -> bool {
        if self.is_running() || limit == Some(0) {
            self.stop();
        } else {
            self.next_tick = Some(now + self.interval);
            self.remaining = limit;
        }
        self.is_running()
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
        self.remaining = None;
    }

    /// Time left before the next tick is due. `None` while stopped.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|next_tick| next_tick.saturating_duration_since(now))
    }

    /// Returns `true` if a tick is due, and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next_tick) = self.next_tick else {
            return false;
        };
        if now < next_tick {
            return false;
        }
        self.next_tick = Some(now + self.interval);
        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
            if *remaining == 0 {
                self.stop();
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Count ticks when polling every millisecond over `span`.
    fn ticks(timer: &mut AutoRun, start: Instant, span: u64) -> u32 {
        (0..=span)
            .filter(|offset| timer.poll(start + ms(*offset)))
            .count() as u32
    }

    #[test]
    fn toggle_off_within_interval_never_ticks() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        assert!(timer.toggle(start, None));
        assert!(!timer.poll(start + ms(50)));
        assert!(!timer.toggle(start + ms(99), None));
        assert_eq!(ticks(&mut timer, start, 1000), 0);
    }

    #[test]
    fn first_tick_after_one_interval() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        timer.toggle(start, None);
        assert!(!timer.poll(start));
        assert!(!timer.poll(start + ms(99)));
        assert!(timer.poll(start + ms(100)));
        assert!(!timer.poll(start + ms(150)));
        assert!(timer.poll(start + ms(200)));
    }

    #[test]
    fn missed_ticks_are_dropped() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        timer.toggle(start, None);
        let late = start + ms(1000);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.time_until_tick(late), Some(INTERVAL));
        assert!(timer.poll(late + INTERVAL));
    }

    #[test]
    fn steady_rate() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        timer.toggle(start, None);
        assert_eq!(ticks(&mut timer, start, 1000), 10);
    }

    #[test]
    fn limit_stops_by_itself() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        timer.toggle(start, Some(3));
        assert_eq!(ticks(&mut timer, start, 1000), 3);
        assert!(!timer.is_running());
        assert_eq!(timer.time_until_tick(start), None);

        assert!(!timer.toggle(start, Some(0)));
    }

    #[test]
    fn time_until_tick_saturates() {
        let start = Instant::now();
        let mut timer = AutoRun::new(INTERVAL);
        assert_eq!(timer.time_until_tick(start), None);
        timer.toggle(start, None);
        assert_eq!(timer.time_until_tick(start + ms(30)), Some(ms(70)));
        assert_eq!(timer.time_until_tick(start + ms(500)), Some(Duration::ZERO));
    }
}
