//! Progress reporting while waiting on the synchronize barrier.

use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 30;

/// Tracks how far the queue has drained since a barrier started.
///
/// Rendered lines go to the `log` facade at `info` level, at most once per
/// `interval`.
#[derive(Debug)]
pub(crate) struct SyncProgress {
    total: usize,
    started: Instant,
    last_report: Option<Instant>,
    interval: Duration,
}

impl SyncProgress {
    pub(crate) fn new(total: usize, interval: Duration) -> Self {
        Self {
            total,
            started: Instant::now(),
            last_report: None,
            interval,
        }
    }

    /// Reports `remaining` if the last report is older than the interval.
    pub(crate) fn update(&mut self, remaining: usize) {
        // Jobs added during the wait grow the denominator.
        self.total = self.total.max(remaining);

        let now = Instant::now();
        let due = self
            .last_report
            .map_or(true, |last| now.duration_since(last) >= self.interval);
        if due {
            self.last_report = Some(now);
            log::info!("{}", self.render(remaining, now.duration_since(self.started)));
        }
    }

    pub(crate) fn finish(&self) {
        log::info!("{}", self.render(0, self.started.elapsed()));
    }

    pub(crate) fn fraction_done(&self, remaining: usize) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        let done = self.total.saturating_sub(remaining);
        done as f64 / self.total as f64
    }

    pub(crate) fn render(&self, remaining: usize, elapsed: Duration) -> String {
        let fraction = self.fraction_done(remaining);
        let filled = (fraction * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {:5.1}% | {}/{} jobs remaining | {:.2}s elapsed",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            fraction * 100.0,
            remaining,
            self.total,
            elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_done() {
        let progress = SyncProgress::new(10, Duration::from_millis(250));
        assert_eq!(progress.fraction_done(10), 0.0);
        assert_eq!(progress.fraction_done(5), 0.5);
        assert_eq!(progress.fraction_done(0), 1.0);
    }

    #[test]
    fn test_empty_barrier_counts_as_done() {
        let progress = SyncProgress::new(0, Duration::from_millis(250));
        assert_eq!(progress.fraction_done(0), 1.0);
    }

    #[test]
    fn test_total_grows_with_late_jobs() {
        let mut progress = SyncProgress::new(4, Duration::from_secs(60));
        progress.update(8);
        assert_eq!(progress.total, 8);
        progress.update(2);
        assert_eq!(progress.total, 8);
        assert_eq!(progress.fraction_done(2), 0.75);
    }

    #[test]
    fn test_render() {
        let progress = SyncProgress::new(4, Duration::from_millis(250));
        let line = progress.render(2, Duration::from_millis(1500));
        assert!(line.starts_with(&format!("[{}{}]", "#".repeat(15), " ".repeat(15))));
        assert!(line.contains(" 50.0%"));
        assert!(line.contains("2/4 jobs remaining"));
        assert!(line.ends_with("1.50s elapsed"));
    }
}
