//! Request pacing for marketplace fetch workers
//!
//! The marketplace penalizes burst traffic independent of true concurrency,
//! so each worker slot spaces its requests out. The pacer is tuned in
//! requests per second and is deliberately decoupled from the concurrency
//! bound.

use std::time::Duration;
use tokio::time::Instant;

pub struct Pacer {
    min_gap: Duration,
}

impl Pacer {
    pub fn new(requests_per_second: f64) -> Self {
        let rps = requests_per_second.max(0.001);
        Self {
            min_gap: Duration::from_secs_f64(1.0 / rps),
        }
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    /// Sleeps out whatever remains of the spacing window opened at
    /// `request_started`. A request slower than the gap pays nothing extra.
    pub async fn pace_from(&self, request_started: Instant) {
        let deadline = request_started + self.min_gap;
        if deadline > Instant::now() {
            tokio::time::sleep_until(deadline).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_follows_request_rate() {
        assert_eq!(Pacer::new(2.0).min_gap(), Duration::from_millis(500));
        assert_eq!(Pacer::new(1.0).min_gap(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_rate_does_not_divide_by_zero() {
        assert!(Pacer::new(0.0).min_gap() <= Duration::from_secs(1000));
    }

    #[tokio::test]
    async fn test_slow_request_pays_no_extra_wait() {
        let pacer = Pacer::new(10.0);
        let started = Instant::now() - Duration::from_millis(200);

        let before = Instant::now();
        pacer.pace_from(started).await;
        assert!(before.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_fast_request_waits_out_the_gap() {
        let pacer = Pacer::new(20.0);
        let started = Instant::now();

        pacer.pace_from(started).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
