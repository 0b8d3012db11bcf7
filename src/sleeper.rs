//! Cooperative scheduler.
//!
//! The scan runs on the host's single thread of control. `Sleeper` lets it
//! work in slices and, after each slice longer than the minimum task time,
//! sleeps long enough that work takes roughly `duty_cycle` of wall-clock
//! time. It also keeps the task telemetry reported with the result.

use std::time::Duration;

use tokio::time::Instant;

const MIN_DUTY_CYCLE: f64 = 0.01;
const MAX_DUTY_CYCLE: f64 = 1.0;

/// Duty-cycle scheduler with task-time accounting.
#[derive(Debug)]
pub struct Sleeper {
    min_task_time: Duration,
    duty_cycle: f64,
    started: Instant,
    last_yield: Instant,
    longest_task: Duration,
    total_tasks_time: Duration,
}

impl Sleeper {
    #[must_use]
    pub fn new(min_task_time: Duration, duty_cycle: f64) -> Self {
        let now = Instant::now();
        let duty_cycle = if duty_cycle.is_nan() {
            MAX_DUTY_CYCLE
        } else {
            duty_cycle.clamp(MIN_DUTY_CYCLE, MAX_DUTY_CYCLE)
        };
        Self {
            min_task_time,
            duty_cycle,
            started: now,
            last_yield: now,
            longest_task: Duration::ZERO,
            total_tasks_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    /// Yield if the current slice has run for at least the minimum task time.
    ///
    /// The slice is committed to the telemetry and the caller sleeps for
    /// `task * (1 - duty_cycle) / duty_cycle`. This is the only suspension
    /// point of the scan.
    pub async fn maybe_sleep(&mut self) {
        let task = self.last_yield.elapsed();
        if task < self.min_task_time {
            return;
        }

        self.longest_task = self.longest_task.max(task);
        self.total_tasks_time += task;

        let delay = task.mul_f64((1.0 - self.duty_cycle) / self.duty_cycle);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        self.last_yield = Instant::now();
    }

    /// Longest slice so far, including the one still running.
    #[must_use]
    pub fn longest_task(&self) -> Duration {
        self.longest_task.max(self.last_yield.elapsed())
    }

    /// Total work time, including the slice still running.
    #[must_use]
    pub fn total_tasks_time(&self) -> Duration {
        self.total_tasks_time + self.last_yield.elapsed()
    }

    /// Wall-clock time since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_cycle_is_clamped() {
        assert_eq!(Sleeper::new(Duration::ZERO, 0.0).duty_cycle(), 0.01);
        assert_eq!(Sleeper::new(Duration::ZERO, 7.0).duty_cycle(), 1.0);
        assert_eq!(Sleeper::new(Duration::ZERO, f64::NAN).duty_cycle(), 1.0);
        assert_eq!(Sleeper::new(Duration::ZERO, 0.05).duty_cycle(), 0.05);
    }

    #[tokio::test(start_paused = true)]
    async fn short_slice_does_not_yield() {
        let mut sleeper = Sleeper::new(Duration::from_millis(10), 0.05);
        tokio::time::advance(Duration::from_millis(4)).await;
        sleeper.maybe_sleep().await;

        assert_eq!(sleeper.elapsed(), Duration::from_millis(4));
        assert_eq!(sleeper.total_tasks_time(), Duration::from_millis(4));
        assert_eq!(sleeper.longest_task(), Duration::from_millis(4));
    }

    #[tokio::test(start_paused = true)]
    async fn long_slice_sleeps_by_duty_cycle() {
        let mut sleeper = Sleeper::new(Duration::from_millis(10), 0.05);
        tokio::time::advance(Duration::from_millis(20)).await;
        sleeper.maybe_sleep().await;

        // 20ms of work at a 5% duty cycle buys 380ms of sleep; the timer
        // wheel has millisecond granularity.
        let elapsed = sleeper.elapsed();
        assert!(elapsed >= Duration::from_millis(399), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(401), "{elapsed:?}");
        assert_eq!(sleeper.total_tasks_time(), Duration::from_millis(20));
        assert_eq!(sleeper.longest_task(), Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn telemetry_accumulates_across_slices() {
        let mut sleeper = Sleeper::new(Duration::from_millis(10), 0.5);
        tokio::time::advance(Duration::from_millis(30)).await;
        sleeper.maybe_sleep().await;
        tokio::time::advance(Duration::from_millis(12)).await;
        sleeper.maybe_sleep().await;
        tokio::time::advance(Duration::from_millis(3)).await;

        assert_eq!(sleeper.total_tasks_time(), Duration::from_millis(45));
        assert_eq!(sleeper.longest_task(), Duration::from_millis(30));
        // 30 + 30 + 12 + 12 + 3, give or take timer rounding
        let elapsed = sleeper.elapsed();
        assert!(elapsed >= Duration::from_millis(87), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(89), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn full_duty_cycle_never_sleeps() {
        let mut sleeper = Sleeper::new(Duration::from_millis(1), 1.0);
        tokio::time::advance(Duration::from_millis(5)).await;
        sleeper.maybe_sleep().await;
        assert_eq!(sleeper.elapsed(), Duration::from_millis(5));
        assert_eq!(sleeper.total_tasks_time(), Duration::from_millis(5));
    }
}
