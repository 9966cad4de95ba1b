//! Periodic reset of the rate limiter tables.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::JobSchedulerError;
use tutor_core::domain::LimiterScope;
use tutor_core::ports::ClientRateLimiter;

use super::Scheduler;
use crate::state::AppState;

/// Drop every client bucket of one limiter.
///
/// Exhausted clients get a full quota back; this is the price of bounding
/// the table without per-client idle tracking.
pub fn sweep_limiter(scope: LimiterScope, limiter: &dyn ClientRateLimiter) -> usize {
    let dropped = limiter.sweep();
    tracing::info!(scope = %scope, dropped, "Rate limiter table reset");
    dropped
}

/// Register one repeated sweep job per limiter.
pub async fn schedule_limiter_sweeps(
    scheduler: &Scheduler,
    state: &AppState,
    period: Duration,
) -> Result<(), JobSchedulerError> {
    let limiters: [(LimiterScope, Arc<dyn ClientRateLimiter>); 2] = [
        (LimiterScope::Global, state.global_limiter.clone()),
        (LimiterScope::Api, state.api_limiter.clone()),
    ];

    for (scope, limiter) in limiters {
        scheduler
            .add_repeated(period, move || {
                let limiter = limiter.clone();
                async move {
                    sweep_limiter(scope, limiter.as_ref());
                }
            })
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tutor_core::domain::RateLimitConfig;
    use tutor_infra::KeyedRateLimiter;

    use crate::background::SchedulerConfig;
    use crate::config::AppConfig;

    #[test]
    fn test_sweep_resets_exhausted_client() {
        let limiter =
            KeyedRateLimiter::new(LimiterScope::Api, RateLimitConfig::new(10, 15)).unwrap();

        for _ in 0..15 {
            assert!(limiter.allow("203.0.113.5"));
        }
        assert!(!limiter.allow("203.0.113.5"));

        assert_eq!(sweep_limiter(LimiterScope::Api, &limiter), 1);
        assert!(limiter.allow("203.0.113.5"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scheduled_sweeps_clear_both_tables() {
        let state = AppState::new(&AppConfig::default()).unwrap();
        assert!(state.global_limiter.allow("203.0.113.5"));
        assert!(state.api_limiter.allow("203.0.113.5"));
        assert!(state.api_limiter.allow("203.0.113.6"));

        let mut scheduler = Scheduler::new(SchedulerConfig { enabled: true })
            .await
            .unwrap();
        schedule_limiter_sweeps(&scheduler, &state, Duration::from_secs(1))
            .await
            .unwrap();
        scheduler.start().await.unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while state.global_limiter.tracked_clients() + state.api_limiter.tracked_clients() > 0 {
            assert!(Instant::now() < deadline, "sweep jobs did not run");
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        scheduler.shutdown().await.unwrap();
    }
}
