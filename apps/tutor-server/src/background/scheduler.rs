//! Recurring job scheduler using tokio-cron-scheduler.

use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler.
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// Job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
    started: bool,
}

impl Scheduler {
    /// Create a new scheduler.
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self {
            inner,
            config,
            started: false,
        })
    }

    /// Add a job that runs every `period`, first firing one period from now.
    ///
    /// # Example
    /// ```ignore
    /// scheduler.add_repeated(Duration::from_secs(300), || async {
    ///     tracing::info!("Running five-minute job");
    /// }).await?;
    /// ```
    pub async fn add_repeated<F, Fut>(
        &self,
        period: Duration,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_repeated_async(period, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(period_secs = period.as_secs(), job_id = %id, "Repeated job registered");
        Ok(id)
    }

    /// Start the scheduler.
    pub async fn start(&mut self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::warn!("Scheduler disabled - rate limiter tables will not be reset");
            return Ok(());
        }

        self.inner.start().await?;
        self.started = true;
        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Stop the scheduler. A no-op when it was never started.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        if !self.started {
            return Ok(());
        }
        self.inner.shutdown().await?;
        self.started = false;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}
