//! tokio-native background job runner, the `JobRunnerPort` adapter.
//!
//! A fixed-size worker pool runs submitted closures and a `Mutex`-guarded
//! registry holds each job's status for later polling. The pool bound is
//! a `tokio::sync::Semaphore` permit count and each submitted closure
//! runs via `tokio::task::spawn_blocking`, since `JobRunnerPort::submit`
//! takes a synchronous closure.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tournament_core::{JobRecord, JobRunnerPort, JobStatus};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_MAX_WORKERS: usize = 2;

pub struct TokioJobRunner {
    registry: Arc<Mutex<HashMap<Uuid, JobRecord>>>,
    pool: Mutex<Arc<Semaphore>>,
}

impl Default for TokioJobRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORKERS)
    }
}

impl TokioJobRunner {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        TokioJobRunner {
            registry: Arc::new(Mutex::new(HashMap::new())),
            pool: Mutex::new(Arc::new(Semaphore::new(max_workers))),
        }
    }
}

#[async_trait]
impl JobRunnerPort for TokioJobRunner {
    #[instrument(name = "jobs.configure", skip(self))]
    fn configure(&self, max_workers: usize) {
        let max_workers = max_workers.max(1);
        let mut pool = self.pool.lock().expect("job pool mutex poisoned");
        *pool = Arc::new(Semaphore::new(max_workers));
        info!(max_workers, "job_pool_resized");
    }

    #[instrument(name = "jobs.submit", skip(self, work), fields(label))]
    fn submit(
        &self,
        label: &str,
        work: Box<dyn FnOnce() -> Result<String, String> + Send + 'static>,
    ) -> Uuid {
        let job_id = Uuid::new_v4();
        let record = JobRecord {
            id: job_id,
            label: label.to_string(),
            status: JobStatus::Pending,
            submitted_at: Utc::now(),
            finished_at: None,
            result: None,
            error: None,
        };

        self.registry
            .lock()
            .expect("job registry mutex poisoned")
            .insert(job_id, record);

        let semaphore = self.pool.lock().expect("job pool mutex poisoned").clone();
        let registry = Arc::clone(&self.registry);

        tokio::spawn(async move {
            let permit = semaphore
                .acquire_owned()
                .await
                .expect("job semaphore closed unexpectedly");

            if let Some(job) = registry.lock().expect("job registry mutex poisoned").get_mut(&job_id) {
                job.status = JobStatus::Running;
            }

            let outcome = tokio::task::spawn_blocking(work).await;
            drop(permit);

            let mut registry = registry.lock().expect("job registry mutex poisoned");
            if let Some(job) = registry.get_mut(&job_id) {
                job.finished_at = Some(Utc::now());
                match outcome {
                    Ok(Ok(result)) => {
                        job.status = JobStatus::Completed;
                        job.result = Some(result);
                    }
                    Ok(Err(err)) => {
                        warn!(job_id = %job_id, error = %err, "job_failed");
                        job.status = JobStatus::Failed;
                        job.error = Some(err);
                    }
                    Err(join_err) => {
                        warn!(job_id = %job_id, error = %join_err, "job_panicked");
                        job.status = JobStatus::Failed;
                        job.error = Some(format!("job panicked: {join_err}"));
                    }
                }
            }
        });

        job_id
    }

    async fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.registry
            .lock()
            .expect("job registry mutex poisoned")
            .get(&id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wait_for_terminal(runner: &TokioJobRunner, id: Uuid) -> JobRecord {
        for _ in 0..200 {
            if let Some(job) = runner.get(id).await {
                if matches!(job.status, JobStatus::Completed | JobStatus::Failed) {
                    return job;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("job never reached a terminal state");
    }

    #[tokio::test]
    async fn submitted_job_completes_and_is_pollable() {
        let runner = TokioJobRunner::new(2);
        let id = runner.submit("recompute_standings", Box::new(|| Ok("42".to_string())));

        let job = wait_for_terminal(&runner, id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn failed_job_records_the_error() {
        let runner = TokioJobRunner::new(1);
        let id = runner.submit("bad_import", Box::new(|| Err("bad row 7".to_string())));

        let job = wait_for_terminal(&runner, id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("bad row 7"));
    }

    #[tokio::test]
    async fn unknown_job_id_returns_none() {
        let runner = TokioJobRunner::new(1);
        assert!(runner.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn configure_resizes_pool_without_losing_in_flight_jobs() {
        let runner = TokioJobRunner::new(1);
        let id = runner.submit("slow", Box::new(|| Ok("done".to_string())));
        runner.configure(4);

        let job = wait_for_terminal(&runner, id).await;
        assert_eq!(job.status, JobStatus::Completed);
    }
}
