//! Background job runner port: submit a long-running unit of work
//! (Excel import, bulk score recompute) and poll it later by id. The
//! worker bound is adjustable via `configure`; `tournament-jobs` provides
//! a `tokio`-native implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub label: String,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait JobRunnerPort: Send + Sync {
    /// Resize the worker pool. Matches `background_jobs.configure`.
    fn configure(&self, max_workers: usize);

    /// Enqueue `work`, returning immediately with the job id the caller
    /// polls with `get`. `label` is surfaced back in `JobRecord` for the
    /// jobs-status view.
    fn submit(
        &self,
        label: &str,
        work: Box<dyn FnOnce() -> Result<String, String> + Send + 'static>,
    ) -> Uuid;

    async fn get(&self, id: Uuid) -> Option<JobRecord>;
}
