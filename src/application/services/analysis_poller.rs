use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    Clock, DocumentAnalysisError, DocumentAnalysisService, ObjectStorage, ObjectStorageError,
};
use crate::domain::{ANALYSIS_FEATURES, AnalysisJob, JobStatus, ObjectLocation};

pub const DEFAULT_FOLDER: &str = "textract_documents";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub folder: String,
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("upload to object storage failed: {0}")]
    Upload(#[source] ObjectStorageError),
    #[error("analysis job could not be started: {0}")]
    JobStart(#[source] DocumentAnalysisError),
    #[error("analysis status query failed: {0}")]
    StatusQuery(#[source] DocumentAnalysisError),
    #[error("document analysis failed: {status_message}")]
    AnalysisJobFailed { status_message: String },
    #[error("document analysis still in progress after {waited:?}")]
    Timeout { waited: Duration },
    #[error("document analysis cancelled")]
    Cancelled,
}

#[derive(Debug)]
enum PollState {
    Uploading,
    Starting(ObjectLocation),
    Polling(AnalysisJob),
    Succeeded(AnalysisJob),
}

/// Drives one multi-page analysis from upload to its terminal status.
pub struct AnalysisPoller {
    storage: Arc<dyn ObjectStorage>,
    analysis: Arc<dyn DocumentAnalysisService>,
    clock: Arc<dyn Clock>,
    settings: PollerSettings,
}

impl AnalysisPoller {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        analysis: Arc<dyn DocumentAnalysisService>,
        clock: Arc<dyn Clock>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            storage,
            analysis,
            clock,
            settings,
        }
    }

    /// Uploads `data`, starts the job and collects every recognized line.
    /// Lines are joined with a single space in backend order.
    #[tracing::instrument(skip(self, data, cancel), fields(bytes = data.len()))]
    pub async fn run(
        &self,
        filename: &str,
        data: Bytes,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError> {
        let started = self.clock.now();
        let budget = Budget {
            started,
            deadline: started + self.settings.max_wait,
            cancel,
        };
        let mut state = PollState::Uploading;

        loop {
            state = match state {
                PollState::Uploading => {
                    let key = ObjectLocation::key_for(&self.settings.folder, filename);
                    let location = self
                        .bounded(&budget, self.storage.put(&key, data.clone()))
                        .await?
                        .map_err(AnalysisError::Upload)?;
                    tracing::info!(%location, "Document uploaded for analysis");
                    PollState::Starting(location)
                }
                PollState::Starting(location) => {
                    let job_id = self
                        .bounded(&budget, self.analysis.start(&location, &ANALYSIS_FEATURES))
                        .await?
                        .map_err(AnalysisError::JobStart)?;
                    tracing::info!(job_id = %job_id, "Analysis job started");
                    PollState::Polling(AnalysisJob::new(job_id))
                }
                PollState::Polling(mut job) => {
                    if cancel.is_cancelled() {
                        return Err(AnalysisError::Cancelled);
                    }

                    let query = self
                        .analysis
                        .get_status(&job.job_id, job.next_token.as_deref());
                    let page = self
                        .bounded(&budget, query)
                        .await?
                        .map_err(AnalysisError::StatusQuery)?;

                    match page.status {
                        JobStatus::InProgress => {
                            let now = self.clock.now();
                            if now >= budget.deadline {
                                tracing::warn!(job_id = %job.job_id, "Analysis job exceeded max wait");
                                return Err(AnalysisError::Timeout {
                                    waited: now - budget.started,
                                });
                            }
                            let pause = self.settings.poll_interval.min(budget.deadline - now);
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
                                _ = self.clock.sleep(pause) => {}
                            }
                            PollState::Polling(job)
                        }
                        JobStatus::Succeeded => {
                            job.absorb(page);
                            tracing::debug!(
                                job_id = %job.job_id,
                                lines = job.lines().len(),
                                more = job.next_token.is_some(),
                                "Analysis page collected"
                            );
                            if job.next_token.is_some() {
                                PollState::Polling(job)
                            } else {
                                PollState::Succeeded(job)
                            }
                        }
                        JobStatus::Failed => {
                            let status_message = page.status_message.unwrap_or_default();
                            tracing::error!(job_id = %job.job_id, %status_message, "Analysis job failed");
                            return Err(AnalysisError::AnalysisJobFailed { status_message });
                        }
                    }
                }
                PollState::Succeeded(job) => return Ok(job.into_text()),
            };
        }
    }

    /// Awaits one collaborator call unless cancellation or the deadline comes first.
    async fn bounded<T>(
        &self,
        budget: &Budget<'_>,
        call: impl Future<Output = T>,
    ) -> Result<T, AnalysisError> {
        let remaining = budget.deadline.saturating_duration_since(self.clock.now());
        tokio::select! {
            biased;
            _ = budget.cancel.cancelled() => Err(AnalysisError::Cancelled),
            output = call => Ok(output),
            _ = self.clock.sleep(remaining) => {
                let waited = self.clock.now() - budget.started;
                tracing::warn!(?waited, "Analysis call exceeded max wait");
                Err(AnalysisError::Timeout { waited })
            }
        }
    }
}

struct Budget<'a> {
    started: Instant,
    deadline: Instant,
    cancel: &'a CancellationToken,
}
