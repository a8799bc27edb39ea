use std::fmt;
use std::str::FromStr;

use super::recognized_block::{RecognizedBlock, line_texts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "SUCCEEDED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One status/result page returned by the analysis backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPage {
    pub status: JobStatus,
    pub blocks: Vec<RecognizedBlock>,
    pub next_token: Option<String>,
    pub status_message: Option<String>,
}

impl AnalysisPage {
    pub fn in_progress() -> Self {
        Self {
            status: JobStatus::InProgress,
            blocks: Vec::new(),
            next_token: None,
            status_message: None,
        }
    }

    pub fn succeeded(blocks: Vec<RecognizedBlock>, next_token: Option<String>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            blocks,
            next_token,
            status_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            blocks: Vec::new(),
            next_token: None,
            status_message: Some(message.into()),
        }
    }
}

/// A running asynchronous analysis, owned by the poller until it reaches a
/// terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
    pub job_id: String,
    pub next_token: Option<String>,
    lines: Vec<String>,
}

impl AnalysisJob {
    pub fn new(job_id: String) -> Self {
        Self {
            job_id,
            next_token: None,
            lines: Vec::new(),
        }
    }

    /// Folds a successful result page in and records the next cursor.
    pub fn absorb(&mut self, page: AnalysisPage) {
        self.lines
            .extend(line_texts(&page.blocks).map(str::to_string));
        self.next_token = page.next_token;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_text(self) -> String {
        self.lines.join(" ")
    }
}
