//! Generation job record and its state machine.
//!
//! `pending → processing → {completed | failed | cancelled}`. Pending is the
//! only non-terminal source state besides processing; the three outcomes are
//! terminal.

use crate::error::GenerationError;
use crate::mapping::FieldMapping;
use chrono::{DateTime, Utc};
use labelsmith_types::{DatasetId, JobId, OwnerId, TemplateId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based inclusive data-row range; an open end means "through the last
/// row of the dataset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl RowRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Concrete bounds against a dataset of `row_count` data rows.
    pub fn bounds(&self, row_count: u32) -> (u32, u32) {
        (self.start.unwrap_or(1), self.end.unwrap_or(row_count))
    }
}

/// Everything a generation run needs, fixed at job creation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Human-readable job name. Uniqueness per owner is the caller's
    /// responsibility; the model only carries the value.
    pub name: String,
    pub dataset: DatasetId,
    pub template: TemplateId,
    pub range: RowRange,
    /// Carried for request compatibility; the renderer emits one row per
    /// page regardless.
    pub labels_per_page: u32,
    pub mappings: Vec<FieldMapping>,
    pub owner: OwnerId,
}

impl GenerationRequest {
    pub fn new(
        name: impl Into<String>,
        dataset: DatasetId,
        template: TemplateId,
        owner: OwnerId,
    ) -> Self {
        Self {
            name: name.into(),
            dataset,
            template,
            range: RowRange::all(),
            labels_per_page: 1,
            mappings: Vec::new(),
            owner,
        }
    }

    /// Owned copies of the mappings in ascending render order.
    pub fn ordered_mappings(&self) -> Vec<FieldMapping> {
        let mut ordered = self.mappings.clone();
        ordered.sort_by_key(|m| m.order);
        ordered
    }
}

#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: JobId,
    pub request: GenerationRequest,
    status: JobStatus,
    pub progress_percent: u8,
    pub generated: u32,
    pub total: u32,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationJob {
    pub fn new(id: JobId, request: GenerationRequest) -> Self {
        Self {
            id,
            request,
            status: JobStatus::Pending,
            progress_percent: 0,
            generated: 0,
            total: 0,
            error: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    fn transition(&mut self, from: JobStatus, to: JobStatus) -> Result<(), GenerationError> {
        if self.status != from {
            return Err(GenerationError::InvalidTransition {
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }

    /// `pending → processing`; stamps `started_at`.
    pub fn begin(&mut self, total: u32) -> Result<(), GenerationError> {
        self.transition(JobStatus::Pending, JobStatus::Processing)?;
        self.started_at = Some(Utc::now());
        self.total = total;
        self.generated = 0;
        self.progress_percent = 0;
        Ok(())
    }

    pub fn update_progress(&mut self, generated: u32) {
        self.generated = generated;
        self.progress_percent = if self.total == 0 {
            100
        } else {
            ((generated as u64 * 100) / self.total as u64).min(100) as u8
        };
    }

    /// `processing → completed`; progress is forced to 100%.
    pub fn complete(&mut self) -> Result<(), GenerationError> {
        self.transition(JobStatus::Processing, JobStatus::Completed)?;
        self.progress_percent = 100;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// `processing → failed` with the error message preserved.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), GenerationError> {
        self.transition(JobStatus::Processing, JobStatus::Failed)?;
        self.error = Some(message.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// `processing → cancelled`. Cancellation is cooperative; the controller
    /// applies it at a row boundary.
    pub fn cancel(&mut self) -> Result<(), GenerationError> {
        self.transition(JobStatus::Processing, JobStatus::Cancelled)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}
