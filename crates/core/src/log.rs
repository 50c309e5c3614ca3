//! Append-only per-job log.
//!
//! Every generation run carries its own chronological narrative: warnings
//! from field resolution, per-row render failures, progress milestones. The
//! log is part of the generation result and outlives the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    pub severity: Severity,
    pub message: String,
    /// Data row the entry refers to, when row-scoped.
    pub row: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only; entries keep insertion (chronological) order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationLog {
    entries: Vec<GenerationLogEntry>,
}

impl GenerationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, row: Option<u32>) {
        self.entries.push(GenerationLogEntry {
            severity,
            message: message.into(),
            row,
            timestamp: Utc::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message, None);
    }

    pub fn warning(&mut self, message: impl Into<String>, row: Option<u32>) {
        self.push(Severity::Warning, message, row);
    }

    pub fn error(&mut self, message: impl Into<String>, row: Option<u32>) {
        self.push(Severity::Error, message, row);
    }

    pub fn entries(&self) -> &[GenerationLogEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &GenerationLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity >= Severity::Error)
    }
}
