//! Response DTOs for operations.
//!
//! Each response type contains all the data produced by an operation,
//! so the CLI can print text or serialize it as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stackseed_core::{ConventionViolation, OverwritePolicy, TagViolation, WriteOutcome};

use crate::manifest::Artifact;

/// Per-target result of a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EntryStatus {
    Written,
    Skipped,
    Failed { error: String },
}

impl EntryStatus {
    /// Status label printed next to each path.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Written => WriteOutcome::Written.label(),
            EntryStatus::Skipped => WriteOutcome::Skipped.label(),
            EntryStatus::Failed { .. } => "FAIL",
        }
    }
}

impl From<WriteOutcome> for EntryStatus {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Written => EntryStatus::Written,
            WriteOutcome::Skipped => EntryStatus::Skipped,
        }
    }
}

/// One scaffold target and what happened to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldEntry {
    pub artifact: Artifact,
    /// Path relative to the scaffold root.
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: EntryStatus,
}

/// Response from a scaffold run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldResponse {
    pub root: PathBuf,
    pub policy: OverwritePolicy,
    /// One entry per manifest artifact, in manifest order.
    pub entries: Vec<ScaffoldEntry>,
}

impl ScaffoldResponse {
    pub fn written_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Written))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Failed { .. }))
    }

    /// True when no target failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }
}

/// Presence of a single scaffold target on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStatus {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub exists: bool,
    /// Size on disk when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Response from a status operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub root: PathBuf,
    pub targets: Vec<TargetStatus>,
}

impl StatusResponse {
    pub fn present_count(&self) -> usize {
        self.targets.iter().filter(|t| t.exists).count()
    }

    pub fn missing_count(&self) -> usize {
        self.targets.len() - self.present_count()
    }
}

/// Response from a plan audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPlanResponse {
    pub plan_path: PathBuf,
    /// Number of resources in the plan.
    pub resource_count: usize,
    /// Number of resources the gate applied to (`create` actions).
    pub created_count: usize,
    pub violations: Vec<TagViolation>,
}

impl AuditPlanResponse {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Convention results for one Dockerfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerfileReport {
    pub path: PathBuf,
    pub violations: Vec<ConventionViolation>,
}

/// Response from a Dockerfile convention check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDockerfileResponse {
    pub reports: Vec<DockerfileReport>,
}

impl CheckDockerfileResponse {
    pub fn violation_count(&self) -> usize {
        self.reports.iter().map(|r| r.violations.len()).sum()
    }

    pub fn is_compliant(&self) -> bool {
        self.violation_count() == 0
    }
}
