//! Request DTOs for operations.
//!
//! Each request type encapsulates all the parameters needed for an operation,
//! built once from the command line and passed down unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stackseed_core::OverwritePolicy;

use crate::audit::AuditOptions;

/// Request to materialize the scaffold under a root directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldRequest {
    /// Directory the artifact paths are resolved against.
    pub root: PathBuf,

    /// What to do with files that already exist.
    #[serde(default)]
    pub policy: OverwritePolicy,
}

impl ScaffoldRequest {
    /// Scaffold into `root`, preserving existing files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: OverwritePolicy::Preserve,
        }
    }

    /// Replace existing files.
    pub fn force(mut self) -> Self {
        self.policy = OverwritePolicy::Force;
        self
    }

    /// Set the policy explicitly.
    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Request to report which scaffold targets are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub root: PathBuf,
}

impl StatusRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Request to audit a plan document for mandatory tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPlanRequest {
    /// Path to the JSON plan document.
    pub plan_path: PathBuf,

    #[serde(default)]
    pub options: AuditOptions,
}

impl AuditPlanRequest {
    pub fn new(plan_path: impl Into<PathBuf>) -> Self {
        Self {
            plan_path: plan_path.into(),
            options: AuditOptions::default(),
        }
    }

    /// Exempt resources that cannot carry tags.
    pub fn skip_untaggable(mut self, skip: bool) -> Self {
        self.options.skip_untaggable = skip;
        self
    }
}

/// Request to check one Dockerfile or every Dockerfile under a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDockerfileRequest {
    pub path: PathBuf,
}

impl CheckDockerfileRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
