//! OpsContext - The main service for executing operations.
//!
//! The OpsContext holds configuration and provides methods for every
//! stackseed operation. The CLI is a thin layer over it.

use std::path::Path;

use stackseed_core::{PlanAction, ScaffoldTarget, MANDATORY_TAGS};
use tracing::{debug, info, warn};

use crate::audit::audit_with_options;
use crate::config::Config;
use crate::dockerfile::{check_dockerfile, discover_dockerfiles};
use crate::error::{OpsError, OpsResult};
use crate::manifest::Artifact;
use crate::plan::load_plan;
use crate::requests::*;
use crate::responses::*;
use crate::writer::{target_exists, write_target};

/// The main operations context.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,
}

impl OpsContext {
    /// Create a new OpsContext with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    // =========================================================================
    // Scaffold Operations
    // =========================================================================

    /// Render every manifest artifact into a target under `root`.
    ///
    /// Render failures are kept per artifact so one broken template does not
    /// hide the others.
    pub fn build_targets(&self, root: &Path) -> Vec<(Artifact, OpsResult<ScaffoldTarget>)> {
        Artifact::ALL
            .iter()
            .map(|&artifact| {
                let relative = artifact.relative_path(&self.config);
                let target = artifact.render(&self.config).map(|content| ScaffoldTarget {
                    exists: target_exists(&root.join(&relative)),
                    path: relative,
                    content: content.into_bytes(),
                });
                (artifact, target)
            })
            .collect()
    }

    /// Write the scaffold under `request.root`.
    ///
    /// Every target is attempted; a failed target is recorded and the run
    /// continues with the next one.
    pub fn scaffold(&self, request: &ScaffoldRequest) -> OpsResult<ScaffoldResponse> {
        ensure_directory_or_absent(&request.root)?;
        info!(
            root = %request.root.display(),
            policy = %request.policy,
            "Writing scaffold"
        );

        let mut entries = Vec::with_capacity(Artifact::ALL.len());
        for (artifact, target) in self.build_targets(&request.root) {
            let path = artifact.relative_path(&self.config);
            let status = match target {
                Ok(target) => {
                    debug!(
                        path = %target.path.display(),
                        exists = target.exists,
                        bytes = target.len(),
                        "Target ready"
                    );
                    match write_target(
                        &request.root.join(&target.path),
                        &target.content,
                        request.policy,
                    ) {
                        Ok(outcome) => EntryStatus::from(outcome),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Target failed");
                            EntryStatus::Failed {
                                error: e.to_string(),
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Template failed");
                    EntryStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            entries.push(ScaffoldEntry {
                artifact,
                path,
                status,
            });
        }

        let response = ScaffoldResponse {
            root: request.root.clone(),
            policy: request.policy,
            entries,
        };
        info!(
            written = response.written_count(),
            skipped = response.skipped_count(),
            failed = response.failed_count(),
            "Scaffold finished"
        );
        Ok(response)
    }

    /// Report which manifest targets exist under `request.root`.
    pub fn status(&self, request: &StatusRequest) -> OpsResult<StatusResponse> {
        ensure_directory_or_absent(&request.root)?;
        let targets = Artifact::ALL
            .iter()
            .map(|&artifact| {
                let path = artifact.relative_path(&self.config);
                let meta = std::fs::metadata(request.root.join(&path)).ok();
                TargetStatus {
                    artifact,
                    exists: meta.is_some(),
                    size: meta.filter(|m| m.is_file()).map(|m| m.len()),
                    path,
                }
            })
            .collect();

        Ok(StatusResponse {
            root: request.root.clone(),
            targets,
        })
    }

    // =========================================================================
    // Gate Operations
    // =========================================================================

    /// Audit a plan document against the mandatory tag set.
    pub fn audit_plan(&self, request: &AuditPlanRequest) -> OpsResult<AuditPlanResponse> {
        let plan = load_plan(&request.plan_path)?;
        let violations = audit_with_options(&plan, &MANDATORY_TAGS, request.options);
        let created_count = plan
            .iter()
            .filter(|r| r.action == PlanAction::Create)
            .count();

        info!(
            plan = %request.plan_path.display(),
            resources = plan.len(),
            created = created_count,
            violations = violations.len(),
            "Audited plan"
        );

        Ok(AuditPlanResponse {
            plan_path: request.plan_path.clone(),
            resource_count: plan.len(),
            created_count,
            violations,
        })
    }

    /// Check one Dockerfile, or every Dockerfile under a directory.
    pub fn check_dockerfiles(
        &self,
        request: &CheckDockerfileRequest,
    ) -> OpsResult<CheckDockerfileResponse> {
        let mut reports = Vec::new();
        for path in discover_dockerfiles(&request.path)? {
            let text = std::fs::read_to_string(&path)?;
            let violations = check_dockerfile(&text);
            debug!(path = %path.display(), violations = violations.len(), "Checked Dockerfile");
            reports.push(DockerfileReport { path, violations });
        }
        Ok(CheckDockerfileResponse { reports })
    }
}

fn ensure_directory_or_absent(root: &Path) -> OpsResult<()> {
    if root.exists() && !root.is_dir() {
        return Err(OpsError::path_resolution(root, "not a directory"));
    }
    Ok(())
}
