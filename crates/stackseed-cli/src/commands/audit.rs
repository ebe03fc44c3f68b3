//! Audit-plan command implementation.
//!
//! Runs the mandatory-tag gate over a plan document. Any violation fails the
//! command after the full list has been printed.

use std::path::Path;

use anyhow::{Context, Result};
use stackseed_ops::{AuditPlanRequest, OpsContext};

use super::OutputFormat;

/// Audit `plan` and exit non-zero when a created resource lacks a tag.
pub fn execute(
    ctx: &OpsContext,
    plan: &Path,
    skip_untaggable: bool,
    format: OutputFormat,
) -> Result<()> {
    let request = AuditPlanRequest::new(plan).skip_untaggable(skip_untaggable);
    let response = ctx.audit_plan(&request)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)
                .context("Failed to serialize audit report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for violation in &response.violations {
                println!("❌ {}", violation);
            }
            if response.is_compliant() {
                println!(
                    "✅ {} planned creates carry every mandatory tag ({} resources checked)",
                    response.created_count, response.resource_count
                );
            }
        }
    }

    if !response.is_compliant() {
        anyhow::bail!(
            "Tag policy failed: {} resource(s) missing mandatory tags",
            response.violations.len()
        );
    }
    Ok(())
}
