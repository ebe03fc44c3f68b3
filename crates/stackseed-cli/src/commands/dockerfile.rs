//! Check-dockerfile command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use stackseed_ops::{CheckDockerfileRequest, OpsContext};

use super::OutputFormat;

/// Check every Dockerfile under `path` and fail on any violation.
pub fn execute(ctx: &OpsContext, path: &Path, format: OutputFormat) -> Result<()> {
    let response = ctx.check_dockerfiles(&CheckDockerfileRequest::new(path))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&response)
                .context("Failed to serialize Dockerfile report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for report in &response.reports {
                if report.violations.is_empty() {
                    println!("✅ {}", report.path.display());
                    continue;
                }
                println!("❌ {}", report.path.display());
                for violation in &report.violations {
                    println!("   {}", violation);
                }
            }
        }
    }

    if !response.is_compliant() {
        anyhow::bail!(
            "Dockerfile conventions failed: {} violation(s)",
            response.violation_count()
        );
    }
    Ok(())
}
