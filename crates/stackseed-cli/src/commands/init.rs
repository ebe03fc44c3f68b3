//! Init command implementation.
//!
//! Writes every scaffold target, keeping existing files unless forced.

use std::path::Path;

use anyhow::Result;
use stackseed_core::OverwritePolicy;
use stackseed_ops::{EntryStatus, OpsContext, ScaffoldRequest};

/// Scaffold `root` and print one line per target.
pub fn execute(ctx: &OpsContext, root: &Path, policy: OverwritePolicy) -> Result<()> {
    let request = ScaffoldRequest::new(root).with_policy(policy);
    let response = ctx.scaffold(&request)?;

    for entry in &response.entries {
        match &entry.status {
            EntryStatus::Failed { error } => {
                println!("{} {}: {}", entry.status.label(), entry.path.display(), error)
            }
            status => println!("{} {}", status.label(), entry.path.display()),
        }
    }

    println!();
    println!(
        "{} written, {} skipped, {} failed",
        response.written_count(),
        response.skipped_count(),
        response.failed_count()
    );

    if !response.is_success() {
        anyhow::bail!(
            "{} of {} scaffold targets failed",
            response.failed_count(),
            response.entries.len()
        );
    }
    Ok(())
}
