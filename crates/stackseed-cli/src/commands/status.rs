//! Status command implementation.

use std::path::Path;

use anyhow::Result;
use humansize::{format_size, DECIMAL};
use stackseed_ops::{Config, OpsContext, StatusRequest};

/// Print which scaffold targets exist under `root`.
pub fn execute(ctx: &OpsContext, root: &Path) -> Result<()> {
    let response = ctx.status(&StatusRequest::new(root))?;

    println!("📊 Stackseed Status");
    println!("{:─<50}", "");
    println!();
    println!("📁 Project:    {}", ctx.config.project_name);
    println!("📍 Root:       {}", response.root.display());
    println!("🌐 Region:     {}", ctx.config.aws_region);
    println!();
    println!("📦 Targets:");
    for target in &response.targets {
        let marker = if target.exists { "✅" } else { "⬜" };
        match target.size {
            Some(size) => println!(
                "   {} {} ({})",
                marker,
                target.path.display(),
                format_size(size, DECIMAL)
            ),
            None => println!("   {} {}", marker, target.path.display()),
        }
    }

    println!();
    println!(
        "   {} present, {} missing",
        response.present_count(),
        response.missing_count()
    );
    println!(
        "⚙️  Config:     {}",
        Config::config_file_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    Ok(())
}
