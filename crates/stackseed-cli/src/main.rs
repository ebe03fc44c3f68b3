//! Stackseed CLI - Scaffold a tagged container-registry stack and gate it.
//!
//! Writes registry Terraform, a Helm chart, a Dockerfile, a service stub and a
//! dry-run CI workflow, then checks plans and Dockerfiles against conventions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stackseed_core::OverwritePolicy;
use stackseed_ops::{Config, OpsContext};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;

use commands::{audit, config as config_cmd, dockerfile, init, status, OutputFormat};

/// Stackseed CLI - Scaffold infrastructure files and enforce tagging.
///
/// Run `stackseed` or `stackseed init` to scaffold the current directory.
/// Existing files are kept unless `--force` is given.
#[derive(Parser, Debug)]
#[command(
    name = "stackseed",
    author,
    version,
    about = "Stackseed: scaffold registry infrastructure and gate it on conventions",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Overwrite files that already exist (when no command is given)
    #[arg(long)]
    force: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the scaffold (default command).
    Init {
        /// Directory to scaffold into (defaults to current directory).
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Overwrite files that already exist.
        #[arg(long)]
        force: bool,
    },

    /// Show which scaffold files exist.
    Status {
        /// Directory to check (defaults to current directory).
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Fail when a planned create lacks a mandatory tag.
    AuditPlan {
        /// Plan document produced by `terraform show -json`.
        plan: PathBuf,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Exempt resources whose planned state has no tag attribute.
        #[arg(long)]
        skip_untaggable: bool,
    },

    /// Fail when a Dockerfile runs as root or lacks a health check.
    CheckDockerfile {
        /// Dockerfile, or directory to search for Dockerfiles.
        #[arg(default_value = "Dockerfile")]
        path: PathBuf,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Default to init if no command given
    let command = cli.command.unwrap_or(Commands::Init {
        root: PathBuf::from("."),
        force: false,
    });
    if cli.force && !matches!(command, Commands::Init { .. }) {
        anyhow::bail!("--force only applies to init");
    }

    match command {
        Commands::Init { root, force } => {
            let ctx = OpsContext::new(Config::load()?);
            init::execute(&ctx, &root, OverwritePolicy::from_force(cli.force || force))?;
        }

        Commands::Status { root } => {
            let ctx = OpsContext::new(Config::load()?);
            status::execute(&ctx, &root)?;
        }

        Commands::AuditPlan {
            plan,
            format,
            skip_untaggable,
        } => {
            let format: OutputFormat = format.parse()?;
            audit::execute(&gate_context(), &plan, skip_untaggable, format)?;
        }

        Commands::CheckDockerfile { path, format } => {
            let format: OutputFormat = format.parse()?;
            dockerfile::execute(&gate_context(), &path, format)?;
        }

        // Config commands never validate on load, so a bad value can be
        // inspected and repaired.
        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&Config::load_file()?.with_env_overrides())?;
            }
            ConfigCommands::Set { key, value } => {
                let mut config = Config::load_file()?;
                config_cmd::set(&mut config, &key, &value)?;
            }
            ConfigCommands::Get { key } => {
                config_cmd::get(&Config::load_file()?.with_env_overrides(), &key)?;
            }
            ConfigCommands::Reset => {
                config_cmd::reset()?;
            }
            ConfigCommands::Path => {
                config_cmd::path()?;
            }
        },
    }

    Ok(())
}

/// The gates never read scaffold parameters, so a broken config or a stray
/// `STACKSEED_*` variable must not block them.
fn gate_context() -> OpsContext {
    OpsContext::new(Config::default())
}
