//! stackseed operations layer
//!
//! Typed API behind the `stackseed` CLI:
//! - **Scaffold writer**: renders the artifact manifest and writes each target
//!   idempotently (`preserve`) or destructively (`force`).
//! - **Policy gate**: audits a JSON plan for mandatory tags on created resources.
//! - **Dockerfile conventions**: non-root runtime user and a health check.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stackseed_ops::{Config, OpsContext, ScaffoldRequest};
//!
//! fn main() -> Result<(), stackseed_ops::OpsError> {
//!     let ctx = OpsContext::new(Config::load()?);
//!     let response = ctx.scaffold(&ScaffoldRequest::new("."))?;
//!     for entry in &response.entries {
//!         println!("{} {}", entry.status.label(), entry.path.display());
//!     }
//!     Ok(())
//! }
//! ```

mod audit;
mod config;
mod context;
mod dockerfile;
mod error;
mod manifest;
mod plan;
mod requests;
mod responses;
mod writer;

// Re-export public API
pub use audit::{audit, audit_with_options, AuditOptions};
pub use config::{Config, CONFIG_FILE_ENV};
pub use context::OpsContext;
pub use dockerfile::{check_dockerfile, discover_dockerfiles, parse_dockerfile, DockerInstruction};
pub use error::{OpsError, OpsResult};
pub use manifest::{Artifact, TemplateParams};
pub use plan::{load_plan, parse_plan};
pub use requests::*;
pub use responses::*;
pub use writer::{target_exists, write_target};
