//! Idempotent file writer used to materialize scaffold targets.

use std::fs;
use std::io::Write;
use std::path::Path;

use stackseed_core::{OverwritePolicy, WriteOutcome};
use tracing::debug;

use crate::error::{OpsError, OpsResult};

const TEMP_PREFIX: &str = ".stackseed-";

/// Whether anything (file, directory or dangling link) occupies `path`.
pub fn target_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Write `content` to `path` unless the file exists and `policy` preserves it.
///
/// Missing ancestor directories are created. The content is staged in a
/// temporary file next to the target and renamed over it, so the target either
/// holds the complete new content or is left as it was.
pub fn write_target(
    path: &Path,
    content: &[u8],
    policy: OverwritePolicy,
) -> OpsResult<WriteOutcome> {
    if target_exists(path) && !policy.allows_overwrite() {
        debug!(path = %path.display(), "Target exists, skipping");
        return Ok(WriteOutcome::Skipped);
    }
    let existing = fs::metadata(path).ok();

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| OpsError::write(path, e))?;

    let mut staged = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .map_err(|e| OpsError::write(path, e))?;
    staged
        .write_all(content)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| OpsError::write(path, e))?;

    let permissions = match existing {
        Some(meta) if meta.is_file() => meta.permissions(),
        _ => default_permissions(staged.as_file())?,
    };
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(|e| OpsError::write(path, e))?;

    // A failed rename drops the temp file and leaves the target untouched.
    staged
        .persist(path)
        .map_err(|e| OpsError::write(path, e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "Wrote target");
    Ok(WriteOutcome::Written)
}

#[cfg(unix)]
fn default_permissions(_file: &fs::File) -> OpsResult<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(file: &fs::File) -> OpsResult<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}
