//! Dockerfile convention checks: non-root runtime user and a health check.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use stackseed_core::{ConventionViolation, DockerfileRule};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{OpsError, OpsResult};

/// One logical instruction, continuation lines already joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerInstruction {
    /// Upper-cased keyword (`FROM`, `USER`, ...).
    pub keyword: String,
    pub args: String,
    /// 1-based line the instruction starts on.
    pub line: usize,
}

/// Split Dockerfile text into instructions, skipping comments and blanks.
///
/// BuildKit heredoc bodies (`RUN <<EOF` ... `EOF`) belong to the instruction
/// that opened them and are never read as instructions themselves.
pub fn parse_dockerfile(text: &str) -> Vec<DockerInstruction> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut start_line = 0usize;
    let mut heredocs: VecDeque<String> = VecDeque::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw.trim();
        if let Some(terminator) = heredocs.front() {
            if trimmed == terminator.as_str() {
                heredocs.pop_front();
            }
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if buf.is_empty() {
            start_line = line_no;
        } else {
            buf.push(' ');
        }
        if let Some(prefix) = trimmed.strip_suffix('\\') {
            buf.push_str(prefix.trim_end());
            continue;
        }
        buf.push_str(trimmed);
        heredocs.extend(heredoc_terminators(&buf));
        flush(&mut buf, start_line, &mut out);
    }
    // Trailing continuation with no closing line.
    flush(&mut buf, start_line, &mut out);
    out
}

/// Terminator words of every heredoc an instruction opens, in order.
/// Handles `<<EOF`, `<<-EOF`, `<<"EOF"` and `<<'EOF'`.
fn heredoc_terminators(instruction: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = instruction;
    while let Some(pos) = rest.find("<<") {
        rest = &rest[pos + 2..];
        let marker = rest.strip_prefix('-').unwrap_or(rest);
        let marker = marker.trim_start_matches(|c| c == '"' || c == '\'');
        let word: String = marker
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if !word.is_empty() {
            found.push(word);
        }
    }
    found
}

fn flush(buf: &mut String, line: usize, out: &mut Vec<DockerInstruction>) {
    let mut parts = buf.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or("").to_ascii_uppercase();
    let args = parts.next().unwrap_or("").trim().to_string();
    if !keyword.is_empty() {
        out.push(DockerInstruction {
            keyword,
            args,
            line,
        });
    }
    buf.clear();
}

/// Check the runtime stage of a Dockerfile.
///
/// The runtime stage is everything after the last `FROM`. The three rules are
/// evaluated independently, so every failure is reported.
pub fn check_dockerfile(text: &str) -> Vec<ConventionViolation> {
    let instructions = parse_dockerfile(text);
    let stage_start = instructions
        .iter()
        .rposition(|ins| ins.keyword == "FROM")
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let runtime = &instructions[stage_start..];

    let last_user = runtime.iter().rev().find(|ins| ins.keyword == "USER");
    let healthcheck = runtime
        .iter()
        .rev()
        .find(|ins| ins.keyword == "HEALTHCHECK");

    let mut violations = Vec::new();

    if last_user.is_none() {
        violations.push(ConventionViolation {
            rule: DockerfileRule::UserRequired,
            line: None,
            message: "runtime stage has no USER directive; the container would run as root"
                .to_string(),
        });
    }

    if let Some(user) = last_user.filter(|ins| is_root_user(&ins.args)) {
        violations.push(ConventionViolation {
            rule: DockerfileRule::NonRootUser,
            line: Some(user.line),
            message: format!("USER {} runs the container as root", user.args),
        });
    }

    match healthcheck {
        None => violations.push(ConventionViolation {
            rule: DockerfileRule::HealthcheckRequired,
            line: None,
            message: "runtime stage has no HEALTHCHECK directive".to_string(),
        }),
        Some(ins) if ins.args.eq_ignore_ascii_case("none") => {
            violations.push(ConventionViolation {
                rule: DockerfileRule::HealthcheckRequired,
                line: Some(ins.line),
                message: "HEALTHCHECK NONE disables the health check".to_string(),
            })
        }
        Some(_) => {}
    }

    violations
}

/// `root`, uid `0`, with or without a group (`root:root`, `0:0`).
fn is_root_user(args: &str) -> bool {
    let user = args
        .split_whitespace()
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");
    user == "root" || (!user.is_empty() && user.chars().all(|c| c == '0'))
}

/// Whether a file name looks like a Dockerfile.
pub fn is_dockerfile_name(name: &str) -> bool {
    name == "Dockerfile" || name.starts_with("Dockerfile.") || name.ends_with(".Dockerfile")
}

/// Resolve `path` to the Dockerfiles it names.
///
/// A file is returned as-is; a directory is walked for Dockerfile names,
/// skipping `.git` and `target`. Results are sorted for stable reports.
pub fn discover_dockerfiles(path: &Path) -> OpsResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(OpsError::DockerfileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut found: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && (name == ".git" || name == "target"))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_dockerfile_name(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();
    found.sort();

    debug!(root = %path.display(), count = found.len(), "Discovered Dockerfiles");
    if found.is_empty() {
        return Err(OpsError::DockerfileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(found)
}
