//! Core domain types shared across the stackseed workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Tag keys every newly created cloud resource must carry.
pub const MANDATORY_TAGS: [&str; 4] = ["Project", "Environment", "Owner", "CostCenter"];

// =============================================================================
// Scaffold Types
// =============================================================================

/// How the writer treats a target file that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Leave existing files untouched.
    #[default]
    Preserve,
    /// Replace existing files with freshly rendered content.
    Force,
}

impl OverwritePolicy {
    /// Build the policy from the `--force` switch.
    pub fn from_force(force: bool) -> Self {
        if force {
            Self::Force
        } else {
            Self::Preserve
        }
    }

    /// Whether an existing file may be replaced.
    pub fn allows_overwrite(&self) -> bool {
        matches!(self, Self::Force)
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserve => write!(f, "preserve"),
            Self::Force => write!(f, "force"),
        }
    }
}

/// Result of a single successful write decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// The full content landed at the target path.
    Written,
    /// The target already existed and the policy forbade replacing it.
    Skipped,
}

impl WriteOutcome {
    /// Status label printed next to each path.
    pub fn label(&self) -> &'static str {
        match self {
            WriteOutcome::Written => "WROTE",
            WriteOutcome::Skipped => "SKIP",
        }
    }
}

/// A file the scaffold wants to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldTarget {
    /// Path relative to the scaffold root.
    pub path: PathBuf,
    /// Rendered file content.
    pub content: Vec<u8>,
    /// Whether a file was already present when the target was built.
    pub exists: bool,
}

impl ScaffoldTarget {
    /// Create a target that has not been checked against the filesystem yet.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            exists: false,
        }
    }

    /// Size of the rendered content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the rendered content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// =============================================================================
// Plan Types
// =============================================================================

/// What the provisioning engine proposes to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanAction {
    Create,
    Update,
    Delete,
    NoOp,
}

impl PlanAction {
    /// Collapse the engine's action list into a single action.
    ///
    /// Replacements (`["delete", "create"]` in either order) count as
    /// `Create` because a new resource is made.
    pub fn from_actions<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (mut create, mut update, mut delete) = (false, false, false);
        for action in actions {
            match action.as_ref() {
                "create" => create = true,
                "update" => update = true,
                "delete" => delete = true,
                _ => {}
            }
        }
        if create {
            PlanAction::Create
        } else if update {
            PlanAction::Update
        } else if delete {
            PlanAction::Delete
        } else {
            PlanAction::NoOp
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanAction::Create => "create",
            PlanAction::Update => "update",
            PlanAction::Delete => "delete",
            PlanAction::NoOp => "no-op",
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One resource the provisioning engine proposes to touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResource {
    /// Fully qualified resource address, e.g. `aws_ecr_repository.this["api"]`.
    pub address: String,
    /// Resource type, e.g. `aws_ecr_repository`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Collapsed planned action.
    pub action: PlanAction,
    /// Effective tags after provider default tags were merged in.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Whether the planned state carries a tag attribute at all.
    #[serde(default = "default_taggable")]
    pub taggable: bool,
}

fn default_taggable() -> bool {
    true
}

impl PlanResource {
    /// Create a taggable resource without any tags.
    pub fn new(
        address: impl Into<String>,
        resource_type: impl Into<String>,
        action: PlanAction,
    ) -> Self {
        Self {
            address: address.into(),
            resource_type: resource_type.into(),
            action,
            tags: BTreeMap::new(),
            taggable: true,
        }
    }

    /// Add a tag (builder style).
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Whether a tag key is present, regardless of its value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

// =============================================================================
// Violations
// =============================================================================

/// A `create` resource missing one or more mandatory tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagViolation {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Missing keys, in mandatory-set order.
    pub missing_keys: Vec<String>,
}

impl fmt::Display for TagViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) is missing tags: {}",
            self.address,
            self.resource_type,
            self.missing_keys.join(", ")
        )
    }
}

/// Dockerfile conventions enforced before an image is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockerfileRule {
    /// The runtime stage must declare a `USER`.
    UserRequired,
    /// The runtime `USER` must not be root.
    NonRootUser,
    /// The runtime stage must declare a `HEALTHCHECK`.
    HealthcheckRequired,
}

impl DockerfileRule {
    /// Stable identifier used in reports.
    pub fn id(&self) -> &'static str {
        match self {
            DockerfileRule::UserRequired => "docker.user.required",
            DockerfileRule::NonRootUser => "docker.user.non_root",
            DockerfileRule::HealthcheckRequired => "docker.healthcheck.required",
        }
    }
}

/// A failed Dockerfile convention check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionViolation {
    pub rule: DockerfileRule,
    /// 1-based line of the offending instruction, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for ConventionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.rule.id(), line, self.message),
            None => write!(f, "[{}] {}", self.rule.id(), self.message),
        }
    }
}
