//! Configuration for the operations layer.
//!
//! Holds the parameters substituted into the scaffold templates. Values come
//! from defaults, then the JSON config file, then environment variables.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};

/// Environment variable overriding the config file location.
pub const CONFIG_FILE_ENV: &str = "STACKSEED_CONFIG_FILE";

/// Configuration for stackseed operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Project name; used for the chart name and the `Project` tag.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Deployment environment written into the `Environment` tag.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Owning team written into the `Owner` tag.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Cost center written into the `CostCenter` tag.
    #[serde(default = "default_cost_center")]
    pub cost_center: String,

    /// AWS region for the provider block.
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Container registry repositories to create.
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// Number of images kept by the registry lifecycle policy.
    #[serde(default = "default_image_retention_count")]
    pub image_retention_count: u32,
}

fn default_project_name() -> String {
    "sample-service".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_owner() -> String {
    "platform-team".to_string()
}

fn default_cost_center() -> String {
    "CC-0000".to_string()
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_repositories() -> Vec<String> {
    vec!["sample-service".to_string()]
}

fn default_image_retention_count() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            environment: default_environment(),
            owner: default_owner(),
            cost_center: default_cost_center(),
            aws_region: default_aws_region(),
            repositories: default_repositories(),
            image_retention_count: default_image_retention_count(),
        }
    }
}

impl Config {
    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        let config = Self::load_file()?.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load only the stored config file, without validating it.
    ///
    /// Used by `config set` so a bad stored value can be repaired.
    pub fn load_file() -> OpsResult<Self> {
        match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply non-empty `STACKSEED_*` environment variables.
    pub fn with_env_overrides(self) -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            project_name: env("STACKSEED_PROJECT").unwrap_or(self.project_name),
            environment: env("STACKSEED_ENVIRONMENT").unwrap_or(self.environment),
            owner: env("STACKSEED_OWNER").unwrap_or(self.owner),
            cost_center: env("STACKSEED_COST_CENTER").unwrap_or(self.cost_center),
            aws_region: env("STACKSEED_AWS_REGION").unwrap_or(self.aws_region),
            ..self
        }
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_FILE_ENV).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("dev", "stackseed", "stackseed")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Reject values the emitted chart and registry cannot use.
    pub fn validate(&self) -> OpsResult<()> {
        validate_name("project_name", &self.project_name)?;
        if self.repositories.is_empty() {
            return Err(OpsError::Config(
                "repositories must name at least one registry repository".to_string(),
            ));
        }
        for repo in &self.repositories {
            validate_name("repositories", repo)?;
        }
        validate_name("aws_region", &self.aws_region)?;
        validate_label_value("environment", &self.environment)?;
        validate_label_value("owner", &self.owner)?;
        validate_label_value("cost_center", &self.cost_center)?;
        if self.image_retention_count == 0 {
            return Err(OpsError::Config(
                "image_retention_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "project_name" => Some(self.project_name.clone()),
            "environment" => Some(self.environment.clone()),
            "owner" => Some(self.owner.clone()),
            "cost_center" => Some(self.cost_center.clone()),
            "aws_region" => Some(self.aws_region.clone()),
            "repositories" => Some(self.repositories.join(",")),
            "image_retention_count" => Some(self.image_retention_count.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "project_name" => self.project_name = value.to_string(),
            "environment" => self.environment = value.to_string(),
            "owner" => self.owner = value.to_string(),
            "cost_center" => self.cost_center = value.to_string(),
            "aws_region" => self.aws_region = value.to_string(),
            "repositories" => {
                self.repositories = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "image_retention_count" => {
                self.image_retention_count = value
                    .parse()
                    .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))?;
            }
            _ => {
                return Err(OpsError::Config(format!("Unknown config key: {}", key)));
            }
        }
        self.validate()
    }

    /// All keys accepted by [`Config::get`] and [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &[
            "project_name",
            "environment",
            "owner",
            "cost_center",
            "aws_region",
            "repositories",
            "image_retention_count",
        ]
    }
}

/// Chart and registry names: lowercase alphanumerics and dashes, no edge dashes.
fn validate_name(key: &str, value: &str) -> OpsResult<()> {
    let valid = !value.is_empty()
        && value.len() <= 63
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if valid {
        Ok(())
    } else {
        Err(OpsError::Config(format!(
            "{} must be lowercase alphanumerics and dashes (max 63 chars): {:?}",
            key, value
        )))
    }
}

/// Tag values double as pod labels and HCL string defaults, so they follow
/// the Kubernetes label-value rules: `[A-Za-z0-9._-]`, alphanumeric at both
/// ends, max 63 chars.
fn validate_label_value(key: &str, value: &str) -> OpsResult<()> {
    let edge = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    let valid = value.len() <= 63
        && edge(value.chars().next())
        && edge(value.chars().last())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(OpsError::Config(format!(
            "{} must be a label value: letters, digits, '-', '_' or '.' (max 63 chars): {:?}",
            key, value
        )))
    }
}
