//! The fixed set of artifacts a scaffold run materializes.
//!
//! Content lives in askama templates under `templates/`; this module only maps
//! each artifact to its target path and its template.

use std::path::PathBuf;

use askama::Template;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{OpsError, OpsResult};

/// Every file the scaffold knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    TerraformVersions,
    TerraformProviders,
    TerraformVariables,
    TerraformRegistries,
    TerraformOutputs,
    ChartDefinition,
    ChartValues,
    ChartHelpers,
    ChartDeployment,
    ChartService,
    Dockerfile,
    DockerIgnore,
    ServiceStub,
    CiWorkflow,
}

impl Artifact {
    /// All artifacts, in the order they are written and reported.
    pub const ALL: [Artifact; 14] = [
        Artifact::TerraformVersions,
        Artifact::TerraformProviders,
        Artifact::TerraformVariables,
        Artifact::TerraformRegistries,
        Artifact::TerraformOutputs,
        Artifact::ChartDefinition,
        Artifact::ChartValues,
        Artifact::ChartHelpers,
        Artifact::ChartDeployment,
        Artifact::ChartService,
        Artifact::Dockerfile,
        Artifact::DockerIgnore,
        Artifact::ServiceStub,
        Artifact::CiWorkflow,
    ];

    /// Path of the artifact relative to the scaffold root.
    pub fn relative_path(&self, config: &Config) -> PathBuf {
        let chart = PathBuf::from("helm").join(&config.project_name);
        match self {
            Artifact::TerraformVersions => PathBuf::from("terraform/versions.tf"),
            Artifact::TerraformProviders => PathBuf::from("terraform/providers.tf"),
            Artifact::TerraformVariables => PathBuf::from("terraform/variables.tf"),
            Artifact::TerraformRegistries => PathBuf::from("terraform/ecr.tf"),
            Artifact::TerraformOutputs => PathBuf::from("terraform/outputs.tf"),
            Artifact::ChartDefinition => chart.join("Chart.yaml"),
            Artifact::ChartValues => chart.join("values.yaml"),
            Artifact::ChartHelpers => chart.join("templates/_helpers.tpl"),
            Artifact::ChartDeployment => chart.join("templates/deployment.yaml"),
            Artifact::ChartService => chart.join("templates/service.yaml"),
            Artifact::Dockerfile => PathBuf::from("Dockerfile"),
            Artifact::DockerIgnore => PathBuf::from(".dockerignore"),
            Artifact::ServiceStub => PathBuf::from("app/main.py"),
            Artifact::CiWorkflow => PathBuf::from(".github/workflows/ci.yml"),
        }
    }

    /// Render the artifact's content for the given configuration.
    pub fn render(&self, config: &Config) -> OpsResult<String> {
        let p = TemplateParams::from_config(config);
        let rendered = match self {
            Artifact::TerraformVersions => TerraformVersions { p: &p }.render(),
            Artifact::TerraformProviders => TerraformProviders { p: &p }.render(),
            Artifact::TerraformVariables => TerraformVariables { p: &p }.render(),
            Artifact::TerraformRegistries => TerraformRegistries { p: &p }.render(),
            Artifact::TerraformOutputs => TerraformOutputs { p: &p }.render(),
            Artifact::ChartDefinition => ChartDefinition { p: &p }.render(),
            Artifact::ChartValues => ChartValues { p: &p }.render(),
            Artifact::ChartHelpers => ChartHelpers { p: &p }.render(),
            Artifact::ChartDeployment => ChartDeployment { p: &p }.render(),
            Artifact::ChartService => ChartService { p: &p }.render(),
            Artifact::Dockerfile => DockerfileTemplate { p: &p }.render(),
            Artifact::DockerIgnore => DockerIgnore { p: &p }.render(),
            Artifact::ServiceStub => ServiceStub { p: &p }.render(),
            Artifact::CiWorkflow => CiWorkflow { p: &p }.render(),
        };
        rendered
            .map(ensure_trailing_newline)
            .map_err(|e| OpsError::Render {
                path: self.relative_path(config),
                message: e.to_string(),
            })
    }
}

fn ensure_trailing_newline(mut content: String) -> String {
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Values substituted into the templates.
#[derive(Debug, Clone)]
pub struct TemplateParams<'a> {
    pub project_name: &'a str,
    pub environment: &'a str,
    pub owner: &'a str,
    pub cost_center: &'a str,
    pub aws_region: &'a str,
    pub first_repository: &'a str,
    /// Repository list as an HCL list literal.
    pub repositories_hcl: String,
    pub image_retention_count: u32,
}

impl<'a> TemplateParams<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        let quoted: Vec<String> = config
            .repositories
            .iter()
            .map(|r| format!("\"{}\"", r))
            .collect();
        Self {
            project_name: &config.project_name,
            environment: &config.environment,
            owner: &config.owner,
            cost_center: &config.cost_center,
            aws_region: &config.aws_region,
            first_repository: config
                .repositories
                .first()
                .map(String::as_str)
                .unwrap_or(config.project_name.as_str()),
            repositories_hcl: format!("[{}]", quoted.join(", ")),
            image_retention_count: config.image_retention_count,
        }
    }
}

#[derive(Template)]
#[template(path = "terraform/versions.tf", escape = "none")]
struct TerraformVersions<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "terraform/providers.tf", escape = "none")]
struct TerraformProviders<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "terraform/variables.tf", escape = "none")]
struct TerraformVariables<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "terraform/ecr.tf", escape = "none")]
struct TerraformRegistries<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "terraform/outputs.tf", escape = "none")]
struct TerraformOutputs<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "helm/Chart.yaml", escape = "none")]
struct ChartDefinition<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "helm/values.yaml", escape = "none")]
struct ChartValues<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "helm/templates/_helpers.tpl", escape = "none")]
struct ChartHelpers<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "helm/templates/deployment.yaml", escape = "none")]
struct ChartDeployment<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "helm/templates/service.yaml", escape = "none")]
struct ChartService<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "docker/Dockerfile", escape = "none")]
struct DockerfileTemplate<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "docker/dockerignore", escape = "none")]
struct DockerIgnore<'a> {
    #[allow(dead_code)]
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "app/main.py", escape = "none")]
struct ServiceStub<'a> {
    p: &'a TemplateParams<'a>,
}

#[derive(Template)]
#[template(path = "ci/ci.yml", escape = "none")]
struct CiWorkflow<'a> {
    p: &'a TemplateParams<'a>,
}
