//! Integration tests for the stackseed CLI.
//!
//! Each test runs the real binary in a temporary directory with its own
//! config file, so nothing leaks from the developer's environment.
//!
//! Run with: `cargo test --package stackseed-cli --test cli_integration`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to run stackseed in a specific directory with an isolated config.
fn run_stackseed_in_dir(dir: &Path, args: &[&str]) -> Output {
    run_stackseed_with_env(dir, &[], args)
}

/// Like [`run_stackseed_in_dir`], with extra environment variables.
fn run_stackseed_with_env(dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stackseed"));
    command
        .current_dir(dir)
        .args(args)
        .env("STACKSEED_CONFIG_FILE", dir.join(".stackseed-test-config.json"))
        .env_remove("STACKSEED_PROJECT")
        .env_remove("STACKSEED_ENVIRONMENT")
        .env_remove("STACKSEED_OWNER")
        .env_remove("STACKSEED_COST_CENTER")
        .env_remove("STACKSEED_AWS_REGION");
    for (key, value) in vars {
        command.env(key, value);
    }
    command.output().expect("Failed to execute stackseed command")
}

const COMPLIANT_DOCKERFILE: &str =
    "FROM alpine\nUSER 10001\nHEALTHCHECK CMD wget -qO- http://localhost:8080/healthz\n";

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const TAGGED: &str = r#"{"Project": "sample-service", "Environment": "dev", "Owner": "platform-team", "CostCenter": "CC-0000"}"#;

fn write_plan(dir: &Path, changes: &[String]) -> std::path::PathBuf {
    let path = dir.join("plan.json");
    fs::write(
        &path,
        format!(
            r#"{{"format_version": "1.2", "resource_changes": [{}]}}"#,
            changes.join(",")
        ),
    )
    .unwrap();
    path
}

fn change(address: &str, actions: &str, after: &str) -> String {
    let resource_type = address.split('.').next().unwrap();
    format!(
        r#"{{"address": "{}", "type": "{}", "change": {{"actions": {}, "after": {}}}}}"#,
        address.replace('"', "\\\""),
        resource_type,
        actions,
        after
    )
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_writes_every_target() {
    let temp = TempDir::new().unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["init"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("WROTE terraform/ecr.tf"), "stdout: {}", out);
    assert!(out.contains("WROTE helm/sample-service/Chart.yaml"));
    assert!(out.contains("WROTE .github/workflows/ci.yml"));
    assert!(!out.contains("SKIP"));

    assert!(temp.path().join("terraform/providers.tf").is_file());
    assert!(temp.path().join("helm/sample-service/values.yaml").is_file());
    assert!(temp.path().join("Dockerfile").is_file());
    assert!(temp.path().join("app/main.py").is_file());
}

#[test]
fn test_default_command_is_init() {
    let temp = TempDir::new().unwrap();

    let output = run_stackseed_in_dir(temp.path(), &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("WROTE Dockerfile"));
    assert!(temp.path().join("terraform/versions.tf").is_file());
}

#[test]
fn test_second_run_skips_and_keeps_edits() {
    let temp = TempDir::new().unwrap();
    run_stackseed_in_dir(temp.path(), &["init"]);
    let values = temp.path().join("helm/sample-service/values.yaml");
    fs::write(&values, "replicaCount: 5\n").unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["init"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("SKIP helm/sample-service/values.yaml"));
    assert!(!out.contains("WROTE"));
    assert_eq!(fs::read_to_string(&values).unwrap(), "replicaCount: 5\n");
}

#[test]
fn test_force_rewrites_existing_files() {
    let temp = TempDir::new().unwrap();
    run_stackseed_in_dir(temp.path(), &["init"]);
    let dockerfile = temp.path().join("Dockerfile");
    let original = fs::read_to_string(&dockerfile).unwrap();
    fs::write(&dockerfile, "FROM scratch\n").unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["--force"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("WROTE Dockerfile"));
    assert_eq!(fs::read_to_string(&dockerfile).unwrap(), original);
}

#[test]
fn test_failed_target_reports_and_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("helm"), "not a directory").unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["init"]);

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("FAIL helm/sample-service/Chart.yaml:"), "stdout: {}", out);
    // Independent targets are still written.
    assert!(out.contains("WROTE terraform/ecr.tf"));
    assert!(temp.path().join("terraform/ecr.tf").is_file());
}

#[test]
fn test_init_uses_configured_project_name() {
    let temp = TempDir::new().unwrap();
    let set = run_stackseed_in_dir(temp.path(), &["config", "set", "project_name", "billing-api"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let output = run_stackseed_in_dir(temp.path(), &["init"]);

    assert!(output.status.success());
    assert!(temp.path().join("helm/billing-api/Chart.yaml").is_file());
    let chart = fs::read_to_string(temp.path().join("helm/billing-api/Chart.yaml")).unwrap();
    assert!(chart.contains("name: billing-api"));
}

// =============================================================================
// Status Command Tests
// =============================================================================

#[test]
fn test_status_counts_present_targets() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Dockerfile"), "FROM scratch\n").unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["status"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("📊 Stackseed Status"));
    assert!(out.contains("1 present, 13 missing"), "stdout: {}", out);
    assert!(out.contains("13 B"));
}

// =============================================================================
// Audit Plan Tests
// =============================================================================

#[test]
fn test_audit_compliant_plan_passes() {
    let temp = TempDir::new().unwrap();
    let plan = write_plan(
        temp.path(),
        &[change(
            "aws_ecr_repository.this[\"sample-service\"]",
            r#"["create"]"#,
            &format!(r#"{{"tags_all": {}}}"#, TAGGED),
        )],
    );

    let output = run_stackseed_in_dir(temp.path(), &["audit-plan", plan.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("✅"));
}

#[test]
fn test_audit_missing_cost_center_fails() {
    let temp = TempDir::new().unwrap();
    write_plan(
        temp.path(),
        &[change(
            "aws_s3_bucket.logs",
            r#"["create"]"#,
            r#"{"tags_all": {"Project": "p", "Environment": "dev", "Owner": "o"}}"#,
        )],
    );

    let output = run_stackseed_in_dir(temp.path(), &["audit-plan", "plan.json"]);

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("aws_s3_bucket.logs"), "stdout: {}", out);
    assert!(out.contains("missing tags: CostCenter"));
}

#[test]
fn test_audit_ignores_update_and_delete() {
    let temp = TempDir::new().unwrap();
    write_plan(
        temp.path(),
        &[
            change("aws_s3_bucket.kept", r#"["update"]"#, r#"{"tags_all": {}}"#),
            change("aws_s3_bucket.gone", r#"["delete"]"#, "null"),
        ],
    );

    let output = run_stackseed_in_dir(temp.path(), &["audit-plan", "plan.json"]);

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

#[test]
fn test_audit_skip_untaggable() {
    let temp = TempDir::new().unwrap();
    write_plan(
        temp.path(),
        &[change(
            "aws_ecr_lifecycle_policy.this",
            r#"["create"]"#,
            r#"{"repository": "sample-service", "policy": "{}"}"#,
        )],
    );

    let strict = run_stackseed_in_dir(temp.path(), &["audit-plan", "plan.json"]);
    assert!(!strict.status.success());

    let relaxed = run_stackseed_in_dir(
        temp.path(),
        &["audit-plan", "plan.json", "--skip-untaggable"],
    );
    assert!(relaxed.status.success(), "stdout: {}", stdout(&relaxed));
}

#[test]
fn test_audit_json_report() {
    let temp = TempDir::new().unwrap();
    write_plan(
        temp.path(),
        &[
            change("aws_sqs_queue.a", r#"["create"]"#, r#"{"tags": {"Owner": "o"}}"#),
            change("aws_sqs_queue.b", r#"["create"]"#, r#"{"tags": {}}"#),
        ],
    );

    let output = run_stackseed_in_dir(temp.path(), &["audit-plan", "plan.json", "--format", "json"]);

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let violations = report["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["address"], "aws_sqs_queue.a");
    assert_eq!(
        violations[0]["missing_keys"],
        serde_json::json!(["Project", "Environment", "CostCenter"])
    );
}

#[test]
fn test_audit_missing_plan_file_fails() {
    let temp = TempDir::new().unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["audit-plan", "nope.json"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read plan"));
}

// =============================================================================
// Dockerfile Check Tests
// =============================================================================

#[test]
fn test_check_dockerfile_reports_all_violations() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Dockerfile"),
        "FROM python:3.12-slim\nCOPY . /app\nCMD [\"python\", \"/app/main.py\"]\n",
    )
    .unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["check-dockerfile", "Dockerfile"]);

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("docker.user.required"), "stdout: {}", out);
    assert!(out.contains("docker.healthcheck.required"));
    assert!(stderr(&output).contains("2 violation(s)"));
}

#[test]
fn test_check_dockerfile_json_root_user() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("Dockerfile"),
        "FROM alpine\nUSER root\nHEALTHCHECK CMD true\n",
    )
    .unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["check-dockerfile", "--format", "json"]);

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let violations = report["reports"][0]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["rule"], "non_root_user");
    assert_eq!(violations[0]["line"], 2);
}

#[test]
fn test_scaffolded_dockerfile_passes_check() {
    let temp = TempDir::new().unwrap();
    run_stackseed_in_dir(temp.path(), &["init"]);

    let output = run_stackseed_in_dir(temp.path(), &["check-dockerfile", "."]);

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_set_and_get() {
    let temp = TempDir::new().unwrap();

    let set = run_stackseed_in_dir(temp.path(), &["config", "set", "cost_center", "CC-4242"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let get = run_stackseed_in_dir(temp.path(), &["config", "get", "cost_center"]);
    assert!(get.status.success());
    assert_eq!(stdout(&get).trim(), "CC-4242");
}

#[test]
fn test_config_rejects_invalid_project_name() {
    let temp = TempDir::new().unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["config", "set", "project_name", "Bad_Name"]);

    assert!(!output.status.success());
    assert!(!temp.path().join(".stackseed-test-config.json").exists());
}

#[test]
fn test_config_path_uses_override() {
    let temp = TempDir::new().unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["config", "path"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(".stackseed-test-config.json"));
}

#[test]
fn test_config_set_repairs_invalid_stored_config() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join(".stackseed-test-config.json");
    fs::write(&config_file, r#"{"project_name": "Bad_Name"}"#).unwrap();

    let init = run_stackseed_in_dir(temp.path(), &["init"]);
    assert!(!init.status.success());
    assert!(stderr(&init).contains("project_name"));

    let set = run_stackseed_in_dir(temp.path(), &["config", "set", "project_name", "good-name"]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let get = run_stackseed_in_dir(temp.path(), &["config", "get", "project_name"]);
    assert_eq!(stdout(&get).trim(), "good-name");
}

#[test]
fn test_config_rejects_tag_values_that_break_templates() {
    let temp = TempDir::new().unwrap();

    for (key, value) in [
        ("owner", "core: platform"),
        ("cost_center", "CC\\"),
        ("environment", "${path.module}"),
    ] {
        let output = run_stackseed_in_dir(temp.path(), &["config", "set", key, value]);
        assert!(!output.status.success(), "{} = {:?} accepted", key, value);
    }
    assert!(!temp.path().join(".stackseed-test-config.json").exists());
}

// =============================================================================
// Gate Isolation Tests
// =============================================================================

#[test]
fn test_gates_ignore_invalid_scaffold_config() {
    let temp = TempDir::new().unwrap();
    write_plan(temp.path(), &[]);
    fs::write(temp.path().join("Dockerfile"), COMPLIANT_DOCKERFILE).unwrap();
    let bad_env = [("STACKSEED_PROJECT", "MyApp")];

    let audit = run_stackseed_with_env(temp.path(), &bad_env, &["audit-plan", "plan.json"]);
    assert!(audit.status.success(), "stderr: {}", stderr(&audit));

    let docker = run_stackseed_with_env(temp.path(), &bad_env, &["check-dockerfile", "Dockerfile"]);
    assert!(docker.status.success(), "stderr: {}", stderr(&docker));

    // Scaffolding still refuses the bad project name.
    let init = run_stackseed_with_env(temp.path(), &bad_env, &["init"]);
    assert!(!init.status.success());
}

#[test]
fn test_gates_ignore_invalid_stored_config() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".stackseed-test-config.json"),
        r#"{"owner": "core: platform"}"#,
    )
    .unwrap();
    fs::write(temp.path().join("Dockerfile"), COMPLIANT_DOCKERFILE).unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["check-dockerfile"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_force_is_rejected_outside_init() {
    let temp = TempDir::new().unwrap();
    write_plan(temp.path(), &[]);

    let after = run_stackseed_in_dir(temp.path(), &["audit-plan", "plan.json", "--force"]);
    assert!(!after.status.success());

    let before = run_stackseed_in_dir(temp.path(), &["--force", "audit-plan", "plan.json"]);
    assert!(!before.status.success());
    assert!(stderr(&before).contains("--force only applies to init"));
}

#[test]
fn test_init_accepts_force_flag() {
    let temp = TempDir::new().unwrap();
    run_stackseed_in_dir(temp.path(), &["init"]);
    fs::write(temp.path().join("Dockerfile"), "FROM scratch\n").unwrap();

    let output = run_stackseed_in_dir(temp.path(), &["init", "--force"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("WROTE Dockerfile"));
}
