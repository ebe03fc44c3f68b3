//! Parsing of the provisioning engine's JSON plan document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use stackseed_core::{PlanAction, PlanResource};
use tracing::debug;

use crate::error::{OpsError, OpsResult};

/// Subset of the plan document the gate reads.
#[derive(Debug, Deserialize)]
struct PlanDocument {
    #[serde(default)]
    resource_changes: Option<Vec<ResourceChange>>,
}

#[derive(Debug, Deserialize)]
struct ResourceChange {
    address: String,
    #[serde(rename = "type")]
    resource_type: String,
    change: Change,
}

#[derive(Debug, Deserialize)]
struct Change {
    actions: Vec<String>,
    #[serde(default)]
    after: Option<Value>,
}

/// Parse a plan document into resources, keeping document order.
///
/// A plan without `resource_changes` (nothing to change) yields no resources.
pub fn parse_plan(json: &str, source: &Path) -> OpsResult<Vec<PlanResource>> {
    let document: PlanDocument =
        serde_json::from_str(json).map_err(|e| OpsError::PlanParse {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

    let resources: Vec<PlanResource> = document
        .resource_changes
        .unwrap_or_default()
        .into_iter()
        .map(into_resource)
        .collect();

    debug!(path = %source.display(), resources = resources.len(), "Parsed plan");
    Ok(resources)
}

/// Read and parse a plan document from disk.
pub fn load_plan(path: &Path) -> OpsResult<Vec<PlanResource>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        OpsError::with_context(format!("Failed to read plan {}", path.display()), e.to_string())
    })?;
    parse_plan(&json, path)
}

fn into_resource(rc: ResourceChange) -> PlanResource {
    let after = rc.change.after.as_ref().and_then(Value::as_object);
    let tag_map = after.and_then(effective_tag_map);
    let taggable = after
        .map(|a| a.contains_key("tags_all") || a.contains_key("tags"))
        .unwrap_or(false);

    PlanResource {
        address: rc.address,
        resource_type: rc.resource_type,
        action: PlanAction::from_actions(&rc.change.actions),
        tags: tag_map.map(stringify_tags).unwrap_or_default(),
        taggable,
    }
}

/// `tags_all` is the engine's merged view including provider default tags;
/// `tags` is only consulted when `tags_all` is absent or not an object.
fn effective_tag_map(after: &Map<String, Value>) -> Option<&Map<String, Value>> {
    after
        .get("tags_all")
        .and_then(Value::as_object)
        .or_else(|| after.get("tags").and_then(Value::as_object))
}

fn stringify_tags(tags: &Map<String, Value>) -> BTreeMap<String, String> {
    tags.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}
