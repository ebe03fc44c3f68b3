//! Mandatory-tag gate over a parsed plan.

use serde::{Deserialize, Serialize};
use stackseed_core::{PlanAction, PlanResource, TagViolation};
use tracing::debug;

/// Knobs for the tag audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Exempt resources whose planned state has no tag attribute at all.
    #[serde(default)]
    pub skip_untaggable: bool,
}

/// Report every `create` resource that lacks one of `mandatory_tags`.
///
/// Violations follow plan order and list missing keys in `mandatory_tags`
/// order. Other actions are never flagged.
pub fn audit(plan: &[PlanResource], mandatory_tags: &[&str]) -> Vec<TagViolation> {
    audit_with_options(plan, mandatory_tags, AuditOptions::default())
}

/// [`audit`] with explicit options.
pub fn audit_with_options(
    plan: &[PlanResource],
    mandatory_tags: &[&str],
    options: AuditOptions,
) -> Vec<TagViolation> {
    plan.iter()
        .filter(|resource| resource.action == PlanAction::Create)
        .filter(|resource| resource.taggable || !options.skip_untaggable)
        .filter_map(|resource| {
            let missing_keys: Vec<String> = mandatory_tags
                .iter()
                .filter(|key| !resource.has_tag(key))
                .map(|key| key.to_string())
                .collect();
            if missing_keys.is_empty() {
                return None;
            }
            debug!(
                address = %resource.address,
                missing = missing_keys.len(),
                "Resource missing mandatory tags"
            );
            Some(TagViolation {
                address: resource.address.clone(),
                resource_type: resource.resource_type.clone(),
                missing_keys,
            })
        })
        .collect()
}
