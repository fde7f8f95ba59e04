use serde::{Deserialize, Serialize};

use super::OctopusResource;

pub const RETENTION_UNIT_DAYS: &str = "Days";
pub const RETENTION_UNIT_ITEMS: &str = "Items";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lifecycle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_retention_policy: Option<RetentionPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tentacle_retention_policy: Option<RetentionPeriod>,
}

impl OctopusResource for Lifecycle {
    const COLLECTION: &'static str = "lifecycles";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Phase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub automatic_deployment_targets: Vec<String>,
    #[serde(default)]
    pub optional_deployment_targets: Vec<String>,
    #[serde(default)]
    pub minimum_environments_before_promotion: i64,
    #[serde(default)]
    pub is_optional_phase: bool,
    #[serde(default)]
    pub is_priority_phase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_retention_policy: Option<RetentionPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tentacle_retention_policy: Option<RetentionPeriod>,
}

/// How long releases or tentacle files are kept. A zero quantity keeps everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetentionPeriod {
    #[serde(default)]
    pub quantity_to_keep: i64,
    #[serde(default)]
    pub should_keep_forever: bool,
    #[serde(default)]
    pub unit: String,
}

impl Default for RetentionPeriod {
    /// What the server applies when a lifecycle names no policy.
    fn default() -> Self {
        Self {
            quantity_to_keep: 30,
            should_keep_forever: false,
            unit: RETENTION_UNIT_DAYS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn phases_decode_with_missing_policies() {
        let lifecycle: Lifecycle = serde_json::from_value(json!({
            "Id": "Lifecycles-1",
            "Name": "Default Lifecycle",
            "SpaceId": "Spaces-1",
            "Phases": [
                {
                    "Id": "phase-dev",
                    "Name": "Development",
                    "AutomaticDeploymentTargets": ["Environments-1"],
                    "MinimumEnvironmentsBeforePromotion": 0,
                    "ReleaseRetentionPolicy": null
                }
            ],
            "ReleaseRetentionPolicy": { "QuantityToKeep": 0, "ShouldKeepForever": true, "Unit": "Days" }
        }))
        .expect("decode");

        assert_eq!(lifecycle.phases[0].automatic_deployment_targets, ["Environments-1"]);
        assert!(lifecycle.phases[0].optional_deployment_targets.is_empty());
        assert!(lifecycle.phases[0].release_retention_policy.is_none());
        assert!(lifecycle.tentacle_retention_policy.is_none());
        assert!(lifecycle.release_retention_policy.as_ref().is_some_and(|p| p.should_keep_forever));
    }

    #[test]
    fn unset_policies_are_left_out_of_the_body() {
        let lifecycle = Lifecycle {
            name: "Hotfix".into(),
            tentacle_retention_policy: Some(RetentionPeriod::default()),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&lifecycle).expect("encode");
        assert!(encoded.get("ReleaseRetentionPolicy").is_none());
        assert_eq!(
            encoded["TentacleRetentionPolicy"],
            json!({ "QuantityToKeep": 30, "ShouldKeepForever": false, "Unit": "Days" })
        );
    }
}
