use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

mod deployment_process;
mod environment;
mod feed;
mod lifecycle;
mod project;
mod project_group;
mod tenant;

pub use deployment_process::{
    DeploymentAction, DeploymentActionContainer, DeploymentProcess, DeploymentStep, GitDependency,
    PackageReference, Properties,
};
pub use environment::{
    Environment, ExtensionSettingsValues, JIRA_EXTENSION_ID, JIRA_SERVICE_MANAGEMENT_EXTENSION_ID,
    SERVICENOW_EXTENSION_ID,
};
pub use feed::{Feed, FeedType};
pub use lifecycle::{Lifecycle, Phase, RETENTION_UNIT_DAYS, RETENTION_UNIT_ITEMS, RetentionPeriod};
pub use project::Project;
pub use project_group::ProjectGroup;
pub use tenant::Tenant;

/// A space-scoped resource with its own REST collection.
pub trait OctopusResource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection segment under `/api/{spaceId}/`.
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&str>;
}

/// Paged collection envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resources<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_results: i64,
    #[serde(default)]
    pub items_per_page: i64,
    #[serde(default)]
    pub number_of_pages: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Space {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Write-only secret. The server only ever reports whether it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SensitiveValue {
    #[serde(default)]
    pub has_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl SensitiveValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            has_value: true,
            new_value: Some(value.into()),
        }
    }
}

/// Entry of a step or action property bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Plain(String),
    Sensitive(SensitiveValue),
}

impl PropertyValue {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            PropertyValue::Plain(value) => Some(value),
            PropertyValue::Sensitive(_) => None,
        }
    }

    pub fn is_sensitive(&self) -> bool {
        matches!(self, PropertyValue::Sensitive(_))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Plain(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Plain(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn property_bag_mixes_plain_and_sensitive() {
        let bag: BTreeMap<String, PropertyValue> = serde_json::from_value(json!({
            "Octopus.Action.Script.ScriptBody": "echo hi",
            "Octopus.Action.Secret": { "HasValue": true },
        }))
        .expect("decode");

        assert_eq!(
            bag["Octopus.Action.Script.ScriptBody"].as_plain(),
            Some("echo hi")
        );
        assert!(bag["Octopus.Action.Secret"].is_sensitive());

        let encoded = serde_json::to_value(&bag).expect("encode");
        assert_eq!(encoded["Octopus.Action.Script.ScriptBody"], json!("echo hi"));
    }

    #[test]
    fn collection_envelope_tolerates_missing_counters() {
        let page: Resources<Space> = serde_json::from_value(json!({
            "Items": [{ "Id": "Spaces-1", "Name": "Default", "IsDefault": true }]
        }))
        .expect("decode");
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].is_default);
        assert_eq!(page.total_results, 0);
    }
}
