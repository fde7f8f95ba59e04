use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use super::OctopusResource;

pub const JIRA_EXTENSION_ID: &str = "jira-integration";
pub const JIRA_SERVICE_MANAGEMENT_EXTENSION_ID: &str = "jiraservicemanagement-integration";
pub const SERVICENOW_EXTENSION_ID: &str = "servicenow-integration";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub allow_dynamic_infrastructure: bool,
    #[serde(default)]
    pub use_guided_failure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub extension_settings: Vec<ExtensionSettingsValues>,
}

impl OctopusResource for Environment {
    const COLLECTION: &'static str = "environments";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionSettingsValues {
    pub extension_id: String,
    #[serde(default)]
    pub values: Json,
}

impl ExtensionSettingsValues {
    pub fn jira(environment_type: &str) -> Self {
        Self::with_value(JIRA_EXTENSION_ID, "JiraEnvironmentType", Json::from(environment_type))
    }

    pub fn jira_service_management(change_controlled: bool) -> Self {
        Self::with_value(
            JIRA_SERVICE_MANAGEMENT_EXTENSION_ID,
            "JsmChangeControlled",
            Json::from(change_controlled),
        )
    }

    pub fn service_now(change_controlled: bool) -> Self {
        Self::with_value(
            SERVICENOW_EXTENSION_ID,
            "ServiceNowChangeControlled",
            Json::from(change_controlled),
        )
    }

    fn with_value(extension_id: &str, key: &str, value: Json) -> Self {
        let mut values = Map::new();
        values.insert(key.to_string(), value);
        Self {
            extension_id: extension_id.to_string(),
            values: Json::Object(values),
        }
    }

    pub fn jira_environment_type(&self) -> Option<&str> {
        self.values.get("JiraEnvironmentType").and_then(Json::as_str)
    }

    pub fn is_change_controlled(&self) -> bool {
        ["JsmChangeControlled", "ServiceNowChangeControlled"]
            .iter()
            .filter_map(|key| self.values.get(*key))
            .any(|value| value.as_bool().unwrap_or(false))
    }
}

impl Environment {
    pub fn extension(&self, extension_id: &str) -> Option<&ExtensionSettingsValues> {
        self.extension_settings
            .iter()
            .find(|settings| settings.extension_id == extension_id)
    }
}
