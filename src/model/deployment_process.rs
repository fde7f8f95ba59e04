use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{OctopusResource, PropertyValue};

pub type Properties = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentProcess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_snapshot_id: Option<String>,
    /// Git branch of a version-controlled project. Travels in the URL, never in the body.
    #[serde(skip)]
    pub branch: Option<String>,
    #[serde(default)]
    pub steps: Vec<DeploymentStep>,
}

impl OctopusResource for DeploymentProcess {
    const COLLECTION: &'static str = "deploymentprocesses";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub package_requirement: String,
    #[serde(default)]
    pub start_trigger: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub actions: Vec<DeploymentAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub action_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub can_be_used_for_project_versioning: bool,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub excluded_environments: Vec<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default)]
    pub worker_pool_id: String,
    #[serde(default)]
    pub worker_pool_variable: String,
    #[serde(default)]
    pub container: DeploymentActionContainer,
    #[serde(default)]
    pub packages: Vec<PackageReference>,
    #[serde(default)]
    pub git_dependencies: Vec<GitDependency>,
    #[serde(default)]
    pub properties: Properties,
}

impl DeploymentAction {
    pub fn new(name: impl Into<String>, action_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_plain)
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<String>) {
        self.properties
            .insert(key.to_string(), PropertyValue::Plain(value.into()));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentActionContainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DeploymentActionContainer {
    pub fn is_empty(&self) -> bool {
        self.feed_id.as_deref().unwrap_or_default().is_empty()
            && self.image.as_deref().unwrap_or_default().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub package_id: String,
    #[serde(default)]
    pub feed_id: String,
    #[serde(default)]
    pub acquisition_location: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitDependency {
    #[serde(default)]
    pub name: String,
    pub repository_uri: String,
    pub default_branch: String,
    pub git_credential_type: String,
    #[serde(default)]
    pub file_path_filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_credential_id: Option<String>,
}
