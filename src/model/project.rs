use serde::{Deserialize, Serialize};

use super::OctopusResource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub lifecycle_id: String,
    pub project_group_id: String,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub auto_create_release: bool,
    #[serde(default)]
    pub default_guided_failure_mode: String,
    #[serde(default)]
    pub default_to_skip_if_already_installed: bool,
    #[serde(default)]
    pub discrete_channel_release: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenanted_deployment_mode: Option<String>,
    #[serde(default)]
    pub included_library_variable_set_ids: Vec<String>,
    #[serde(default)]
    pub release_notes_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_process_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_set_id: Option<String>,
}

impl OctopusResource for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
