use serde::{Deserialize, Serialize};

use super::OctopusResource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

impl OctopusResource for ProjectGroup {
    const COLLECTION: &'static str = "projectgroups";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
