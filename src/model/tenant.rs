use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::OctopusResource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloned_from_tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    /// Project id to connected environment ids. Managed by project tenant resources, echoed back as-is.
    #[serde(default)]
    pub project_environments: BTreeMap<String, Vec<String>>,
}

impl OctopusResource for Tenant {
    const COLLECTION: &'static str = "tenants";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
