use tf_provider::value::Value;

use crate::model::Project;
use crate::resources::project::ProjectState;
use crate::value::{expand_list, flatten_list, known, non_empty, string, string_or_empty};

const DEFAULT_GUIDED_FAILURE_MODE: &str = "EnvironmentDefault";

fn server_id(value: Option<&String>) -> Value<String> {
    string(value.cloned().unwrap_or_default())
}

/// Values left for the server to decide come from `current` on update.
pub fn to_project(state: &ProjectState, current: Option<&Project>) -> Project {
    let keep_or = |value: &Value<bool>, current: Option<bool>| match known(value) {
        Some(value) => *value,
        None => current.unwrap_or(false),
    };
    Project {
        id: non_empty(&state.id).map(str::to_string),
        name: string_or_empty(&state.name),
        description: string_or_empty(&state.description),
        slug: non_empty(&state.slug).map(str::to_string),
        space_id: non_empty(&state.space_id).map(str::to_string),
        lifecycle_id: string_or_empty(&state.lifecycle_id),
        project_group_id: string_or_empty(&state.project_group_id),
        is_disabled: keep_or(&state.is_disabled, current.map(|p| p.is_disabled)),
        auto_create_release: keep_or(&state.auto_create_release, current.map(|p| p.auto_create_release)),
        default_guided_failure_mode: non_empty(&state.default_guided_failure_mode)
            .map(str::to_string)
            .or_else(|| current.map(|p| p.default_guided_failure_mode.clone()))
            .filter(|mode| !mode.is_empty())
            .unwrap_or_else(|| DEFAULT_GUIDED_FAILURE_MODE.to_string()),
        default_to_skip_if_already_installed: keep_or(
            &state.default_to_skip_if_already_installed,
            current.map(|p| p.default_to_skip_if_already_installed),
        ),
        discrete_channel_release: keep_or(
            &state.discrete_channel_release,
            current.map(|p| p.discrete_channel_release),
        ),
        tenanted_deployment_mode: non_empty(&state.tenanted_deployment_participation)
            .map(str::to_string)
            .or_else(|| current.and_then(|p| p.tenanted_deployment_mode.clone())),
        included_library_variable_set_ids: expand_list(&state.included_library_variable_sets),
        release_notes_template: known(&state.release_notes_template)
            .cloned()
            .or_else(|| current.map(|p| p.release_notes_template.clone()))
            .unwrap_or_default(),
        deployment_process_id: current.and_then(|p| p.deployment_process_id.clone()),
        variable_set_id: current.and_then(|p| p.variable_set_id.clone()),
    }
}

pub fn project_state(project: &Project) -> ProjectState {
    ProjectState {
        id: server_id(project.id.as_ref()),
        space_id: server_id(project.space_id.as_ref()),
        name: string(project.name.as_str()),
        description: string(project.description.as_str()),
        slug: server_id(project.slug.as_ref()),
        lifecycle_id: string(project.lifecycle_id.as_str()),
        project_group_id: string(project.project_group_id.as_str()),
        auto_create_release: Value::Value(project.auto_create_release),
        default_guided_failure_mode: string(project.default_guided_failure_mode.as_str()),
        default_to_skip_if_already_installed: Value::Value(project.default_to_skip_if_already_installed),
        discrete_channel_release: Value::Value(project.discrete_channel_release),
        is_disabled: Value::Value(project.is_disabled),
        tenanted_deployment_participation: server_id(project.tenanted_deployment_mode.as_ref()),
        included_library_variable_sets: flatten_list(project.included_library_variable_set_ids.iter().cloned()),
        release_notes_template: string(project.release_notes_template.as_str()),
        deployment_process_id: server_id(project.deployment_process_id.as_ref()),
        variable_set_id: server_id(project.variable_set_id.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn configured() -> ProjectState {
        ProjectState {
            name: string("Web"),
            lifecycle_id: string("Lifecycles-1"),
            project_group_id: string("ProjectGroups-1"),
            auto_create_release: Value::Unknown,
            tenanted_deployment_participation: Value::Unknown,
            ..Default::default()
        }
    }

    #[test]
    fn create_fills_server_defaults() {
        let project = to_project(&configured(), None);
        assert_eq!(project.default_guided_failure_mode, "EnvironmentDefault");
        assert!(!project.auto_create_release);
        let body = serde_json::to_value(&project).expect("encode");
        assert!(body.get("TenantedDeploymentMode").is_none());
        assert!(body.get("Id").is_none());
    }

    #[test]
    fn update_keeps_server_values_for_unset_fields() {
        let current: Project = serde_json::from_value(json!({
            "Id": "Projects-1",
            "Name": "Web",
            "LifecycleId": "Lifecycles-1",
            "ProjectGroupId": "ProjectGroups-1",
            "AutoCreateRelease": true,
            "DefaultGuidedFailureMode": "On",
            "TenantedDeploymentMode": "Tenanted",
            "DeploymentProcessId": "deploymentprocess-Projects-1",
            "VariableSetId": "variableset-Projects-1"
        }))
        .expect("decode");
        let mut state = configured();
        state.id = string("Projects-1");
        let project = to_project(&state, Some(&current));
        assert!(project.auto_create_release);
        assert_eq!(project.default_guided_failure_mode, "On");
        assert_eq!(project.tenanted_deployment_mode.as_deref(), Some("Tenanted"));
        assert_eq!(project.deployment_process_id.as_deref(), Some("deploymentprocess-Projects-1"));

        let read = project_state(&current);
        assert_eq!(read.variable_set_id, string("variableset-Projects-1"));
        assert_eq!(read.tenanted_deployment_participation, string("Tenanted"));
    }
}
