use tf_provider::value::Value;

use super::keep_optional_block;
use crate::model::{
    Environment, ExtensionSettingsValues, JIRA_EXTENSION_ID, JIRA_SERVICE_MANAGEMENT_EXTENSION_ID,
    SERVICENOW_EXTENSION_ID,
};
use crate::data_sources::environments::EnvironmentItem;
use crate::resources::environment::{ChangeControlState, EnvironmentState, JiraExtensionSettingsState};
use crate::value::{bool_or, known, non_empty, string, string_or_empty};

pub fn to_environment(state: &EnvironmentState) -> Environment {
    let mut extension_settings = Vec::new();
    if let Some(jira) = known(&state.jira_extension_settings) {
        extension_settings.push(ExtensionSettingsValues::jira(&string_or_empty(&jira.environment_type)));
    }
    if let Some(jsm) = known(&state.jira_service_management_extension_settings) {
        extension_settings.push(ExtensionSettingsValues::jira_service_management(bool_or(
            &jsm.is_enabled,
            false,
        )));
    }
    if let Some(service_now) = known(&state.servicenow_extension_settings) {
        extension_settings.push(ExtensionSettingsValues::service_now(bool_or(
            &service_now.is_enabled,
            false,
        )));
    }

    Environment {
        id: non_empty(&state.id).map(str::to_string),
        name: string_or_empty(&state.name),
        slug: non_empty(&state.slug).map(str::to_string),
        description: string_or_empty(&state.description),
        sort_order: known(&state.sort_order).copied().unwrap_or_default(),
        allow_dynamic_infrastructure: bool_or(&state.allow_dynamic_infrastructure, false),
        use_guided_failure: bool_or(&state.use_guided_failure, false),
        space_id: non_empty(&state.space_id).map(str::to_string),
        extension_settings,
    }
}

fn change_control(
    environment: &Environment,
    extension_id: &str,
    prior: Option<&Value<ChangeControlState>>,
) -> Value<ChangeControlState> {
    match environment.extension(extension_id) {
        Some(settings) if keep_optional_block(true, prior) => Value::Value(ChangeControlState {
            is_enabled: Value::Value(settings.is_change_controlled()),
        }),
        _ => Value::Null,
    }
}

pub fn environment_state(environment: &Environment, prior: Option<&EnvironmentState>) -> EnvironmentState {
    let jira_extension_settings = match environment
        .extension(JIRA_EXTENSION_ID)
        .and_then(ExtensionSettingsValues::jira_environment_type)
    {
        Some(environment_type) if keep_optional_block(true, prior.map(|p| &p.jira_extension_settings)) => {
            Value::Value(JiraExtensionSettingsState {
                environment_type: string(environment_type),
            })
        }
        _ => Value::Null,
    };

    EnvironmentState {
        id: string(environment.id.clone().unwrap_or_default()),
        space_id: string(environment.space_id.clone().unwrap_or_default()),
        name: string(environment.name.as_str()),
        slug: string(environment.slug.clone().unwrap_or_default()),
        description: string(environment.description.as_str()),
        sort_order: Value::Value(environment.sort_order),
        allow_dynamic_infrastructure: Value::Value(environment.allow_dynamic_infrastructure),
        use_guided_failure: Value::Value(environment.use_guided_failure),
        jira_extension_settings,
        jira_service_management_extension_settings: change_control(
            environment,
            JIRA_SERVICE_MANAGEMENT_EXTENSION_ID,
            prior.map(|p| &p.jira_service_management_extension_settings),
        ),
        servicenow_extension_settings: change_control(
            environment,
            SERVICENOW_EXTENSION_ID,
            prior.map(|p| &p.servicenow_extension_settings),
        ),
    }
}

pub fn environment_item(environment: &Environment) -> EnvironmentItem {
    let state = environment_state(environment, None);
    EnvironmentItem {
        id: state.id,
        space_id: state.space_id,
        name: state.name,
        slug: state.slug,
        description: state.description,
        sort_order: state.sort_order,
        allow_dynamic_infrastructure: state.allow_dynamic_infrastructure,
        use_guided_failure: state.use_guided_failure,
    }
}
