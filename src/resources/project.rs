use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics};
use tf_provider::schema::{AttributeConstraint, Block};

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::project::{project_state, to_project};
use crate::model::Project;
use crate::plan::{carry, default_to};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{BoolValue, StringList, StringValue};

pub const GUIDED_FAILURE_MODES: [&str; 3] = ["EnvironmentDefault", "Off", "On"];
pub const TENANTED_DEPLOYMENT_MODES: [&str; 3] = ["Untenanted", "TenantedOrUntenanted", "Tenanted"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub description: StringValue,
    pub slug: StringValue,
    pub lifecycle_id: StringValue,
    pub project_group_id: StringValue,
    pub auto_create_release: BoolValue,
    pub default_guided_failure_mode: StringValue,
    pub default_to_skip_if_already_installed: BoolValue,
    pub discrete_channel_release: BoolValue,
    pub is_disabled: BoolValue,
    pub tenanted_deployment_participation: StringValue,
    pub included_library_variable_sets: StringList,
    pub release_notes_template: StringValue,
    pub deployment_process_id: StringValue,
    pub variable_set_id: StringValue,
}

pub fn attributes() -> Attributes {
    use AttributeConstraint::{Computed, OptionalComputed, Required};

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("project"));
    attributes.insert("name".into(), schema::name("project"));
    attributes.insert("description".into(), schema::description("project"));
    attributes.insert("slug".into(), schema::slug("project"));
    attributes.insert(
        "lifecycle_id".into(),
        schema::string(Required, "The lifecycle ID associated with this project."),
    );
    attributes.insert(
        "project_group_id".into(),
        schema::string(Required, "The project group ID associated with this project."),
    );
    attributes.insert(
        "auto_create_release".into(),
        schema::boolean(OptionalComputed, "Whether a release is created automatically when a package is pushed."),
    );
    attributes.insert(
        "default_guided_failure_mode".into(),
        schema::string(
            OptionalComputed,
            "The default guided failure mode. Valid values are `EnvironmentDefault`, `Off` and `On`.",
        ),
    );
    attributes.insert(
        "default_to_skip_if_already_installed".into(),
        schema::boolean(OptionalComputed, "Whether deployments skip packages that are already installed."),
    );
    attributes.insert(
        "discrete_channel_release".into(),
        schema::boolean(
            OptionalComputed,
            "Treats releases of different channels to the same environment as a separate deployment dimension.",
        ),
    );
    attributes.insert(
        "is_disabled".into(),
        schema::boolean(OptionalComputed, "Whether the project is disabled."),
    );
    attributes.insert(
        "tenanted_deployment_participation".into(),
        schema::string(
            OptionalComputed,
            "The tenanted deployment mode. Valid values are `Untenanted`, `TenantedOrUntenanted` and `Tenanted`.",
        ),
    );
    attributes.insert(
        "included_library_variable_sets".into(),
        schema::string_list(OptionalComputed, "The library variable set IDs included in this project."),
    );
    attributes.insert(
        "release_notes_template".into(),
        schema::string(OptionalComputed, "The template used for release notes."),
    );
    attributes.insert(
        "deployment_process_id".into(),
        schema::string(Computed, "The ID of the deployment process owned by this project."),
    );
    attributes.insert(
        "variable_set_id".into(),
        schema::string(Computed, "The ID of the variable set owned by this project."),
    );
    attributes
}

pub struct ProjectKind;

impl ApiResourceKind for ProjectKind {
    type Model = Project;
    type State = ProjectState;

    const TYPE_NAME: &'static str = "octopusdeploy_project";
    const DISPLAY_NAME: &'static str = "project";

    fn schema() -> Block {
        schema::block(
            "This resource manages projects in Octopus Deploy.",
            attributes(),
            Default::default(),
        )
    }

    fn id(state: &ProjectState) -> &StringValue {
        &state.id
    }

    fn space_id(state: &ProjectState) -> &StringValue {
        &state.space_id
    }

    fn space_id_mut(state: &mut ProjectState) -> &mut StringValue {
        &mut state.space_id
    }

    fn to_model(state: &ProjectState, current: Option<&Project>) -> Result<Project> {
        Ok(to_project(state, current))
    }

    fn to_state(model: &Project, _prior: Option<&ProjectState>) -> Result<ProjectState> {
        Ok(project_state(model))
    }

    fn plan(planned: &mut ProjectState, config: &ProjectState, prior: Option<&ProjectState>) {
        macro_rules! carry_all {
            ($($field:ident),* $(,)?) => {
                $(carry(&mut planned.$field, &config.$field, prior.map(|p| &p.$field));)*
            };
        }
        carry_all!(
            id,
            slug,
            auto_create_release,
            default_guided_failure_mode,
            default_to_skip_if_already_installed,
            discrete_channel_release,
            is_disabled,
            tenanted_deployment_participation,
            release_notes_template,
            deployment_process_id,
            variable_set_id,
        );
        default_to(&mut planned.description, &config.description, String::new());
        default_to(
            &mut planned.included_library_variable_sets,
            &config.included_library_variable_sets,
            Vec::new(),
        );
    }

    fn validate(diags: &mut Diagnostics, config: &ProjectState) {
        validators::not_empty(diags, AttributePath::new("name"), &config.name);
        validators::not_empty(diags, AttributePath::new("lifecycle_id"), &config.lifecycle_id);
        validators::not_empty(diags, AttributePath::new("project_group_id"), &config.project_group_id);
        validators::one_of(
            diags,
            AttributePath::new("default_guided_failure_mode"),
            &config.default_guided_failure_mode,
            &GUIDED_FAILURE_MODES,
            false,
        );
        validators::one_of(
            diags,
            AttributePath::new("tenanted_deployment_participation"),
            &config.tenanted_deployment_participation,
            &TENANTED_DEPLOYMENT_MODES,
            false,
        );
    }
}
