use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics};
use tf_provider::schema::Block;

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::project_group::{project_group_state, to_project_group};
use crate::model::ProjectGroup;
use crate::plan::{carry, default_to};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::StringValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGroupState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub description: StringValue,
}

pub fn attributes() -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("project group"));
    attributes.insert("name".into(), schema::name("project group"));
    attributes.insert("description".into(), schema::description("project group"));
    attributes
}

pub struct ProjectGroupKind;

impl ApiResourceKind for ProjectGroupKind {
    type Model = ProjectGroup;
    type State = ProjectGroupState;

    const TYPE_NAME: &'static str = "octopusdeploy_project_group";
    const DISPLAY_NAME: &'static str = "project group";

    fn schema() -> Block {
        schema::block(
            "This resource manages project groups in Octopus Deploy.",
            attributes(),
            Default::default(),
        )
    }

    fn id(state: &ProjectGroupState) -> &StringValue {
        &state.id
    }

    fn space_id(state: &ProjectGroupState) -> &StringValue {
        &state.space_id
    }

    fn space_id_mut(state: &mut ProjectGroupState) -> &mut StringValue {
        &mut state.space_id
    }

    fn to_model(state: &ProjectGroupState, _current: Option<&ProjectGroup>) -> Result<ProjectGroup> {
        Ok(to_project_group(state))
    }

    fn to_state(model: &ProjectGroup, _prior: Option<&ProjectGroupState>) -> Result<ProjectGroupState> {
        Ok(project_group_state(model))
    }

    fn plan(planned: &mut ProjectGroupState, config: &ProjectGroupState, prior: Option<&ProjectGroupState>) {
        carry(&mut planned.id, &config.id, prior.map(|p| &p.id));
        default_to(&mut planned.description, &config.description, String::new());
    }

    fn validate(diags: &mut Diagnostics, config: &ProjectGroupState) {
        validators::not_empty(diags, AttributePath::new("name"), &config.name);
    }
}
