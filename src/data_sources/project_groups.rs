use serde::{Deserialize, Serialize};
use tf_provider::schema::Block;
use tf_provider::value::Value;

use super::{ListKind, QueryState, item_list};
use crate::mappers::project_group::project_group_state;
use crate::model::ProjectGroup;
use crate::resources::project_group::{self, ProjectGroupState};
use crate::schema;
use crate::value::Blocks;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGroupsState {
    #[serde(flatten)]
    pub query: QueryState,
    pub project_groups: Blocks<ProjectGroupState>,
}

pub struct ProjectGroupsKind;

impl ListKind for ProjectGroupsKind {
    type Model = ProjectGroup;
    type State = ProjectGroupsState;

    const TYPE_NAME: &'static str = "octopusdeploy_project_groups";
    const DISPLAY_NAME: &'static str = "project groups";

    fn schema() -> Block {
        let mut attributes = schema::query_attributes("project groups");
        attributes.insert(
            "project_groups".into(),
            item_list(
                "A list of project groups that match the filter(s).",
                &project_group::attributes(),
            ),
        );
        schema::block(
            "Provides information about existing project groups.",
            attributes,
            Default::default(),
        )
    }

    fn query(state: &ProjectGroupsState) -> &QueryState {
        &state.query
    }

    fn query_mut(state: &mut ProjectGroupsState) -> &mut QueryState {
        &mut state.query
    }

    fn set_items(state: &mut ProjectGroupsState, items: &[ProjectGroup]) {
        state.project_groups = Value::Value(
            items
                .iter()
                .map(|group| Value::Value(project_group_state(group)))
                .collect(),
        );
    }
}
