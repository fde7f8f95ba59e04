use crate::model::ProjectGroup;
use crate::resources::project_group::ProjectGroupState;
use crate::value::{non_empty, string, string_or_empty};

pub fn to_project_group(state: &ProjectGroupState) -> ProjectGroup {
    ProjectGroup {
        id: non_empty(&state.id).map(str::to_string),
        name: string_or_empty(&state.name),
        description: string_or_empty(&state.description),
        space_id: non_empty(&state.space_id).map(str::to_string),
    }
}

pub fn project_group_state(group: &ProjectGroup) -> ProjectGroupState {
    ProjectGroupState {
        id: string(group.id.clone().unwrap_or_default()),
        space_id: string(group.space_id.clone().unwrap_or_default()),
        name: string(group.name.as_str()),
        description: string(group.description.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_group_is_sent_without_id() {
        let state = ProjectGroupState {
            name: string("Web"),
            description: string(""),
            ..Default::default()
        };
        let body = serde_json::to_value(to_project_group(&state)).expect("encode");
        assert_eq!(body, json!({ "Name": "Web", "Description": "" }));
    }

    #[test]
    fn missing_description_reads_as_empty() {
        let group: ProjectGroup = serde_json::from_value(json!({
            "Id": "ProjectGroups-1",
            "Name": "Default Project Group",
            "SpaceId": "Spaces-1"
        }))
        .expect("decode");
        let state = project_group_state(&group);
        assert_eq!(state.description, string(""));
        assert_eq!(state.space_id, string("Spaces-1"));
    }
}
