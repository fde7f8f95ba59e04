use serde::{Deserialize, Serialize};
use tf_provider::schema::Block;
use tf_provider::value::Value;

use super::{ListKind, QueryState, item_list};
use crate::mappers::lifecycle::lifecycle_item;
use crate::model::Lifecycle;
use crate::resources::lifecycle::{RetentionPolicyState, phase_attributes, retention_policy_attributes};
use crate::schema::{self, Attributes};
use crate::value::{Blocks, BoolValue, NumberValue, StringList, StringValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseItem {
    pub id: StringValue,
    pub name: StringValue,
    pub automatic_deployment_targets: StringList,
    pub optional_deployment_targets: StringList,
    pub minimum_environments_before_promotion: NumberValue,
    pub is_optional_phase: BoolValue,
    pub is_priority_phase: BoolValue,
    pub release_retention_policy: Blocks<RetentionPolicyState>,
    pub tentacle_retention_policy: Blocks<RetentionPolicyState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleItem {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub description: StringValue,
    pub phase: Blocks<PhaseItem>,
    pub release_retention_policy: Blocks<RetentionPolicyState>,
    pub tentacle_retention_policy: Blocks<RetentionPolicyState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecyclesState {
    #[serde(flatten)]
    pub query: QueryState,
    pub lifecycles: Blocks<LifecycleItem>,
}

fn with_retention_policies(mut attributes: Attributes) -> Attributes {
    let policy = retention_policy_attributes();
    for name in ["release_retention_policy", "tentacle_retention_policy"] {
        attributes.insert(
            name.into(),
            item_list("The retention policy, empty when none is set.", &policy),
        );
    }
    attributes
}

/// Attributes of one listed lifecycle.
pub fn item_attributes() -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("lifecycle"));
    attributes.insert("name".into(), schema::name("lifecycle"));
    attributes.insert("description".into(), schema::description("lifecycle"));
    attributes.insert(
        "phase".into(),
        item_list(
            "The phases of the lifecycle.",
            &with_retention_policies(phase_attributes()),
        ),
    );
    with_retention_policies(attributes)
}

pub struct LifecyclesKind;

impl ListKind for LifecyclesKind {
    type Model = Lifecycle;
    type State = LifecyclesState;

    const TYPE_NAME: &'static str = "octopusdeploy_lifecycles";
    const DISPLAY_NAME: &'static str = "lifecycles";

    fn schema() -> Block {
        let mut attributes = schema::query_attributes("lifecycles");
        attributes.insert(
            "lifecycles".into(),
            item_list("A list of lifecycles that match the filter(s).", &item_attributes()),
        );
        schema::block(
            "Provides information about existing lifecycles.",
            attributes,
            Default::default(),
        )
    }

    fn query(state: &LifecyclesState) -> &QueryState {
        &state.query
    }

    fn query_mut(state: &mut LifecyclesState) -> &mut QueryState {
        &mut state.query
    }

    fn set_items(state: &mut LifecyclesState, items: &[Lifecycle]) {
        state.lifecycles = Value::Value(
            items
                .iter()
                .map(|lifecycle| Value::Value(lifecycle_item(lifecycle)))
                .collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType};

    use super::*;
    use crate::model::Phase;
    use crate::value::{blocks, string};

    fn nested(attribute: &Attribute) -> &Attributes {
        match &attribute.attr_type {
            AttributeType::AttributeList(attributes) => attributes,
            other => panic!("expected a nested list, got {other:?}"),
        }
    }

    #[test]
    fn nested_attributes_are_all_computed() {
        let block = LifecyclesKind::schema();
        let lifecycles = nested(&block.attributes["lifecycles"]);
        let phase = nested(&lifecycles["phase"]);
        let policy = nested(&phase["release_retention_policy"]);
        for attributes in [lifecycles, phase, policy] {
            assert!(
                attributes
                    .values()
                    .all(|a| a.constraint == AttributeConstraint::Computed)
            );
        }
        assert!(policy.contains_key("should_keep_forever"));
    }

    #[test]
    fn items_mirror_the_item_schema() {
        let fields = serde_json::to_value(LifecycleItem::default()).expect("encode");
        let fields = fields.as_object().expect("object");
        assert_eq!(fields.len(), item_attributes().len());
        let phase = serde_json::to_value(PhaseItem::default()).expect("encode");
        let expected = with_retention_policies(phase_attributes());
        assert_eq!(phase.as_object().expect("object").len(), expected.len());
    }

    #[test]
    fn every_lifecycle_in_the_page_is_listed() {
        let mut state = LifecyclesState::default();
        let lifecycles = [
            Lifecycle {
                id: Some("Lifecycles-1".into()),
                name: "Default Lifecycle".into(),
                ..Default::default()
            },
            Lifecycle {
                id: Some("Lifecycles-2".into()),
                name: "Hotfix".into(),
                phases: vec![Phase {
                    name: "Production".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ];
        LifecyclesKind::set_items(&mut state, &lifecycles);
        let items: Vec<_> = blocks(&state.lifecycles).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, string("Hotfix"));
        assert_eq!(blocks(&items[1].phase).count(), 1);
        assert!(blocks(&items[0].release_retention_policy).next().is_none());
    }
}
