use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, Block};
use tf_provider::value::Value;

use super::{ListKind, QueryState, item_list};
use crate::client::Query;
use crate::mappers::environment::environment_item;
use crate::model::Environment;
use crate::resources::environment;
use crate::schema;
use crate::value::{Blocks, BoolValue, NumberValue, StringValue, non_empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentItem {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub slug: StringValue,
    pub description: StringValue,
    pub sort_order: NumberValue,
    pub allow_dynamic_infrastructure: BoolValue,
    pub use_guided_failure: BoolValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentsState {
    #[serde(flatten)]
    pub query: QueryState,
    pub name: StringValue,
    pub environments: Blocks<EnvironmentItem>,
}

pub struct EnvironmentsKind;

impl ListKind for EnvironmentsKind {
    type Model = Environment;
    type State = EnvironmentsState;

    const TYPE_NAME: &'static str = "octopusdeploy_environments";
    const DISPLAY_NAME: &'static str = "environments";

    fn schema() -> Block {
        let mut attributes = schema::query_attributes("environments");
        attributes.insert(
            "name".into(),
            schema::string(AttributeConstraint::Optional, "A filter to search by name."),
        );
        attributes.insert(
            "environments".into(),
            item_list("A list of environments that match the filter(s).", &environment::attributes()),
        );
        schema::block(
            "Provides information about existing environments.",
            attributes,
            Default::default(),
        )
    }

    fn query(state: &EnvironmentsState) -> &QueryState {
        &state.query
    }

    fn query_mut(state: &mut EnvironmentsState) -> &mut QueryState {
        &mut state.query
    }

    fn extend_query(state: &EnvironmentsState, query: Query) -> Query {
        match non_empty(&state.name) {
            Some(name) => query.with("name", name),
            None => query,
        }
    }

    /// The `name` filter of the API matches partially; this one is exact.
    fn keep(state: &EnvironmentsState, environment: &Environment) -> bool {
        non_empty(&state.name).is_none_or(|name| environment.name == name)
    }

    fn set_items(state: &mut EnvironmentsState, items: &[Environment]) {
        state.environments = Value::Value(
            items
                .iter()
                .map(|environment| Value::Value(environment_item(environment)))
                .collect(),
        );
    }
}
