use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, Block};
use tf_provider::value::Value;

use super::{ListKind, QueryState, item_list};
use crate::client::Query;
use crate::mappers::tenant::tenant_state;
use crate::model::Tenant;
use crate::resources::tenant::{self, TenantState};
use crate::schema;
use crate::value::{Blocks, StringList, expand_list};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantsState {
    #[serde(flatten)]
    pub query: QueryState,
    pub tags: StringList,
    pub tenants: Blocks<TenantState>,
}

pub struct TenantsKind;

impl ListKind for TenantsKind {
    type Model = Tenant;
    type State = TenantsState;

    const TYPE_NAME: &'static str = "octopusdeploy_tenants";
    const DISPLAY_NAME: &'static str = "tenants";

    fn schema() -> Block {
        let mut attributes = schema::query_attributes("tenants");
        attributes.insert(
            "tags".into(),
            schema::string_list(
                AttributeConstraint::Optional,
                "A filter to search by a list of tenant tags (`TagSet/Tag`).",
            ),
        );
        attributes.insert(
            "tenants".into(),
            item_list("A list of tenants that match the filter(s).", &tenant::attributes()),
        );
        schema::block(
            "Provides information about existing tenants.",
            attributes,
            Default::default(),
        )
    }

    fn query(state: &TenantsState) -> &QueryState {
        &state.query
    }

    fn query_mut(state: &mut TenantsState) -> &mut QueryState {
        &mut state.query
    }

    fn extend_query(state: &TenantsState, query: Query) -> Query {
        let tags = expand_list(&state.tags);
        if tags.is_empty() {
            query
        } else {
            query.with("tags", tags.join(","))
        }
    }

    fn set_items(state: &mut TenantsState, items: &[Tenant]) {
        state.tenants = Value::Value(
            items
                .iter()
                .map(|item| Value::Value(tenant_state(item, None)))
                .collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::flatten_list;

    #[test]
    fn tags_are_sent_comma_joined() {
        let state = TenantsState {
            tags: flatten_list(["Region/EU", "Tier/Gold"]),
            ..Default::default()
        };
        let query = TenantsKind::extend_query(&state, state.query.to_query());
        assert!(query.pairs().contains(&("tags", "Region/EU,Tier/Gold".to_string())));
    }
}
