use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, DataSource, Diagnostics};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tracing::{Instrument, debug, info_span};

use crate::client::Query;
use crate::error::process_api_error;
use crate::model::OctopusResource;
use crate::provider::ClientHandle;
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{NumberValue, StringList, StringValue, expand_list, known, non_empty};

pub mod environments;
pub mod feeds;
pub mod lifecycles;
pub mod project_groups;
pub mod tenants;

/// Filters shared by every list data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub id: StringValue,
    pub ids: StringList,
    pub partial_name: StringValue,
    pub skip: NumberValue,
    pub take: NumberValue,
    pub space_id: StringValue,
}

impl QueryState {
    pub fn to_query(&self) -> Query {
        Query {
            ids: expand_list(&self.ids),
            partial_name: non_empty(&self.partial_name).map(str::to_string),
            skip: known(&self.skip).copied(),
            take: known(&self.take).copied(),
            extra: Vec::new(),
        }
    }
}

/// Synthetic id: the Unix time of the read.
pub fn read_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Computed list attribute of nested objects.
pub fn item_list(description: impl ToString, item_attributes: &Attributes) -> Attribute {
    schema::attribute(
        AttributeType::AttributeList(schema::computed_copy(item_attributes)),
        AttributeConstraint::Computed,
        description,
    )
}

/// One Octopus collection exposed as a list data source.
pub trait ListKind: Send + Sync + 'static {
    type Model: OctopusResource + Debug;
    type State: Serialize + DeserializeOwned + Clone + Debug + Send + Sync;

    const TYPE_NAME: &'static str;
    /// Collection name used in logs.
    const DISPLAY_NAME: &'static str;

    fn schema() -> Block;

    fn query(state: &Self::State) -> &QueryState;

    fn query_mut(state: &mut Self::State) -> &mut QueryState;

    /// Adds kind-specific query parameters.
    fn extend_query(_state: &Self::State, query: Query) -> Query {
        query
    }

    /// Filters the server can't apply.
    fn keep(_state: &Self::State, _model: &Self::Model) -> bool {
        true
    }

    fn set_items(state: &mut Self::State, items: &[Self::Model]);

    fn validate_extra(_diags: &mut Diagnostics, _config: &Self::State) {}
}

pub struct ListDataSource<K> {
    client: ClientHandle,
    kind: PhantomData<K>,
}

impl<K> ListDataSource<K> {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<K: ListKind> Debug for ListDataSource<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListDataSource")
            .field("type", &K::TYPE_NAME)
            .finish()
    }
}

#[async_trait]
impl<K: ListKind> DataSource for ListDataSource<K> {
    type State<'a> = K::State;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: K::schema(),
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        let query = K::query(&config);
        validators::at_least(diags, AttributePath::new("skip"), &query.skip, 0);
        validators::at_least(diags, AttributePath::new("take"), &query.take, 1);
        K::validate_extra(diags, &config);
        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let span = info_span!("data_source", operation = "read", data_source = K::TYPE_NAME);
        async move {
            let client = match self.client.get().await {
                Ok(client) => client,
                Err(err) => return process_api_error(diags, err, &format!("read {}", K::DISPLAY_NAME)),
            };
            let query = K::extend_query(&config, K::query(&config).to_query());
            let space_id = non_empty(&K::query(&config).space_id).unwrap_or_default();
            let page = match client.list::<K::Model>(space_id, &query).await {
                Ok(page) => page,
                Err(err) => return process_api_error(diags, err, &format!("read {}", K::DISPLAY_NAME)),
            };
            let items: Vec<K::Model> = page
                .items
                .into_iter()
                .filter(|item| K::keep(&config, item))
                .collect();
            debug!(count = items.len(), total = page.total_results, "listed {}", K::DISPLAY_NAME);

            let mut state = config;
            K::set_items(&mut state, &items);
            K::query_mut(&mut state).id = Value::Value(read_timestamp());
            Some(state)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{flatten_list, string};

    #[test]
    fn query_state_becomes_request_filters() {
        let state = QueryState {
            ids: flatten_list(["Environments-1", "Environments-2"]),
            partial_name: string("Prod"),
            skip: Value::Value(0),
            take: Value::Value(10),
            ..Default::default()
        };
        let pairs = state.to_query().pairs();
        assert!(pairs.contains(&("ids", "Environments-1,Environments-2".to_string())));
        assert!(pairs.contains(&("partialName", "Prod".to_string())));
        assert!(pairs.contains(&("take", "10".to_string())));
    }

    #[test]
    fn timestamp_is_numeric() {
        assert!(read_timestamp().parse::<u64>().is_ok());
    }
}
