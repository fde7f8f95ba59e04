use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tf_provider::{AttributePath, Diagnostics, Resource};
use tf_provider::schema::{Block, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tracing::{Instrument, Span, info, info_span};

use crate::client::OctopusClient;
use crate::error::{Result, process_api_error, remove_from_state_if_not_found};
use crate::model::OctopusResource;
use crate::provider::ClientHandle;
use crate::value::{StringValue, known, non_empty, string_or_empty};

pub mod deployment_process;
pub mod environment;
pub mod feeds;
pub mod lifecycle;
pub mod project;
pub mod project_group;
pub mod tenant;

/// One Octopus collection exposed as a Terraform resource.
pub trait ApiResourceKind: Send + Sync + 'static {
    type Model: OctopusResource + Clone + Debug;
    type State: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync;

    /// Terraform type name, e.g. `octopusdeploy_environment`.
    const TYPE_NAME: &'static str;
    /// Used in diagnostics and logs.
    const DISPLAY_NAME: &'static str;

    fn schema() -> Block;

    fn id(state: &Self::State) -> &StringValue;

    fn space_id(state: &Self::State) -> &StringValue;

    fn space_id_mut(state: &mut Self::State) -> &mut StringValue;

    /// Builds the request body. `current` is the resource as the server has it, on update.
    fn to_model(state: &Self::State, current: Option<&Self::Model>) -> Result<Self::Model>;

    /// Builds state from the server's view. `prior` supplies values the API never returns.
    fn to_state(model: &Self::Model, prior: Option<&Self::State>) -> Result<Self::State>;

    fn plan(planned: &mut Self::State, config: &Self::State, prior: Option<&Self::State>);

    fn validate(_diags: &mut Diagnostics, _config: &Self::State) {}

    /// Attributes other than `space_id` that force replacement when they change.
    fn requires_replace(_prior: &Self::State, _planned: &Self::State) -> Vec<AttributePath> {
        Vec::new()
    }
}

pub(crate) fn operation_span(operation: &str, type_name: &str, id: &str) -> Span {
    info_span!("resource", operation, resource = type_name, id)
}

/// Space to address: the state's, or the provider's when unset.
pub(crate) fn space_of<'a>(client: &'a OctopusClient, space_id: &'a StringValue) -> &'a str {
    client.scope(non_empty(space_id).unwrap_or_default())
}

/// `space_id` is optional+computed; unset means the provider's space.
pub(crate) fn plan_space_id(
    planned: &mut StringValue,
    config: &StringValue,
    prior: Option<&StringValue>,
    client: Option<&OctopusClient>,
) {
    if known(config).is_some() {
        return;
    }
    *planned = match (prior.and_then(known), client) {
        (Some(prior), _) => Value::Value(prior.clone()),
        (None, Some(client)) => Value::Value(client.space_id().to_string()),
        (None, None) => Value::Unknown,
    };
}

pub struct ApiResource<K> {
    client: ClientHandle,
    kind: PhantomData<K>,
}

impl<K> ApiResource<K> {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<K> Debug for ApiResource<K>
where
    K: ApiResourceKind,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResource")
            .field("type", &K::TYPE_NAME)
            .finish()
    }
}

impl<K: ApiResourceKind> ApiResource<K> {
    async fn client(&self, diags: &mut Diagnostics) -> Option<OctopusClient> {
        match self.client.get().await {
            Ok(client) => Some(client),
            Err(err) => process_api_error(diags, err, &format!("reach Octopus for {}", K::DISPLAY_NAME)),
        }
    }

    async fn plan(
        &self,
        planned: &mut K::State,
        config: &K::State,
        prior: Option<&K::State>,
    ) {
        K::plan(planned, config, prior);
        let client = self.client.get().await.ok();
        plan_space_id(
            K::space_id_mut(planned),
            K::space_id(config),
            prior.map(K::space_id),
            client.as_ref(),
        );
    }
}

#[async_trait]
impl<K: ApiResourceKind> Resource for ApiResource<K> {
    type State<'a> = K::State;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: K::schema(),
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        K::validate(diags, &config);
        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = string_or_empty(K::id(&state));
        let span = operation_span("read", K::TYPE_NAME, &id);
        async move {
            let client = self.client(diags).await?;
            let space_id = space_of(&client, K::space_id(&state));
            let model: K::Model = match client.get(space_id, &id).await {
                Ok(model) => model,
                Err(err) => return remove_from_state_if_not_found(diags, err, K::DISPLAY_NAME)?,
            };
            match K::to_state(&model, Some(&state)) {
                Ok(state) => Some((state, private_state)),
                Err(err) => process_api_error(diags, err, &format!("map {}", K::DISPLAY_NAME)),
            }
        }
        .instrument(span)
        .await
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut planned = proposed_state;
        self.plan(&mut planned, &config_state, None).await;
        Some((planned, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut planned = proposed_state;
        self.plan(&mut planned, &config_state, Some(&prior_state)).await;

        let mut replace = K::requires_replace(&prior_state, &planned);
        if known(K::space_id(&planned)).is_some()
            && K::space_id(&planned) != K::space_id(&prior_state)
        {
            replace.push(AttributePath::new("space_id"));
        }
        Some((planned, prior_private_state, replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("create", K::TYPE_NAME, "");
        async move {
            let client = self.client(diags).await?;
            let space_id = space_of(&client, K::space_id(&planned_state));
            let model = match K::to_model(&planned_state, None) {
                Ok(model) => model,
                Err(err) => {
                    return process_api_error(diags, err, &format!("map {}", K::DISPLAY_NAME));
                }
            };
            let created = match client.create(space_id, &model).await {
                Ok(created) => created,
                Err(err) => {
                    return process_api_error(diags, err, &format!("create {}", K::DISPLAY_NAME));
                }
            };
            info!(id = created.id().unwrap_or_default(), "created {}", K::DISPLAY_NAME);
            match K::to_state(&created, Some(&planned_state)) {
                Ok(state) => Some((state, planned_private_state)),
                Err(err) => process_api_error(diags, err, &format!("map {}", K::DISPLAY_NAME)),
            }
        }
        .instrument(span)
        .await
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = string_or_empty(K::id(&prior_state));
        let span = operation_span("update", K::TYPE_NAME, &id);
        async move {
            let client = self.client(diags).await?;
            let space_id = space_of(&client, K::space_id(&planned_state));
            let current: K::Model = match client.get(space_id, &id).await {
                Ok(current) => current,
                Err(err) => {
                    return process_api_error(diags, err, &format!("read {}", K::DISPLAY_NAME));
                }
            };
            let updated = match K::to_model(&planned_state, Some(&current)) {
                Ok(model) => client.update(space_id, &model).await,
                Err(err) => Err(err),
            };
            let updated = match updated {
                Ok(updated) => updated,
                Err(err) => {
                    return process_api_error(diags, err, &format!("update {}", K::DISPLAY_NAME));
                }
            };
            info!("updated {}", K::DISPLAY_NAME);
            match K::to_state(&updated, Some(&planned_state)) {
                Ok(state) => Some((state, planned_private_state)),
                Err(err) => process_api_error(diags, err, &format!("map {}", K::DISPLAY_NAME)),
            }
        }
        .instrument(span)
        .await
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let id = string_or_empty(K::id(&state));
        let span = operation_span("delete", K::TYPE_NAME, &id);
        async move {
            let client = self.client(diags).await?;
            let space_id = space_of(&client, K::space_id(&state));
            match client.delete::<K::Model>(space_id, &id).await {
                Ok(()) => {
                    info!("deleted {}", K::DISPLAY_NAME);
                    Some(())
                }
                Err(err) if err.is_not_found() => {
                    info!("{} already gone", K::DISPLAY_NAME);
                    Some(())
                }
                Err(err) => process_api_error(diags, err, &format!("delete {}", K::DISPLAY_NAME)),
            }
        }
        .instrument(span)
        .await
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let span = operation_span("import", K::TYPE_NAME, &id);
        async move {
            let client = self.client(diags).await?;
            let model: K::Model = match client.get(client.space_id(), &id).await {
                Ok(model) => model,
                Err(err) => {
                    return process_api_error(diags, err, &format!("import {}", K::DISPLAY_NAME));
                }
            };
            match K::to_state(&model, None) {
                Ok(state) => Some((state, Default::default())),
                Err(err) => process_api_error(diags, err, &format!("map {}", K::DISPLAY_NAME)),
            }
        }
        .instrument(span)
        .await
    }
}
