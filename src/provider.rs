use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::{Diagnostics, DynamicDataSource, DynamicResource, Provider};
use tf_provider::schema::{AttributeConstraint, Schema};
use tf_provider::value::ValueEmpty;
use tokio::sync::RwLock;
use tracing::{Instrument, info, info_span};

use crate::client::OctopusClient;
use crate::config::{ClientConfig, ENV_ACCESS_TOKEN, ENV_ADDRESS, ENV_API_KEY, ENV_SPACE_ID, ProviderSettings};
use crate::data_sources::environments::EnvironmentsKind;
use crate::data_sources::feeds::FeedsKind;
use crate::data_sources::lifecycles::LifecyclesKind;
use crate::data_sources::project_groups::ProjectGroupsKind;
use crate::data_sources::tenants::TenantsKind;
use crate::data_sources::{ListDataSource, ListKind};
use crate::error::{ProviderError, Result, process_api_error};
use crate::resources::deployment_process::{self, DeploymentProcessResource};
use crate::resources::environment::EnvironmentKind;
use crate::resources::feeds::{
    DockerContainerRegistryState, FeedResource, GitHubRepositoryFeedState, HelmFeedState,
    MavenFeedState, NugetFeedState,
};
use crate::resources::lifecycle::LifecycleKind;
use crate::resources::project::ProjectKind;
use crate::resources::project_group::ProjectGroupKind;
use crate::resources::tenant::TenantKind;
use crate::resources::{ApiResource, ApiResourceKind};
use crate::schema::{self, Attributes};
use crate::value::{StringValue, non_empty};

pub const PROVIDER_NAME: &str = "octopusdeploy";

/// Shared slot for the client `configure` builds. Every resource holds a clone.
#[derive(Debug, Clone, Default)]
pub struct ClientHandle(Arc<RwLock<Option<OctopusClient>>>);

impl ClientHandle {
    pub async fn get(&self) -> Result<OctopusClient> {
        self.0.read().await.clone().ok_or(ProviderError::NotConfigured)
    }

    pub async fn set(&self, client: OctopusClient) {
        *self.0.write().await = Some(client);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfigState {
    pub address: StringValue,
    pub api_key: StringValue,
    pub access_token: StringValue,
    pub space_id: StringValue,
}

impl From<&ProviderConfigState> for ProviderSettings {
    fn from(config: &ProviderConfigState) -> Self {
        let given = |value: &StringValue| non_empty(value).map(str::to_string);
        ProviderSettings {
            address: given(&config.address),
            api_key: given(&config.api_key),
            access_token: given(&config.access_token),
            space_id: given(&config.space_id),
        }
    }
}

/// Type name without the provider prefix, as tf-provider registers it.
fn local_name(type_name: &'static str) -> &'static str {
    type_name
        .strip_prefix(PROVIDER_NAME)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(type_name)
}

#[derive(Debug, Clone, Default)]
pub struct OctopusProvider {
    client: ClientHandle,
}

impl OctopusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_handle(&self) -> ClientHandle {
        self.client.clone()
    }

    fn resource<K: ApiResourceKind>(&self) -> (String, Box<dyn DynamicResource>) {
        (
            local_name(K::TYPE_NAME).to_string(),
            Box::new(ApiResource::<K>::new(self.client.clone())),
        )
    }

    fn data_source<K: ListKind>(&self) -> (String, Box<dyn DynamicDataSource>) {
        (
            local_name(K::TYPE_NAME).to_string(),
            Box::new(ListDataSource::<K>::new(self.client.clone())),
        )
    }
}

pub fn provider_schema() -> Schema {
    use AttributeConstraint::Optional;

    let mut attributes = Attributes::new();
    attributes.insert(
        "address".into(),
        schema::string(
            Optional,
            format!("The endpoint of the Octopus REST API. Falls back to `{ENV_ADDRESS}`."),
        ),
    );
    attributes.insert(
        "api_key".into(),
        schema::sensitive(schema::string(
            Optional,
            format!("The API key to use with the Octopus REST API. Falls back to `{ENV_API_KEY}`."),
        )),
    );
    attributes.insert(
        "access_token".into(),
        schema::sensitive(schema::string(
            Optional,
            format!(
                "The OIDC access token to use with the Octopus REST API. Falls back to `{ENV_ACCESS_TOKEN}`."
            ),
        )),
    );
    attributes.insert(
        "space_id".into(),
        schema::string(
            Optional,
            format!(
                "The space ID to target. Falls back to `{ENV_SPACE_ID}`, then to the server's default space."
            ),
        ),
    );
    Schema {
        version: 1,
        block: schema::block(
            "Manages Octopus Deploy resources.",
            attributes,
            Default::default(),
        ),
    }
}

#[async_trait]
impl Provider for OctopusProvider {
    type Config<'a> = ProviderConfigState;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(provider_schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::Config<'a>) -> Option<()> {
        Some(())
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let span = info_span!("configure", terraform_version = %terraform_version);
        async move {
            let settings = ProviderSettings::from(&config);
            let client_config = match ClientConfig::from_env_and_settings(settings) {
                Ok(client_config) => client_config,
                Err(err) => return process_api_error(diags, err, "configure the Octopus provider"),
            };
            let client = match OctopusClient::connect(&client_config).await {
                Ok(client) => client,
                Err(err) => return process_api_error(diags, err, "connect to the Octopus server"),
            };
            info!(space_id = client.space_id(), "provider configured");
            self.client.set(client).await;
            Some(())
        }
        .instrument(span)
        .await
    }

    fn get_resources(&self, _diags: &mut Diagnostics) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let mut resources: HashMap<String, Box<dyn DynamicResource>> = HashMap::new();
        resources.insert(
            local_name(deployment_process::TYPE_NAME).to_string(),
            Box::new(DeploymentProcessResource::new(self.client.clone())),
        );
        resources.extend([
            self.resource::<EnvironmentKind>(),
            self.resource::<ProjectGroupKind>(),
            self.resource::<ProjectKind>(),
            self.resource::<TenantKind>(),
            self.resource::<LifecycleKind>(),
            self.resource::<FeedResource<NugetFeedState>>(),
            self.resource::<FeedResource<HelmFeedState>>(),
            self.resource::<FeedResource<DockerContainerRegistryState>>(),
            self.resource::<FeedResource<MavenFeedState>>(),
            self.resource::<FeedResource<GitHubRepositoryFeedState>>(),
        ]);
        Some(resources)
    }

    fn get_data_sources(&self, _diags: &mut Diagnostics) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(HashMap::from([
            self.data_source::<EnvironmentsKind>(),
            self.data_source::<ProjectGroupsKind>(),
            self.data_source::<TenantsKind>(),
            self.data_source::<FeedsKind>(),
            self.data_source::<LifecyclesKind>(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    #[test]
    fn local_names_drop_the_provider_prefix() {
        assert_eq!(local_name("octopusdeploy_environment"), "environment");
        assert_eq!(local_name("octopusdeploy_nuget_feed"), "nuget_feed");
        assert_eq!(local_name("custom"), "custom");
    }

    #[test]
    fn empty_provider_attributes_count_as_unset() {
        let config = ProviderConfigState {
            address: string("https://octopus.example.com"),
            api_key: string(""),
            ..Default::default()
        };
        let settings = ProviderSettings::from(&config);
        assert_eq!(settings.address.as_deref(), Some("https://octopus.example.com"));
        assert!(settings.api_key.is_none());
        assert!(settings.space_id.is_none());
    }

    #[tokio::test]
    async fn unconfigured_handle_reports_not_configured() {
        let handle = ClientHandle::default();
        assert!(matches!(handle.get().await, Err(ProviderError::NotConfigured)));
    }

    #[test]
    fn every_type_is_registered() {
        let provider = OctopusProvider::new();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).expect("resources");
        for name in [
            "environment",
            "project_group",
            "project",
            "tenant",
            "lifecycle",
            "deployment_process",
            "nuget_feed",
            "helm_feed",
            "docker_container_registry",
            "maven_feed",
            "github_repository_feed",
        ] {
            assert!(resources.contains_key(name), "missing resource {name}");
        }
        let data_sources = provider.get_data_sources(&mut diags).expect("data sources");
        for name in ["environments", "project_groups", "tenants", "feeds", "lifecycles"] {
            assert!(data_sources.contains_key(name), "missing data source {name}");
        }
    }
}
