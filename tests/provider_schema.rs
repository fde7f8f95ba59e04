use tf_provider::{DataSource, Diagnostics, Provider, Resource};
use tf_provider::schema::{AttributeConstraint, Schema};

use terraform_provider_octopusdeploy::data_sources::ListDataSource;
use terraform_provider_octopusdeploy::data_sources::environments::EnvironmentsKind;
use terraform_provider_octopusdeploy::data_sources::feeds::FeedsKind;
use terraform_provider_octopusdeploy::data_sources::lifecycles::LifecyclesKind;
use terraform_provider_octopusdeploy::data_sources::project_groups::ProjectGroupsKind;
use terraform_provider_octopusdeploy::data_sources::tenants::TenantsKind;
use terraform_provider_octopusdeploy::resources::ApiResource;
use terraform_provider_octopusdeploy::resources::deployment_process::DeploymentProcessResource;
use terraform_provider_octopusdeploy::resources::environment::EnvironmentKind;
use terraform_provider_octopusdeploy::resources::feeds::{
    DockerContainerRegistryState, FeedResource, GitHubRepositoryFeedState, HelmFeedState,
    MavenFeedState, NugetFeedState,
};
use terraform_provider_octopusdeploy::resources::lifecycle::LifecycleKind;
use terraform_provider_octopusdeploy::resources::project::ProjectKind;
use terraform_provider_octopusdeploy::resources::project_group::ProjectGroupKind;
use terraform_provider_octopusdeploy::resources::tenant::TenantKind;
use terraform_provider_octopusdeploy::{ClientHandle, OctopusProvider};

fn resource_schema<R: Resource>(resource: &R) -> Schema {
    let mut diags = Diagnostics::default();
    let schema = resource.schema(&mut diags).expect("resource schema");
    assert!(diags.errors.is_empty());
    schema
}

fn data_source_schema<D: DataSource>(data_source: &D) -> Schema {
    let mut diags = Diagnostics::default();
    let schema = data_source.schema(&mut diags).expect("data source schema");
    assert!(diags.errors.is_empty());
    schema
}

#[test]
fn provider_block_is_optional_and_hides_credentials() {
    let provider = OctopusProvider::new();
    let mut diags = Diagnostics::default();
    let schema = provider.schema(&mut diags).expect("provider schema");
    let attributes = &schema.block.attributes;

    for name in ["address", "api_key", "access_token", "space_id"] {
        assert_eq!(attributes[name].constraint, AttributeConstraint::Optional, "{name}");
    }
    assert!(attributes["api_key"].sensitive);
    assert!(attributes["access_token"].sensitive);
    assert!(!attributes["address"].sensitive);
}

#[test]
fn managed_resources_share_id_and_space_attributes() {
    let client = ClientHandle::default();
    let schemas = [
        resource_schema(&ApiResource::<EnvironmentKind>::new(client.clone())),
        resource_schema(&ApiResource::<ProjectGroupKind>::new(client.clone())),
        resource_schema(&ApiResource::<ProjectKind>::new(client.clone())),
        resource_schema(&ApiResource::<TenantKind>::new(client.clone())),
        resource_schema(&ApiResource::<LifecycleKind>::new(client.clone())),
        resource_schema(&ApiResource::<FeedResource<NugetFeedState>>::new(client.clone())),
        resource_schema(&ApiResource::<FeedResource<HelmFeedState>>::new(client.clone())),
        resource_schema(&ApiResource::<FeedResource<DockerContainerRegistryState>>::new(
            client.clone(),
        )),
        resource_schema(&ApiResource::<FeedResource<MavenFeedState>>::new(client.clone())),
        resource_schema(&ApiResource::<FeedResource<GitHubRepositoryFeedState>>::new(client)),
    ];

    for schema in &schemas {
        let attributes = &schema.block.attributes;
        assert_eq!(attributes["id"].constraint, AttributeConstraint::Computed);
        assert_eq!(attributes["space_id"].constraint, AttributeConstraint::OptionalComputed);
        assert_eq!(attributes["name"].constraint, AttributeConstraint::Required);
    }
}

#[test]
fn feed_passwords_are_sensitive() {
    let client = ClientHandle::default();
    let nuget = resource_schema(&ApiResource::<FeedResource<NugetFeedState>>::new(client.clone()));
    let docker = resource_schema(&ApiResource::<FeedResource<DockerContainerRegistryState>>::new(
        client,
    ));
    assert!(nuget.block.attributes["password"].sensitive);
    assert!(docker.block.attributes["password"].sensitive);
    assert!(docker.block.attributes.contains_key("api_version"));
    assert!(!nuget.block.attributes.contains_key("api_version"));
}

#[test]
fn deployment_process_requires_a_project() {
    let schema = resource_schema(&DeploymentProcessResource::new(ClientHandle::default()));
    let attributes = &schema.block.attributes;
    assert_eq!(attributes["project_id"].constraint, AttributeConstraint::Required);
    assert_eq!(attributes["version"].constraint, AttributeConstraint::Computed);
    assert!(schema.block.blocks.contains_key("step"));
}

#[test]
fn data_sources_expose_paging_filters() {
    let client = ClientHandle::default();
    let schemas = [
        (
            "environments",
            data_source_schema(&ListDataSource::<EnvironmentsKind>::new(client.clone())),
        ),
        (
            "project_groups",
            data_source_schema(&ListDataSource::<ProjectGroupsKind>::new(client.clone())),
        ),
        (
            "tenants",
            data_source_schema(&ListDataSource::<TenantsKind>::new(client.clone())),
        ),
        (
            "feeds",
            data_source_schema(&ListDataSource::<FeedsKind>::new(client.clone())),
        ),
        (
            "lifecycles",
            data_source_schema(&ListDataSource::<LifecyclesKind>::new(client)),
        ),
    ];

    for (list, schema) in &schemas {
        let attributes = &schema.block.attributes;
        assert_eq!(attributes["id"].constraint, AttributeConstraint::Computed);
        for filter in ["ids", "partial_name", "skip", "take"] {
            assert_eq!(attributes[filter].constraint, AttributeConstraint::Optional, "{filter}");
        }
        assert_eq!(attributes[*list].constraint, AttributeConstraint::Computed, "{list}");
    }
}

#[tokio::test]
async fn unconfigured_provider_fails_reads_with_a_diagnostic() {
    let data_source = ListDataSource::<EnvironmentsKind>::new(ClientHandle::default());
    let mut diags = Diagnostics::default();
    let config = Default::default();
    let state = data_source
        .read(&mut diags, config, Default::default())
        .await;
    assert!(state.is_none());
    assert_eq!(diags.errors.len(), 1);
}
