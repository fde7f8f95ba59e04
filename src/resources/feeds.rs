use std::fmt::Debug;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics};
use tf_provider::schema::{AttributeConstraint, Block};

use super::ApiResourceKind;
use crate::error::Result;
use crate::mappers::feed::{feed_state, to_feed};
use crate::model::{Feed, FeedType};
use crate::plan::{carry, default_to};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{BoolValue, NumberValue, StringList, StringValue, known, non_empty};

/// Attributes every feed resource carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedCommon {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub feed_uri: StringValue,
    pub username: StringValue,
    pub password: StringValue,
    pub package_acquisition_location_options: StringList,
}

/// Generates a feed state struct with the common attributes plus `extra` ones.
macro_rules! feed_resource_state {
    ($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub id: StringValue,
            pub space_id: StringValue,
            pub name: StringValue,
            pub feed_uri: StringValue,
            pub username: StringValue,
            pub password: StringValue,
            pub package_acquisition_location_options: StringList,
            $(pub $field: $ty,)*
        }

        impl HasFeedCommon for $name {
            fn common(&self) -> FeedCommon {
                FeedCommon {
                    id: self.id.clone(),
                    space_id: self.space_id.clone(),
                    name: self.name.clone(),
                    feed_uri: self.feed_uri.clone(),
                    username: self.username.clone(),
                    password: self.password.clone(),
                    package_acquisition_location_options: self
                        .package_acquisition_location_options
                        .clone(),
                }
            }

            fn set_common(&mut self, common: FeedCommon) {
                self.id = common.id;
                self.space_id = common.space_id;
                self.name = common.name;
                self.feed_uri = common.feed_uri;
                self.username = common.username;
                self.password = common.password;
                self.package_acquisition_location_options =
                    common.package_acquisition_location_options;
            }

            fn id(&self) -> &StringValue {
                &self.id
            }

            fn space_id(&self) -> &StringValue {
                &self.space_id
            }

            fn space_id_mut(&mut self) -> &mut StringValue {
                &mut self.space_id
            }
        }
    };
}

pub trait HasFeedCommon {
    fn common(&self) -> FeedCommon;
    fn set_common(&mut self, common: FeedCommon);
    fn id(&self) -> &StringValue;
    fn space_id(&self) -> &StringValue;
    fn space_id_mut(&mut self) -> &mut StringValue;
}

/// A feed kind: its wire type, Terraform name and kind-specific attributes.
pub trait FeedKind:
    HasFeedCommon
    + Serialize
    + DeserializeOwned
    + Clone
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
{
    const FEED_TYPE: FeedType;
    const TYPE_NAME: &'static str;
    const DISPLAY_NAME: &'static str;

    fn extra_attributes(_attributes: &mut Attributes) {}

    /// Writes kind-specific attributes onto the request body.
    fn apply(&self, _feed: &mut Feed) {}

    /// Reads kind-specific attributes from the server's copy.
    fn read(&mut self, _feed: &Feed) {}

    fn plan_extra(&mut self, _config: &Self, _prior: Option<&Self>) {}

    fn validate_extra(&self, _diags: &mut Diagnostics) {}
}

fn common_attributes(display_name: &str) -> Attributes {
    use AttributeConstraint::{Optional, OptionalComputed, Required};

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id(display_name));
    attributes.insert("name".into(), schema::name(display_name));
    attributes.insert(
        "feed_uri".into(),
        schema::string(Required, format!("The URI of this {display_name}.")),
    );
    attributes.insert(
        "username".into(),
        schema::sensitive(schema::string(
            Optional,
            "The username associated with this resource.",
        )),
    );
    attributes.insert(
        "password".into(),
        schema::sensitive(schema::string(
            Optional,
            "The password associated with this resource.",
        )),
    );
    attributes.insert(
        "package_acquisition_location_options".into(),
        schema::string_list(
            OptionalComputed,
            "Where packages from this feed are acquired: `Server`, `ExecutionTarget` or `NotAcquired`.",
        ),
    );
    attributes
}

fn download_retry_attributes(attributes: &mut Attributes) {
    attributes.insert(
        "download_attempts".into(),
        schema::number(
            AttributeConstraint::OptionalComputed,
            "The number of times a deployment should attempt to download a package from this feed before failing.",
        ),
    );
    attributes.insert(
        "download_retry_backoff_seconds".into(),
        schema::number(
            AttributeConstraint::OptionalComputed,
            "The number of seconds to apply as a linear back off between download attempts.",
        ),
    );
}

fn apply_download_retry(feed: &mut Feed, attempts: &NumberValue, backoff: &NumberValue) {
    feed.download_attempts = known(attempts).copied();
    feed.download_retry_backoff_seconds = known(backoff).copied();
}

fn read_download_retry(feed: &Feed, attempts: &mut NumberValue, backoff: &mut NumberValue) {
    *attempts = NumberValue::Value(feed.download_attempts.unwrap_or_default());
    *backoff = NumberValue::Value(feed.download_retry_backoff_seconds.unwrap_or_default());
}

fn validate_download_retry(diags: &mut Diagnostics, attempts: &NumberValue, backoff: &NumberValue) {
    validators::at_least(diags, AttributePath::new("download_attempts"), attempts, 0);
    validators::at_least(
        diags,
        AttributePath::new("download_retry_backoff_seconds"),
        backoff,
        0,
    );
}

feed_resource_state!(NugetFeedState {
    download_attempts: NumberValue,
    download_retry_backoff_seconds: NumberValue,
    is_enhanced_mode: BoolValue,
});

impl FeedKind for NugetFeedState {
    const FEED_TYPE: FeedType = FeedType::NuGet;
    const TYPE_NAME: &'static str = "octopusdeploy_nuget_feed";
    const DISPLAY_NAME: &'static str = "NuGet feed";

    fn extra_attributes(attributes: &mut Attributes) {
        download_retry_attributes(attributes);
        attributes.insert(
            "is_enhanced_mode".into(),
            schema::boolean(
                AttributeConstraint::OptionalComputed,
                "Whether this feed uses the enhanced NuGet protocol. Defaults to `false`.",
            ),
        );
    }

    fn apply(&self, feed: &mut Feed) {
        apply_download_retry(feed, &self.download_attempts, &self.download_retry_backoff_seconds);
        feed.enhanced_mode = Some(known(&self.is_enhanced_mode).copied().unwrap_or(false));
    }

    fn read(&mut self, feed: &Feed) {
        read_download_retry(
            feed,
            &mut self.download_attempts,
            &mut self.download_retry_backoff_seconds,
        );
        self.is_enhanced_mode = BoolValue::Value(feed.enhanced_mode.unwrap_or(false));
    }

    fn plan_extra(&mut self, config: &Self, prior: Option<&Self>) {
        carry(&mut self.download_attempts, &config.download_attempts, prior.map(|p| &p.download_attempts));
        carry(
            &mut self.download_retry_backoff_seconds,
            &config.download_retry_backoff_seconds,
            prior.map(|p| &p.download_retry_backoff_seconds),
        );
        default_to(&mut self.is_enhanced_mode, &config.is_enhanced_mode, false);
    }

    fn validate_extra(&self, diags: &mut Diagnostics) {
        validate_download_retry(diags, &self.download_attempts, &self.download_retry_backoff_seconds);
    }
}

feed_resource_state!(HelmFeedState {});

impl FeedKind for HelmFeedState {
    const FEED_TYPE: FeedType = FeedType::Helm;
    const TYPE_NAME: &'static str = "octopusdeploy_helm_feed";
    const DISPLAY_NAME: &'static str = "Helm feed";
}

feed_resource_state!(DockerContainerRegistryState {
    api_version: StringValue,
    registry_path: StringValue,
});

impl FeedKind for DockerContainerRegistryState {
    const FEED_TYPE: FeedType = FeedType::Docker;
    const TYPE_NAME: &'static str = "octopusdeploy_docker_container_registry";
    const DISPLAY_NAME: &'static str = "Docker container registry";

    fn extra_attributes(attributes: &mut Attributes) {
        attributes.insert(
            "api_version".into(),
            schema::string(AttributeConstraint::Optional, "The Docker registry API version."),
        );
        attributes.insert(
            "registry_path".into(),
            schema::string(
                AttributeConstraint::Optional,
                "The path of the registry, for registries that are not hosted at the root.",
            ),
        );
    }

    fn apply(&self, feed: &mut Feed) {
        feed.api_version = non_empty(&self.api_version).map(str::to_string);
        feed.registry_path = non_empty(&self.registry_path).map(str::to_string);
    }

    fn read(&mut self, feed: &Feed) {
        self.api_version = kept_optional(feed.api_version.as_deref(), &self.api_version);
        self.registry_path = kept_optional(feed.registry_path.as_deref(), &self.registry_path);
    }
}

/// Server value when set; otherwise whatever the state already had, so unset stays null.
fn kept_optional(server: Option<&str>, current: &StringValue) -> StringValue {
    match server.filter(|value| !value.is_empty()) {
        Some(value) => StringValue::Value(value.to_string()),
        None => match current {
            StringValue::Value(_) => StringValue::Value(String::new()),
            _ => StringValue::Null,
        },
    }
}

feed_resource_state!(MavenFeedState {
    download_attempts: NumberValue,
    download_retry_backoff_seconds: NumberValue,
});

impl FeedKind for MavenFeedState {
    const FEED_TYPE: FeedType = FeedType::Maven;
    const TYPE_NAME: &'static str = "octopusdeploy_maven_feed";
    const DISPLAY_NAME: &'static str = "Maven feed";

    fn extra_attributes(attributes: &mut Attributes) {
        download_retry_attributes(attributes);
    }

    fn apply(&self, feed: &mut Feed) {
        apply_download_retry(feed, &self.download_attempts, &self.download_retry_backoff_seconds);
    }

    fn read(&mut self, feed: &Feed) {
        read_download_retry(
            feed,
            &mut self.download_attempts,
            &mut self.download_retry_backoff_seconds,
        );
    }

    fn plan_extra(&mut self, config: &Self, prior: Option<&Self>) {
        carry(&mut self.download_attempts, &config.download_attempts, prior.map(|p| &p.download_attempts));
        carry(
            &mut self.download_retry_backoff_seconds,
            &config.download_retry_backoff_seconds,
            prior.map(|p| &p.download_retry_backoff_seconds),
        );
    }

    fn validate_extra(&self, diags: &mut Diagnostics) {
        validate_download_retry(diags, &self.download_attempts, &self.download_retry_backoff_seconds);
    }
}

feed_resource_state!(GitHubRepositoryFeedState {
    download_attempts: NumberValue,
    download_retry_backoff_seconds: NumberValue,
});

impl FeedKind for GitHubRepositoryFeedState {
    const FEED_TYPE: FeedType = FeedType::GitHub;
    const TYPE_NAME: &'static str = "octopusdeploy_github_repository_feed";
    const DISPLAY_NAME: &'static str = "GitHub repository feed";

    fn extra_attributes(attributes: &mut Attributes) {
        download_retry_attributes(attributes);
    }

    fn apply(&self, feed: &mut Feed) {
        apply_download_retry(feed, &self.download_attempts, &self.download_retry_backoff_seconds);
    }

    fn read(&mut self, feed: &Feed) {
        read_download_retry(
            feed,
            &mut self.download_attempts,
            &mut self.download_retry_backoff_seconds,
        );
    }

    fn plan_extra(&mut self, config: &Self, prior: Option<&Self>) {
        carry(&mut self.download_attempts, &config.download_attempts, prior.map(|p| &p.download_attempts));
        carry(
            &mut self.download_retry_backoff_seconds,
            &config.download_retry_backoff_seconds,
            prior.map(|p| &p.download_retry_backoff_seconds),
        );
    }

    fn validate_extra(&self, diags: &mut Diagnostics) {
        validate_download_retry(diags, &self.download_attempts, &self.download_retry_backoff_seconds);
    }
}

/// Serves a [`FeedKind`] through the generic API resource.
pub struct FeedResource<F>(PhantomData<fn() -> F>);

impl<F: FeedKind> ApiResourceKind for FeedResource<F> {
    type Model = Feed;
    type State = F;

    const TYPE_NAME: &'static str = F::TYPE_NAME;
    const DISPLAY_NAME: &'static str = F::DISPLAY_NAME;

    fn schema() -> Block {
        let mut attributes = common_attributes(F::DISPLAY_NAME);
        F::extra_attributes(&mut attributes);
        schema::block(
            format!("This resource manages a {} in Octopus Deploy.", F::DISPLAY_NAME),
            attributes,
            Default::default(),
        )
    }

    fn id(state: &F) -> &StringValue {
        state.id()
    }

    fn space_id(state: &F) -> &StringValue {
        state.space_id()
    }

    fn space_id_mut(state: &mut F) -> &mut StringValue {
        state.space_id_mut()
    }

    fn to_model(state: &F, _current: Option<&Feed>) -> Result<Feed> {
        Ok(to_feed(state))
    }

    fn to_state(model: &Feed, prior: Option<&F>) -> Result<F> {
        feed_state(model, prior)
    }

    fn plan(planned: &mut F, config: &F, prior: Option<&F>) {
        let mut common = planned.common();
        let config_common = config.common();
        let prior_common = prior.map(HasFeedCommon::common);
        carry(&mut common.id, &config_common.id, prior_common.as_ref().map(|p| &p.id));
        carry(
            &mut common.package_acquisition_location_options,
            &config_common.package_acquisition_location_options,
            prior_common
                .as_ref()
                .map(|p| &p.package_acquisition_location_options),
        );
        planned.set_common(common);
        planned.plan_extra(config, prior);
    }

    fn validate(diags: &mut Diagnostics, config: &F) {
        let common = config.common();
        validators::not_empty(diags, AttributePath::new("name"), &common.name);
        validators::not_empty(diags, AttributePath::new("feed_uri"), &common.feed_uri);
        config.validate_extra(diags);
    }
}
