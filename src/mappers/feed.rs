use serde::{Deserialize, Serialize};
use tf_provider::value::Value;

use crate::error::{ProviderError, Result};
use crate::model::{Feed, SensitiveValue};
use crate::resources::feeds::{FeedCommon, FeedKind};
use crate::value::{
    BoolValue, NumberValue, StringList, StringValue, expand_list, flatten_list, non_empty,
    optional_string, string, string_or_empty,
};

pub fn to_feed<F: FeedKind>(state: &F) -> Feed {
    let common = state.common();
    let mut feed = Feed {
        id: non_empty(&common.id).map(str::to_string),
        name: string_or_empty(&common.name),
        feed_type: F::FEED_TYPE,
        feed_uri: non_empty(&common.feed_uri).map(str::to_string),
        username: non_empty(&common.username).map(str::to_string),
        password: non_empty(&common.password).map(SensitiveValue::new),
        package_acquisition_location_options: expand_list(&common.package_acquisition_location_options),
        space_id: non_empty(&common.space_id).map(str::to_string),
        ..Default::default()
    };
    state.apply(&mut feed);
    feed
}

/// The password never comes back from the server and is kept from `prior`.
pub fn feed_state<F: FeedKind>(feed: &Feed, prior: Option<&F>) -> Result<F> {
    if feed.feed_type != F::FEED_TYPE {
        return Err(ProviderError::Mapping(format!(
            "feed '{}' is a {} feed, not {}",
            feed.id.as_deref().unwrap_or_default(),
            feed.feed_type.as_str(),
            F::FEED_TYPE.as_str()
        )));
    }

    let prior_common = prior.map(|p| p.common()).unwrap_or_default();
    let username = match feed.username.as_deref().filter(|u| !u.is_empty()) {
        Some(username) => string(username),
        None => prior_common.username.clone(),
    };
    let common = FeedCommon {
        id: string(feed.id.clone().unwrap_or_default()),
        space_id: string(feed.space_id.clone().unwrap_or_default()),
        name: string(feed.name.as_str()),
        feed_uri: string(feed.feed_uri.clone().unwrap_or_default()),
        username,
        password: prior_common.password,
        package_acquisition_location_options: flatten_list(
            feed.package_acquisition_location_options.iter().cloned(),
        ),
    };

    let mut state = prior.cloned().unwrap_or_default();
    state.set_common(common);
    state.read(feed);
    Ok(state)
}

/// One entry of the `feeds` data source list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItemState {
    pub id: StringValue,
    pub space_id: StringValue,
    pub name: StringValue,
    pub feed_type: StringValue,
    pub feed_uri: StringValue,
    pub username: StringValue,
    pub package_acquisition_location_options: StringList,
    pub download_attempts: NumberValue,
    pub download_retry_backoff_seconds: NumberValue,
    pub is_enhanced_mode: BoolValue,
    pub api_version: StringValue,
    pub registry_path: StringValue,
}

pub fn feed_item(feed: &Feed) -> FeedItemState {
    FeedItemState {
        id: optional_string(feed.id.clone()),
        space_id: optional_string(feed.space_id.clone()),
        name: string(feed.name.as_str()),
        feed_type: string(feed.feed_type.as_str()),
        feed_uri: optional_string(feed.feed_uri.clone()),
        username: optional_string(feed.username.clone()),
        package_acquisition_location_options: flatten_list(
            feed.package_acquisition_location_options.iter().cloned(),
        ),
        download_attempts: feed.download_attempts.map_or(Value::Null, Value::Value),
        download_retry_backoff_seconds: feed
            .download_retry_backoff_seconds
            .map_or(Value::Null, Value::Value),
        is_enhanced_mode: feed.enhanced_mode.map_or(Value::Null, Value::Value),
        api_version: optional_string(feed.api_version.clone()),
        registry_path: optional_string(feed.registry_path.clone()),
    }
}
