use serde::{Deserialize, Serialize};
use tf_provider::{AttributePath, Diagnostics};
use tf_provider::schema::{AttributeConstraint, Block};
use tf_provider::value::Value;

use super::{ListKind, QueryState, item_list};
use crate::client::Query;
use crate::mappers::feed::{FeedItemState, feed_item};
use crate::model::{Feed, FeedType};
use crate::schema::{self, Attributes};
use crate::validators;
use crate::value::{Blocks, StringValue, non_empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedsState {
    #[serde(flatten)]
    pub query: QueryState,
    pub feed_type: StringValue,
    pub name: StringValue,
    pub feeds: Blocks<FeedItemState>,
}

fn item_attributes() -> Attributes {
    use AttributeConstraint::Computed;

    let mut attributes = Attributes::new();
    attributes.insert("id".into(), schema::id());
    attributes.insert("space_id".into(), schema::space_id("feed"));
    attributes.insert("name".into(), schema::name("feed"));
    attributes.insert("feed_type".into(), schema::string(Computed, "The type of this feed."));
    attributes.insert("feed_uri".into(), schema::string(Computed, "The URI of this feed."));
    attributes.insert(
        "username".into(),
        schema::sensitive(schema::string(Computed, "The username associated with this feed.")),
    );
    attributes.insert(
        "package_acquisition_location_options".into(),
        schema::string_list(Computed, "Where packages from this feed are acquired."),
    );
    attributes.insert(
        "download_attempts".into(),
        schema::number(Computed, "The number of download attempts before failing."),
    );
    attributes.insert(
        "download_retry_backoff_seconds".into(),
        schema::number(Computed, "The linear back off between download attempts."),
    );
    attributes.insert(
        "is_enhanced_mode".into(),
        schema::boolean(Computed, "Whether a NuGet feed uses enhanced mode."),
    );
    attributes.insert(
        "api_version".into(),
        schema::string(Computed, "The API version of a Docker registry."),
    );
    attributes.insert(
        "registry_path".into(),
        schema::string(Computed, "The registry path of a Docker registry."),
    );
    attributes
}

pub struct FeedsKind;

impl ListKind for FeedsKind {
    type Model = Feed;
    type State = FeedsState;

    const TYPE_NAME: &'static str = "octopusdeploy_feeds";
    const DISPLAY_NAME: &'static str = "feeds";

    fn schema() -> Block {
        let kinds = FeedType::ALL.map(|kind| format!("`{}`", kind.as_str())).join(", ");
        let mut attributes = schema::query_attributes("feeds");
        attributes.insert(
            "feed_type".into(),
            schema::string(
                AttributeConstraint::Optional,
                format!("A filter to search by feed type. Valid feed types are {kinds}."),
            ),
        );
        attributes.insert(
            "name".into(),
            schema::string(AttributeConstraint::Optional, "A filter to search by feed name."),
        );
        attributes.insert(
            "feeds".into(),
            item_list("A list of feeds that match the filter(s).", &item_attributes()),
        );
        schema::block("Provides information about existing feeds.", attributes, Default::default())
    }

    fn query(state: &FeedsState) -> &QueryState {
        &state.query
    }

    fn query_mut(state: &mut FeedsState) -> &mut QueryState {
        &mut state.query
    }

    fn extend_query(state: &FeedsState, mut query: Query) -> Query {
        if let Some(feed_type) = non_empty(&state.feed_type) {
            query = query.with("feedType", feed_type);
        }
        if let Some(name) = non_empty(&state.name) {
            query = query.with("name", name);
        }
        query
    }

    fn keep(state: &FeedsState, feed: &Feed) -> bool {
        non_empty(&state.feed_type).is_none_or(|kind| feed.feed_type.as_str() == kind)
    }

    fn set_items(state: &mut FeedsState, items: &[Feed]) {
        state.feeds = Value::Value(items.iter().map(|feed| Value::Value(feed_item(feed))).collect());
    }

    fn validate_extra(diags: &mut Diagnostics, config: &FeedsState) {
        let known = FeedType::ALL;
        let kinds = known.each_ref().map(FeedType::as_str);
        validators::one_of(diags, AttributePath::new("feed_type"), &config.feed_type, &kinds, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    #[test]
    fn feed_type_must_be_known() {
        let mut diags = Diagnostics::default();
        let config = FeedsState {
            feed_type: string("Npm"),
            ..Default::default()
        };
        FeedsKind::validate_extra(&mut diags, &config);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn filters_are_forwarded() {
        let state = FeedsState {
            feed_type: string("NuGet"),
            name: string("nuget.org"),
            ..Default::default()
        };
        let pairs = FeedsKind::extend_query(&state, Query::default()).pairs();
        assert!(pairs.contains(&("feedType", "NuGet".to_string())));
        assert!(pairs.contains(&("name", "nuget.org".to_string())));

        let helm = Feed {
            feed_type: FeedType::Helm,
            ..Default::default()
        };
        assert!(!FeedsKind::keep(&state, &helm));
    }

    #[test]
    fn unlisted_feed_types_are_listed_verbatim() {
        let oci = Feed {
            id: Some("Feeds-7".into()),
            name: "GHCR".into(),
            feed_type: FeedType::Other("OciRegistry".into()),
            ..Default::default()
        };
        assert!(FeedsKind::keep(&FeedsState::default(), &oci));

        let mut state = FeedsState::default();
        FeedsKind::set_items(&mut state, &[oci]);
        let items: Vec<_> = crate::value::blocks(&state.feeds).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].feed_type, string("OciRegistry"));
    }

    #[test]
    fn item_fields_match_item_schema() {
        let fields = serde_json::to_value(FeedItemState::default()).expect("encode");
        let fields = fields.as_object().expect("object");
        let attributes = item_attributes();
        assert_eq!(fields.len(), attributes.len());
        assert!(attributes.keys().all(|key| fields.contains_key(key)));
    }
}
