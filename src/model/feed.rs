use serde::{Deserialize, Serialize};

use super::{OctopusResource, SensitiveValue};

/// Feed type as the server reports it. Types without a dedicated resource are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FeedType {
    AwsElasticContainerRegistry,
    #[default]
    BuiltIn,
    Docker,
    GitHub,
    Helm,
    Maven,
    NuGet,
    OctopusProject,
    #[serde(untagged)]
    Other(String),
}

impl FeedType {
    /// Types the `feeds` data source accepts as a filter.
    pub const ALL: [FeedType; 8] = [
        FeedType::AwsElasticContainerRegistry,
        FeedType::BuiltIn,
        FeedType::Docker,
        FeedType::GitHub,
        FeedType::Helm,
        FeedType::Maven,
        FeedType::NuGet,
        FeedType::OctopusProject,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FeedType::AwsElasticContainerRegistry => "AwsElasticContainerRegistry",
            FeedType::BuiltIn => "BuiltIn",
            FeedType::Docker => "Docker",
            FeedType::GitHub => "GitHub",
            FeedType::Helm => "Helm",
            FeedType::Maven => "Maven",
            FeedType::NuGet => "NuGet",
            FeedType::OctopusProject => "OctopusProject",
            FeedType::Other(name) => name,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub feed_type: FeedType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SensitiveValue>,
    #[serde(default)]
    pub package_acquisition_location_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_attempts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_retry_backoff_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

impl OctopusResource for Feed {
    const COLLECTION: &'static str = "feeds";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resources;

    #[test]
    fn feed_type_names_round_trip_through_parse() {
        for kind in FeedType::ALL {
            assert_eq!(FeedType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FeedType::parse("nuget"), None);
    }

    #[test]
    fn wire_name_matches_server() {
        let json = serde_json::to_value(FeedType::GitHub).expect("encode");
        assert_eq!(json, serde_json::json!("GitHub"));
    }

    #[test]
    fn unlisted_types_keep_their_server_name() {
        let kind: FeedType = serde_json::from_value(serde_json::json!("OciRegistry")).expect("decode");
        assert_eq!(kind, FeedType::Other("OciRegistry".into()));
        assert_eq!(kind.as_str(), "OciRegistry");
        assert_eq!(serde_json::to_value(&kind).expect("encode"), serde_json::json!("OciRegistry"));
        assert_eq!(FeedType::parse("OciRegistry"), None);
    }

    #[test]
    fn page_with_unlisted_feed_types_decodes() {
        let page: Resources<Feed> = serde_json::from_str(
            r#"{
                "Items": [
                    { "Id": "Feeds-1", "Name": "nuget.org", "FeedType": "NuGet" },
                    { "Id": "Feeds-2", "Name": "GHCR", "FeedType": "OciRegistry" },
                    { "Id": "Feeds-3", "Name": "Artifacts", "FeedType": "S3" }
                ],
                "TotalResults": 3
            }"#,
        )
        .expect("decode page");
        assert_eq!(page.items[0].feed_type, FeedType::NuGet);
        assert_eq!(page.items[1].feed_type.as_str(), "OciRegistry");
        assert_eq!(page.items[2].feed_type, FeedType::Other("S3".into()));
    }
}
