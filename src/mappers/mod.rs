use std::collections::BTreeMap;

use tf_provider::value::Value;

use crate::model::Properties;
use crate::value::{StringMap, flatten_map_or_null};

pub mod actions;
pub mod deployment_process;
pub mod environment;
pub mod feed;
pub mod lifecycle;
pub mod project;
pub mod project_group;
pub mod tenant;

/// Plain entries of a property bag. Sensitive values never reach state.
pub fn plain_properties(properties: &Properties) -> BTreeMap<String, String> {
    properties
        .iter()
        .filter_map(|(key, value)| value.as_plain().map(|v| (key.clone(), v.to_string())))
        .collect()
}

/// State for an optional+computed property map.
///
/// When prior state already tracks a known map, only those keys are reported
/// so server-side additions do not show up as drift. Otherwise every entry is
/// reported and an empty map becomes null.
pub fn properties_state(api: BTreeMap<String, String>, prior: Option<&StringMap>) -> StringMap {
    match prior {
        Some(Value::Value(tracked)) => Value::Value(
            api.into_iter()
                .filter(|(key, _)| tracked.contains_key(key))
                .map(|(key, value)| (key, Value::Value(value)))
                .collect(),
        ),
        _ => flatten_map_or_null(api),
    }
}

/// Whether an optional single block is read back into state.
///
/// The block appears when the server reports its settings and prior state
/// either had the block or there is no prior state (import).
pub fn keep_optional_block<T>(present: bool, prior: Option<&Value<T>>) -> bool {
    present && prior.is_none_or(|block| !matches!(block, Value::Null))
}

#[cfg(test)]
mod tests {
    use crate::model::PropertyValue;
    use crate::model::SensitiveValue;

    use super::*;

    #[test]
    fn sensitive_properties_are_dropped() {
        let mut properties = Properties::new();
        properties.insert("Plain".into(), PropertyValue::from("value"));
        properties.insert(
            "Secret".into(),
            PropertyValue::Sensitive(SensitiveValue::new("hunter2")),
        );
        let plain = plain_properties(&properties);
        assert_eq!(plain.len(), 1);
        assert_eq!(plain["Plain"], "value");
    }

    #[test]
    fn tracked_keys_limit_reported_properties() {
        let api = BTreeMap::from([
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ]);
        let prior: StringMap = Value::Value(BTreeMap::from([("A".to_string(), Value::Value("0".to_string()))]));

        let Value::Value(state) = properties_state(api.clone(), Some(&prior)) else {
            panic!("known map expected");
        };
        assert_eq!(state.len(), 1);
        assert_eq!(state["A"], Value::Value("1".to_string()));

        let Value::Value(all) = properties_state(api, Some(&Value::Unknown)) else {
            panic!("known map expected");
        };
        assert_eq!(all.len(), 2);
        assert!(matches!(properties_state(BTreeMap::new(), None), Value::Null));
    }

    #[test]
    fn optional_blocks_follow_prior_state() {
        let absent: Value<()> = Value::Null;
        let present = Value::Value(());
        assert!(keep_optional_block(true, None::<&Value<()>>));
        assert!(keep_optional_block(true, Some(&present)));
        assert!(!keep_optional_block(true, Some(&absent)));
        assert!(!keep_optional_block(false, Some(&present)));
    }
}
