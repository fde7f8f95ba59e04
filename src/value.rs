use std::collections::BTreeMap;

use tf_provider::value::Value;

pub type StringValue = Value<String>;
pub type BoolValue = Value<bool>;
pub type NumberValue = Value<i64>;
pub type StringList = Value<Vec<Value<String>>>;
pub type StringMap = Value<BTreeMap<String, Value<String>>>;
/// Nested list or set block.
pub type Blocks<T> = Value<Vec<Value<T>>>;

pub fn known<T>(value: &Value<T>) -> Option<&T> {
    match value {
        Value::Value(inner) => Some(inner),
        Value::Null | Value::Unknown => None,
    }
}

pub fn string_or_empty(value: &StringValue) -> String {
    known(value).cloned().unwrap_or_default()
}

/// Known, non-empty string.
pub fn non_empty(value: &StringValue) -> Option<&str> {
    known(value).map(String::as_str).filter(|s| !s.is_empty())
}

pub fn bool_or(value: &BoolValue, default: bool) -> bool {
    known(value).copied().unwrap_or(default)
}

pub fn string(value: impl Into<String>) -> StringValue {
    Value::Value(value.into())
}

/// `None` becomes null.
pub fn optional_string(value: Option<String>) -> StringValue {
    value.map_or(Value::Null, Value::Value)
}

/// Known elements of a string list; null, unknown and null elements are dropped.
pub fn expand_list(list: &StringList) -> Vec<String> {
    known(list)
        .map(|items| items.iter().filter_map(known).cloned().collect())
        .unwrap_or_default()
}

pub fn flatten_list<I, S>(items: I) -> StringList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Value(items.into_iter().map(|item| Value::Value(item.into())).collect())
}

/// Like [`flatten_list`], but an empty input becomes null.
pub fn flatten_list_or_null<I, S>(items: I) -> StringList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match flatten_list(items) {
        Value::Value(items) if items.is_empty() => Value::Null,
        list => list,
    }
}

pub fn expand_map(map: &StringMap) -> BTreeMap<String, String> {
    known(map)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, value)| known(value).map(|v| (key.clone(), v.clone())))
                .collect()
        })
        .unwrap_or_default()
}

/// Empty maps become null.
pub fn flatten_map_or_null(map: BTreeMap<String, String>) -> StringMap {
    if map.is_empty() {
        Value::Null
    } else {
        Value::Value(map.into_iter().map(|(k, v)| (k, Value::Value(v))).collect())
    }
}

/// Known elements of a nested block list.
pub fn blocks<T>(blocks: &Blocks<T>) -> impl Iterator<Item = &T> {
    known(blocks).into_iter().flatten().filter_map(known)
}

pub fn first_block<T>(list: &Blocks<T>) -> Option<&T> {
    blocks(list).next()
}

pub fn block_list<T>(items: impl IntoIterator<Item = T>) -> Blocks<T> {
    Value::Value(items.into_iter().map(Value::Value).collect())
}

/// Mutable access to the known elements of a nested block list.
pub fn blocks_mut<T>(list: &mut Blocks<T>) -> impl Iterator<Item = &mut T> {
    let items = match list {
        Value::Value(items) => Some(items),
        Value::Null | Value::Unknown => None,
    };
    items.into_iter().flatten().filter_map(|item| match item {
        Value::Value(inner) => Some(inner),
        Value::Null | Value::Unknown => None,
    })
}

/// `"True"`/`"False"`, the spelling Octopus uses in property bags.
pub fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
