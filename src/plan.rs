use tf_provider::value::Value;

pub fn is_null<T>(value: &Value<T>) -> bool {
    matches!(value, Value::Null)
}

/// Uses `default` when the configuration leaves the attribute unset.
pub fn default_to<T>(planned: &mut Value<T>, config: &Value<T>, default: T) {
    if is_null(config) {
        *planned = Value::Value(default);
    }
}

/// Computed attribute: keeps the prior value when there is one, otherwise unknown until apply.
pub fn carry<T: Clone>(planned: &mut Value<T>, config: &Value<T>, prior: Option<&Value<T>>) {
    if is_null(config) {
        *planned = match prior {
            Some(value) if !matches!(value, Value::Unknown) => value.clone(),
            _ => Value::Unknown,
        };
    }
}

/// Unknown when unset in configuration.
pub fn unknown_if_null<T>(planned: &mut Value<T>, config: &Value<T>) {
    if is_null(config) {
        *planned = Value::Unknown;
    }
}

/// Marks the attribute unknown when the configuration leaves it unset and `changed` holds.
pub fn recompute_if<T>(planned: &mut Value<T>, config: &Value<T>, changed: bool) {
    if changed && is_null(config) {
        *planned = Value::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_only_when_unset() {
        let mut planned = Value::Null;
        default_to(&mut planned, &Value::Null, "Success".to_string());
        assert_eq!(planned, Value::Value("Success".to_string()));

        let config = Value::Value("Always".to_string());
        let mut planned = config.clone();
        default_to(&mut planned, &config, "Success".to_string());
        assert_eq!(planned, config);
    }

    #[test]
    fn carry_prefers_prior_then_unknown() {
        let mut planned: Value<String> = Value::Null;
        carry(&mut planned, &Value::Null, Some(&Value::Value("Actions-1".into())));
        assert_eq!(planned, Value::Value("Actions-1".into()));

        let mut planned: Value<String> = Value::Null;
        carry(&mut planned, &Value::Null, None);
        assert!(matches!(planned, Value::Unknown));

        let mut planned: Value<String> = Value::Null;
        carry(&mut planned, &Value::Null, Some(&Value::Null));
        assert!(is_null(&planned));
    }

    #[test]
    fn recompute_leaves_configured_values() {
        let config = Value::Value(1_i64);
        let mut planned = config.clone();
        recompute_if(&mut planned, &config, true);
        assert_eq!(planned, config);

        let mut planned = Value::Value(1_i64);
        recompute_if(&mut planned, &Value::Null, true);
        assert!(matches!(planned, Value::Unknown));
    }
}
