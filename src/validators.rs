use std::collections::HashSet;

use tf_provider::{AttributePath, Diagnostics};

use tf_provider::value::Value;

use crate::value::{NumberValue, StringValue};

/// Rejects a known empty string.
pub fn not_empty(diags: &mut Diagnostics, path: AttributePath, value: &StringValue) {
    if let Value::Value(text) = value {
        if text.trim().is_empty() {
            diags.error_short("must not be empty", path);
        }
    }
}

/// Accepts only one of `allowed`.
pub fn one_of(
    diags: &mut Diagnostics,
    path: AttributePath,
    value: &StringValue,
    allowed: &[&str],
    ignore_case: bool,
) {
    let Value::Value(text) = value else {
        return;
    };
    let accepted = allowed.iter().any(|candidate| {
        if ignore_case {
            candidate.eq_ignore_ascii_case(text)
        } else {
            candidate == text
        }
    });
    if !accepted {
        diags.error(
            format!("unsupported value \"{text}\""),
            format!("Expected one of: {}.", allowed.join(", ")),
            path,
        );
    }
}

pub fn at_least(diags: &mut Diagnostics, path: AttributePath, value: &NumberValue, minimum: i64) {
    if let Value::Value(number) = value {
        if *number < minimum {
            diags.error_short(format!("must be at least {minimum}, got {number}"), path);
        }
    }
}

/// Reports every name that appears more than once. `names` pairs each name with its path.
pub fn unique_names<'a>(
    diags: &mut Diagnostics,
    what: &str,
    names: impl IntoIterator<Item = (&'a str, AttributePath)>,
) {
    let mut seen = HashSet::new();
    for (name, path) in names {
        if !seen.insert(name) {
            diags.error(
                format!("duplicate {what} name \"{name}\""),
                format!("Each {what} must have a unique name."),
                path,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    #[test]
    fn one_of_can_ignore_case() {
        let mut diags = Diagnostics::default();
        let allowed = ["development", "production"];
        one_of(&mut diags, AttributePath::new("t"), &string("Production"), &allowed, true);
        assert!(diags.errors.is_empty());

        one_of(&mut diags, AttributePath::new("t"), &string("Production"), &allowed, false);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn unknown_values_pass() {
        let mut diags = Diagnostics::default();
        one_of(&mut diags, AttributePath::new("t"), &Value::Unknown, &["a"], false);
        not_empty(&mut diags, AttributePath::new("name"), &Value::Unknown);
        at_least(&mut diags, AttributePath::new("n"), &Value::Unknown, 1);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn empty_strings_and_small_numbers_fail() {
        let mut diags = Diagnostics::default();
        not_empty(&mut diags, AttributePath::new("name"), &string("  "));
        at_least(&mut diags, AttributePath::new("n"), &Value::Value(0), 1);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn duplicates_are_reported_once_per_repeat() {
        let mut diags = Diagnostics::default();
        unique_names(
            &mut diags,
            "step",
            [
                ("a", AttributePath::new("step").index(0)),
                ("b", AttributePath::new("step").index(1)),
                ("a", AttributePath::new("step").index(2)),
            ],
        );
        assert_eq!(diags.errors.len(), 1);
    }
}
