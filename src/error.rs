use std::io;

use thiserror::Error;
use tf_provider::Diagnostics;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider has not been configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Octopus API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("mapping error: {0}")]
    Mapping(String),

    #[error("unexpected error: {0}")]
    Other(String),
}

impl ProviderError {
    /// True when the API reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Records `err` as a root diagnostic. Always yields `None` so call sites can bail with `?`.
pub fn process_api_error<T>(diags: &mut Diagnostics, err: ProviderError, what: &str) -> Option<T> {
    warn!(error = %err, "unable to {what}");
    diags.root_error(format!("unable to {what}"), err.to_string());
    None
}

/// Read-path error policy: a 404 drops the resource from state, anything else fails the read.
///
/// Returns `Some(None)` when the caller should return `None` from `read`.
pub fn remove_from_state_if_not_found<T>(
    diags: &mut Diagnostics,
    err: ProviderError,
    what: &str,
) -> Option<Option<T>> {
    if err.is_not_found() {
        info!("{what} not found, removing from state");
        diags.root_warning(
            format!("{what} not found, removing from state"),
            "The resource no longer exists on the Octopus server and will be recreated on the next apply.",
        );
        return Some(None);
    }
    process_api_error(diags, err, &format!("read {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> ProviderError {
        ProviderError::Api {
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn only_404_counts_as_not_found() {
        assert!(api(404).is_not_found());
        assert!(!api(500).is_not_found());
        assert!(!ProviderError::Other("x".into()).is_not_found());
    }

    #[test]
    fn not_found_removes_from_state_with_warning() {
        let mut diags = Diagnostics::default();
        let outcome = remove_from_state_if_not_found::<()>(&mut diags, api(404), "environment");
        assert!(matches!(outcome, Some(None)));
        assert!(diags.errors.is_empty());
        assert_eq!(diags.warnings.len(), 1);
    }

    #[test]
    fn other_errors_fail_the_read() {
        let mut diags = Diagnostics::default();
        let outcome = remove_from_state_if_not_found::<()>(&mut diags, api(500), "environment");
        assert!(outcome.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
