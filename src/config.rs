use std::env;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProviderError, Result};

pub const ENV_ADDRESS: &str = "OCTOPUS_URL";
pub const ENV_API_KEY: &str = "OCTOPUS_APIKEY";
pub const ENV_ACCESS_TOKEN: &str = "OCTOPUS_ACCESS_TOKEN";
pub const ENV_SPACE_ID: &str = "OCTOPUS_SPACE_ID";
pub const ENV_REDIRECTION_ENABLED: &str = "REDIRECTION_SERVICE_ENABLED";
pub const ENV_REDIRECTION_API_KEY: &str = "REDIRECTION_SERVICE_API_KEY";

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command line of the plugin binary. Terraform starts it without arguments.
#[derive(Debug, Parser)]
#[command(
    name = "terraform-provider-octopusdeploy",
    version,
    about = "Terraform provider for Octopus Deploy.",
    long_about = "Started by Terraform as a plugin process. Logs go to stderr (or --log-file) since stdout carries the plugin handshake."
)]
pub struct CliArgs {
    /// Log filter directive (e.g. debug, terraform_provider_octopusdeploy=trace).
    #[arg(long, env = "TF_LOG_PROVIDER_OCTOPUSDEPLOY")]
    pub log_level: Option<String>,

    /// Log output format (text|json).
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Name the provider registers under.
    #[arg(long, default_value = "octopusdeploy")]
    pub provider_name: String,
}

/// How the client authenticates against the Octopus server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    AccessToken(String),
}

/// Extra headers for servers reached through the redirection service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub upstream_host: String,
    pub api_key: String,
}

/// Connection settings resolved from the provider block and the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub address: Url,
    pub credentials: Credentials,
    pub space_id: Option<String>,
    pub redirection: Option<Redirection>,
}

/// Values given in the `provider "octopusdeploy"` block. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub address: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub space_id: Option<String>,
}

impl ClientConfig {
    pub fn from_env_and_settings(settings: ProviderSettings) -> Result<Self> {
        Self::resolve(settings, |key| env::var(key).ok())
    }

    /// Resolves settings, falling back to `lookup` for anything the provider block leaves unset.
    pub fn resolve<F>(settings: ProviderSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |given: Option<String>, key: &str| {
            given
                .filter(|value| !value.is_empty())
                .or_else(|| lookup(key).filter(|value| !value.is_empty()))
        };

        let raw_address = pick(settings.address, ENV_ADDRESS).ok_or_else(|| {
            ProviderError::Config(format!(
                "the Octopus server address is required; set `address` or {ENV_ADDRESS}"
            ))
        })?;
        let address = Url::parse(&raw_address)?;
        if address.cannot_be_a_base() {
            return Err(ProviderError::Config(format!(
                "address '{raw_address}' is not an absolute http(s) URL"
            )));
        }

        let credentials = match (
            pick(settings.api_key, ENV_API_KEY),
            pick(settings.access_token, ENV_ACCESS_TOKEN),
        ) {
            (Some(api_key), _) => Credentials::ApiKey(api_key),
            (None, Some(token)) => Credentials::AccessToken(token),
            (None, None) => {
                return Err(ProviderError::Config(
                    "either an APIKey or an AccessToken is required to connect to the Octopus Server instance"
                        .to_string(),
                ));
            }
        };

        let redirection = redirection_for(&address, &lookup)?;

        Ok(Self {
            address,
            credentials,
            space_id: pick(settings.space_id, ENV_SPACE_ID),
            redirection,
        })
    }
}

fn redirection_for<F>(address: &Url, lookup: &F) -> Result<Option<Redirection>>
where
    F: Fn(&str) -> Option<String>,
{
    if lookup(ENV_REDIRECTION_ENABLED).as_deref() != Some("true") {
        return Ok(None);
    }
    let host = address.host_str().unwrap_or_default();
    if is_directly_accessible(host) {
        return Ok(None);
    }
    let api_key = lookup(ENV_REDIRECTION_API_KEY).ok_or_else(|| {
        ProviderError::Config(format!("{ENV_REDIRECTION_API_KEY} is required"))
    })?;
    Ok(Some(Redirection {
        upstream_host: host.to_string(),
        api_key,
    }))
}

fn is_directly_accessible(host: &str) -> bool {
    host.ends_with(".octopus.app")
        || host.ends_with(".testoctopus.com")
        || host == "localhost"
        || host == "127.0.0.1"
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_fills_unset_settings() {
        let cfg = ClientConfig::resolve(
            ProviderSettings::default(),
            env_of(&[
                (ENV_ADDRESS, "https://octo.example.com"),
                (ENV_API_KEY, "API-123"),
                (ENV_SPACE_ID, "Spaces-2"),
            ]),
        )
        .expect("config");
        assert_eq!(cfg.address.as_str(), "https://octo.example.com/");
        assert_eq!(cfg.credentials, Credentials::ApiKey("API-123".into()));
        assert_eq!(cfg.space_id.as_deref(), Some("Spaces-2"));
        assert!(cfg.redirection.is_none());
    }

    #[test]
    fn provider_block_wins_over_env() {
        let settings = ProviderSettings {
            address: Some("https://block.example.com".into()),
            space_id: Some(String::new()),
            ..Default::default()
        };
        let cfg = ClientConfig::resolve(
            settings,
            env_of(&[
                (ENV_ADDRESS, "https://env.example.com"),
                (ENV_ACCESS_TOKEN, "token"),
            ]),
        )
        .expect("config");
        assert_eq!(cfg.address.host_str(), Some("block.example.com"));
        assert_eq!(cfg.credentials, Credentials::AccessToken("token".into()));
        assert_eq!(cfg.space_id, None);
    }

    #[test]
    fn api_key_beats_access_token() {
        let settings = ProviderSettings {
            address: Some("https://octo.example.com".into()),
            api_key: Some("API-1".into()),
            access_token: Some("token".into()),
            ..Default::default()
        };
        let cfg = ClientConfig::resolve(settings, env_of(&[])).expect("config");
        assert_eq!(cfg.credentials, Credentials::ApiKey("API-1".into()));
    }

    #[test]
    fn missing_credentials_is_an_error() {
        let err = ClientConfig::resolve(
            ProviderSettings::default(),
            env_of(&[(ENV_ADDRESS, "https://octo.example.com")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("either an APIKey or an AccessToken"));
    }

    #[test]
    fn redirection_headers_only_for_remote_hosts() {
        let env = [
            (ENV_ADDRESS, "https://octo.internal.corp:8443"),
            (ENV_API_KEY, "API-1"),
            (ENV_REDIRECTION_ENABLED, "true"),
            (ENV_REDIRECTION_API_KEY, "redirect-key"),
        ];
        let cfg = ClientConfig::resolve(ProviderSettings::default(), env_of(&env)).expect("config");
        assert_eq!(
            cfg.redirection,
            Some(Redirection {
                upstream_host: "octo.internal.corp".into(),
                api_key: "redirect-key".into(),
            })
        );

        for direct in [
            "https://acme.octopus.app",
            "https://x.testoctopus.com",
            "http://localhost:8080",
            "http://127.0.0.1",
        ] {
            let settings = ProviderSettings {
                address: Some(direct.into()),
                ..Default::default()
            };
            let cfg = ClientConfig::resolve(settings, env_of(&env)).expect("config");
            assert!(cfg.redirection.is_none(), "{direct} should be reached directly");
        }
    }

    #[test]
    fn redirection_requires_its_api_key() {
        let err = ClientConfig::resolve(
            ProviderSettings::default(),
            env_of(&[
                (ENV_ADDRESS, "https://octo.internal.corp"),
                (ENV_API_KEY, "API-1"),
                (ENV_REDIRECTION_ENABLED, "true"),
            ]),
        )
        .unwrap_err();
        assert!(err.to_string().contains(ENV_REDIRECTION_API_KEY));
    }

    #[test]
    fn cli_defaults_match_plugin_launch() {
        let cli = CliArgs::parse_from(["terraform-provider-octopusdeploy"]);
        assert_eq!(cli.provider_name, "octopusdeploy");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn cli_accepts_json_logging() {
        let cli = CliArgs::parse_from([
            "terraform-provider-octopusdeploy",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
