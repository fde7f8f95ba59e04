#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod mappers;
pub mod model;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod telemetry;
pub mod validators;
pub mod value;

pub use client::{OctopusClient, Query};
pub use config::{CliArgs, ClientConfig, LogFormat};
pub use error::{ProviderError, Result};
pub use provider::{ClientHandle, OctopusProvider, PROVIDER_NAME};
