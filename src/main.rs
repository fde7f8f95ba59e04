use anyhow::Context;
use clap::Parser;
use tracing::info;

use terraform_provider_octopusdeploy::{
    OctopusProvider,
    config::CliArgs,
    telemetry::{self, LogSettings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    telemetry::init(&LogSettings::from(&cli)).context("failed to initialise logging")?;

    info!(
        name = %cli.provider_name,
        version = env!("CARGO_PKG_VERSION"),
        "starting provider"
    );
    tf_provider::serve(&cli.provider_name, OctopusProvider::new())
        .await
        .map_err(|err| anyhow::anyhow!("provider server failed: {err}"))
}
