use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{CliArgs, LogFormat};
use crate::error::{ProviderError, Result};

const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    pub level: Option<String>,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl From<&CliArgs> for LogSettings {
    fn from(cli: &CliArgs) -> Self {
        Self {
            level: cli.log_level.clone(),
            format: cli.log_format,
            file: cli.log_file.clone(),
        }
    }
}

/// Installs the global subscriber. Never writes to stdout.
pub fn init(settings: &LogSettings) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::try_new(filter_directive(
        settings.level.as_deref(),
        rust_log.as_deref(),
    ))
    .map_err(|err| ProviderError::Config(format!("invalid log filter: {err}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    let installed = match (&settings.file, settings.format) {
        (Some(path), LogFormat::Json) => builder
            .json()
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        (Some(path), LogFormat::Text) => builder
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        (None, LogFormat::Json) => builder.json().with_writer(std::io::stderr).try_init(),
        (None, LogFormat::Text) => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|err| ProviderError::Other(format!("logging already initialised: {err}")))
}

/// Picks the filter directive: explicit level, then `RUST_LOG`, then `info`.
///
/// Terraform passes plain level names (`TRACE`, `DEBUG`, ...) and sometimes `JSON`; anything that
/// is neither a level nor a `target=level` directive falls through to the next source.
pub fn filter_directive(level: Option<&str>, rust_log: Option<&str>) -> String {
    [level, rust_log]
        .into_iter()
        .flatten()
        .find_map(usable_directive)
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

fn usable_directive(candidate: &str) -> Option<String> {
    let lowered = candidate.trim().to_lowercase();
    let is_level = matches!(
        lowered.as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    );
    let is_directive = lowered.contains('=') && EnvFilter::try_new(&lowered).is_ok();
    (is_level || is_directive).then_some(lowered)
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
