use crate::config::{Config, LOG_VAR};
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Sends log records to the log file in the data directory if `CALTODO_LOG`
/// is set, filtered by its value.
///
/// The terminal belongs to the UI, so nothing is ever logged to it.
pub(crate) fn init(config: &Config) -> anyhow::Result<()> {
    let Some(directives) = std::env::var_os(LOG_VAR) else {
        return Ok(());
    };
    let directives = directives
        .into_string()
        .map_err(|_| anyhow::anyhow!("{LOG_VAR} is not valid UTF-8"))?;
    let filter = parse_filter(&directives)?;
    fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            config.data_dir.display()
        )
    })?;
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;
    Ok(())
}

fn parse_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .with_context(|| format!("invalid {LOG_VAR} value {directives:?}"))
}
