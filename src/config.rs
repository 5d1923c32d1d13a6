use anyhow::Context;
use std::ffi::OsString;
use std::path::PathBuf;
use time::Date;

pub(crate) const DATA_DIR_VAR: &str = "CALTODO_DATA_DIR";
pub(crate) const LOG_VAR: &str = "CALTODO_LOG";

const APP_DIR: &str = "caltodo";
const LOG_FILE: &str = "caltodo.log";

/// Settings for a run of the program, gathered from the command line and the
/// environment
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Config {
    /// Directory holding one JSON file per stored collection
    pub(crate) data_dir: PathBuf,

    /// Date to select at startup instead of today
    pub(crate) start_date: Option<Date>,
}

impl Config {
    pub(crate) fn new(data_dir: Option<PathBuf>, start_date: Option<Date>) -> anyhow::Result<Config> {
        let data_dir = resolve_data_dir(data_dir, std::env::var_os(DATA_DIR_VAR), dirs::data_dir())
            .with_context(|| {
                format!("could not determine data directory; pass --data-dir or set {DATA_DIR_VAR}")
            })?;
        Ok(Config {
            data_dir,
            start_date,
        })
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// The directory given on the command line, else the one named by the
/// environment, else a `caltodo` directory in the platform's data directory
fn resolve_data_dir(
    cli: Option<PathBuf>,
    env: Option<OsString>,
    platform: Option<PathBuf>,
) -> Option<PathBuf> {
    cli.or_else(|| env.filter(|s| !s.is_empty()).map(PathBuf::from))
        .or_else(|| platform.map(|p| p.join(APP_DIR)))
}
