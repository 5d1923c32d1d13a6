mod agenda;
mod app;
mod calendar;
mod checklist;
mod config;
mod form;
mod help;
mod listing;
mod logging;
mod planner;
mod store;
mod theme;
use crate::app::App;
use crate::calendar::{MonthView, YMD_FMT};
use crate::config::Config;
use crate::planner::Planner;
use crate::store::FileStorage;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::info;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        data_dir: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut data_dir = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('d') | Arg::Long("data-dir") => {
                    data_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { date, data_dir })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { date, data_dir } => {
                // Determined before anything else can spawn a thread, as the
                // local offset may be unobtainable afterwards
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let config = Config::new(data_dir, date)?;
                logging::init(&config)?;
                info!(
                    version = env!("CARGO_PKG_VERSION"),
                    data_dir = %config.data_dir.display(),
                    "starting"
                );
                let planner = Planner::load(FileStorage::new(&config.data_dir))
                    .with_context(|| {
                        format!("failed to load data from {}", config.data_dir.display())
                    })?;
                let month = MonthView::new(today, config.start_date.unwrap_or(today))
                    .context("failed to lay out starting month")?;
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(planner, month).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: caltodo [-d|--data-dir DIR] [YYYY-MM-DD]");
                println!();
                println!("Terminal monthly calendar with per-day events and a todo list");
                println!();
                println!("Options:");
                println!("  -d DIR, --data-dir DIR");
                println!("                    Store events, tasks, and the theme in DIR");
                println!("                    [default: $CALTODO_DATA_DIR, else caltodo/ in the");
                println!("                    platform data directory]");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                println!();
                println!("Set CALTODO_LOG to a tracing filter (e.g. \"debug\") to write a log to");
                println!("caltodo.log in the data directory.");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn test_parse_run() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                date: None,
                data_dir: None
            }
        );
        assert_eq!(
            parse(&["-d", "/tmp/cal", "2025-01-22"]).unwrap(),
            Command::Run {
                date: Some(date!(2025 - 01 - 22)),
                data_dir: Some(PathBuf::from("/tmp/cal")),
            }
        );
        assert_eq!(
            parse(&["--data-dir=/tmp/cal"]).unwrap(),
            Command::Run {
                date: None,
                data_dir: Some(PathBuf::from("/tmp/cal")),
            }
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["2025-01-22", "-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["2025-13-01"]).is_err());
        assert!(parse(&["2025-01-22", "2025-01-23"]).is_err());
        assert!(parse(&["--data-dir"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
