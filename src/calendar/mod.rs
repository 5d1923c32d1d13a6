mod grid;
mod util;
mod view;
mod widget;
pub(crate) use self::util::{long_date, YMD_FMT};
pub(crate) use self::view::MonthView;
pub(crate) use self::widget::{Calendar, HEIGHT as CALENDAR_HEIGHT, MAIN_WIDTH as CALENDAR_WIDTH};
use thiserror::Error;
use time::Date;

/// Tells the calendar which days to mark as having events
pub(crate) trait EventLookup {
    fn has_events(&self, date: Date) -> bool;
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
