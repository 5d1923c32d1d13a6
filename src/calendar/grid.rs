use super::util::{
    first_of_month, iter_days_after, iter_days_before, last_of_month, WeekdayExt, DAYS_IN_WEEK,
};
use super::{EventLookup, OutOfTimeError};
use std::iter::successors;
use std::slice::Chunks;
use time::Date;

/// Number of weeks shown for every month, whatever its length
pub(crate) const GRID_WEEKS: u16 = 6;

pub(crate) const GRID_CELLS: usize = 42;

/// A month laid out as six Sunday-first weeks: the tail of the previous
/// month, the whole month, then the head of the next month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month_start: Date,
    cells: [Date; GRID_CELLS],
}

impl MonthGrid {
    pub(crate) fn for_month(reference: Date) -> Result<MonthGrid, OutOfTimeError> {
        let month_start = first_of_month(reference);
        let month_end = last_of_month(reference);
        let start_day = usize::from(month_start.weekday().index0());
        let mut dates = Vec::with_capacity(GRID_CELLS);
        dates.extend(iter_days_before(month_start).take(start_day));
        dates.reverse();
        dates.extend(successors(Some(month_start), |&d| {
            d.next_day().filter(|&n| n <= month_end)
        }));
        let remaining = GRID_CELLS - dates.len();
        dates.extend(iter_days_after(month_end).take(remaining));
        // Falls short only when the grid would run past `Date::MIN` or
        // `Date::MAX`
        let cells = <[Date; GRID_CELLS]>::try_from(dates).map_err(|_| OutOfTimeError)?;
        Ok(MonthGrid { month_start, cells })
    }

    pub(crate) fn month_start(&self) -> Date {
        self.month_start
    }

    pub(crate) fn dates(&self) -> &[Date; GRID_CELLS] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> Chunks<'_, Date> {
        self.dates().chunks(DAYS_IN_WEEK)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.cells[0] <= date && date <= self.cells[GRID_CELLS - 1]
    }

    pub(crate) fn in_month(&self, date: Date) -> bool {
        date.year() == self.month_start.year() && date.month() == self.month_start.month()
    }

    pub(crate) fn classify<E: EventLookup + ?Sized>(
        &self,
        date: Date,
        today: Date,
        selected: Date,
        events: &E,
    ) -> CellFlags {
        CellFlags {
            in_month: self.in_month(date),
            is_today: date == today,
            is_selected: date == selected,
            has_events: events.has_events(date),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct CellFlags {
    pub(crate) in_month: bool,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
    pub(crate) has_events: bool,
}
