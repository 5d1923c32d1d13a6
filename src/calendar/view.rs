use super::grid::MonthGrid;
use super::util::add_months;
use super::OutOfTimeError;
use time::{Date, Duration};

/// The displayed month together with the selected date and today.  The
/// selected date may sit in the leading or trailing days of the grid without
/// changing the displayed month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthView {
    today: Date,
    selected: Date,
    grid: MonthGrid,
}

impl MonthView {
    pub(crate) fn new(today: Date, selected: Date) -> Result<MonthView, OutOfTimeError> {
        let grid = MonthGrid::for_month(selected)?;
        Ok(MonthView {
            today,
            selected,
            grid,
        })
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    /// Moves the today marker, as when the session runs past midnight.  The
    /// selection and the displayed month stay where they are.
    pub(crate) fn set_today(&mut self, today: Date) {
        self.today = today;
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(super) fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub(crate) fn reference_month(&self) -> Date {
        self.grid.month_start()
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_months(1)
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_months(-1)
    }

    fn shift_months(&mut self, months: i32) -> Result<(), OutOfTimeError> {
        let start = add_months(self.grid.month_start(), months).ok_or(OutOfTimeError)?;
        self.grid = MonthGrid::for_month(start)?;
        Ok(())
    }

    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let date = self
            .selected
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.select(date)
    }

    pub(crate) fn select(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        if !self.grid.contains(date) {
            self.grid = MonthGrid::for_month(date)?;
        }
        self.selected = date;
        Ok(())
    }

    pub(crate) fn jump_to_today(&mut self) -> Result<(), OutOfTimeError> {
        self.grid = MonthGrid::for_month(self.today)?;
        self.selected = self.today;
        Ok(())
    }
}
