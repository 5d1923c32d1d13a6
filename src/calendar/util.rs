use std::iter::successors;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Month, Weekday,
};

pub(crate) static YMD_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

pub(crate) fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub(crate) fn last_of_month(date: Date) -> Date {
    successors(Some(date), |&d| d.next_day().filter(|n| n.month() == date.month()))
        .last()
        .unwrap_or(date)
}

/// Shifts `date` by `months` calendar months, clamping the day to the length
/// of the target month (so January 31 plus one month is the last day of
/// February).  Returns `None` outside the representable range.
pub(crate) fn add_months(date: Date, months: i32) -> Option<Date> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::from(u8::from(date.month())) - 1)?
        .checked_add(months)?;
    let month = u8::try_from(index.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month).ok()?;
    let first = Date::from_calendar_date(index.div_euclid(12), month, 1).ok()?;
    let day = date.day().min(last_of_month(first).day());
    first.replace_day(day).ok()
}

/// Renders a date as e.g. "22 January 2025"
pub(crate) fn long_date(date: Date) -> String {
    format!("{:02} {} {}", date.day(), date.month(), date.year())
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

pub(crate) fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_of_month(date!(2024 - 02 - 17)), date!(2024 - 02 - 01));
        assert_eq!(last_of_month(date!(2024 - 02 - 17)), date!(2024 - 02 - 29));
        assert_eq!(last_of_month(date!(2023 - 02 - 01)), date!(2023 - 02 - 28));
        assert_eq!(last_of_month(date!(2023 - 12 - 31)), date!(2023 - 12 - 31));
        assert_eq!(first_of_month(date!(2023 - 12 - 01)), date!(2023 - 12 - 01));
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(date!(2025 - 01 - 22), 1), Some(date!(2025 - 02 - 22)));
        assert_eq!(add_months(date!(2025 - 01 - 31), 1), Some(date!(2025 - 02 - 28)));
        assert_eq!(add_months(date!(2024 - 03 - 31), -1), Some(date!(2024 - 02 - 29)));
        assert_eq!(add_months(date!(2024 - 12 - 15), 1), Some(date!(2025 - 01 - 15)));
        assert_eq!(add_months(date!(2025 - 01 - 15), -1), Some(date!(2024 - 12 - 15)));
        assert_eq!(add_months(date!(2025 - 01 - 15), -25), Some(date!(2022 - 12 - 15)));
        assert_eq!(add_months(Date::MAX, 1), None);
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date(date!(2025 - 01 - 05)), "05 January 2025");
        assert_eq!(long_date(date!(2026 - 10 - 19)), "19 October 2026");
    }

    #[test]
    fn test_iter_days() {
        let after = iter_days_after(date!(2024 - 02 - 28)).take(2).collect::<Vec<_>>();
        assert_eq!(after, [date!(2024 - 02 - 29), date!(2024 - 03 - 01)]);
        let before = iter_days_before(date!(2025 - 01 - 01)).take(2).collect::<Vec<_>>();
        assert_eq!(before, [date!(2024 - 12 - 31), date!(2024 - 12 - 30)]);
        assert_eq!(iter_days_after(Date::MAX).next(), None);
    }
}
