use super::grid::{CellFlags, GRID_WEEKS};
use super::util::WeekdayExt;
use super::view::MonthView;
use super::EventLookup;
use crate::theme::Palette;
use ratatui::{layout::Flex, prelude::*, widgets::*};
use time::Date;

static HEADER: &str = " Su     Mo     Tu     We     Th     Fr     Sa ";

/// Width of the calendar in columns: seven days plus the event marker drawn
/// after Saturday
pub(crate) const MAIN_WIDTH: u16 = 47;

/// Number of lines taken up by the month title, the weekday header, and the
/// header's rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Column of the event marker relative to the left edge of its day
const MARKER_OFFSET: u16 = 4;

/// Number of lines needed to draw a full month
pub(crate) const HEIGHT: u16 = HEADER_LINES + WEEK_LINES * GRID_WEEKS;

const ACS_HLINE: char = '─';
const EVENT_MARKER: &str = "•";

#[derive(Clone, Copy, Debug)]
pub(crate) struct Calendar<'a, E> {
    view: &'a MonthView,
    events: &'a E,
    palette: &'a Palette,
}

impl<'a, E: EventLookup> Calendar<'a, E> {
    pub(crate) fn new(view: &'a MonthView, events: &'a E, palette: &'a Palette) -> Self {
        Calendar {
            view,
            events,
            palette,
        }
    }
}

impl<E: EventLookup> Widget for Calendar<'_, E> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let grid = self.view.grid();
        let mut canvas = BufferCanvas::new(area, buf, self.palette);
        canvas.draw_title(grid.month_start());
        canvas.draw_header();
        for (i, week) in std::iter::zip(0u16.., grid.weeks()) {
            for &date in week {
                let flags =
                    grid.classify(date, self.view.today(), self.view.selected(), self.events);
                canvas.draw_day(i, date, flags);
            }
        }
    }
}

#[derive(Debug)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    palette: &'a Palette,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer, palette: &'a Palette) -> Self {
        Self { area, buf, palette }
    }

    fn draw_title(&mut self, month_start: Date) {
        let title = format!("‹ {} {} ›", month_start.month(), month_start.year());
        let width = u16::try_from(Text::raw(title.as_str()).width()).unwrap_or(u16::MAX);
        let x = self.area.width.saturating_sub(width) / 2;
        self.mvprint(0, x, title, self.palette.title);
    }

    fn draw_header(&mut self) {
        self.mvprint(1, 0, HEADER, self.palette.weekday);
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, date: Date, flags: CellFlags) {
        let y = week_no * WEEK_LINES + HEADER_LINES;
        let x = DAY_WIDTH * date.weekday().index0();
        let mut style = if flags.in_month {
            self.palette.base
        } else {
            self.palette.other_month
        };
        if flags.is_today {
            style = style.patch(self.palette.today);
        }
        let s = if flags.is_selected {
            style = style.patch(self.palette.selected);
            format!("[{:2}]", date.day())
        } else {
            format!(" {:2} ", date.day())
        };
        self.mvprint(y, x, s, style);
        if flags.has_events {
            self.mvprint(y, x + MARKER_OFFSET, EVENT_MARKER, self.palette.event_marker);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        let style = self.palette.rule;
        self.mvprint(y, x, String::from(ch).repeat(length.into()), style);
    }
}
