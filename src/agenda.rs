use crate::calendar::long_date;
use crate::listing::Listing;
use crate::store::{Event, Notification};
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use time::Date;

const CURSOR_MARKER: &str = "› ";
const NO_MARKER: &str = "  ";

/// Indentation of an event's description, lining it up with the title
const DESCRIPTION_INDENT: &str = "         ";

/// The events of the selected date, in time order
#[derive(Clone, Copy, Debug)]
pub(crate) struct Agenda<'a> {
    date: Date,
    events: &'a [Event],
    cursor: Option<usize>,
    palette: &'a Palette,
}

impl<'a> Agenda<'a> {
    pub(crate) fn new(date: Date, events: &'a [Event], palette: &'a Palette) -> Self {
        Agenda {
            date,
            events,
            cursor: None,
            palette,
        }
    }

    pub(crate) fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for Agenda<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let mut listing = Listing::new(Line::styled(
            format!("Events for {}", long_date(self.date)),
            palette.title,
        ));
        if self.events.is_empty() {
            listing.push(Line::styled(
                format!("{NO_MARKER}No events for this date"),
                palette.dim,
            ));
        }
        for (i, ev) in self.events.iter().enumerate() {
            let focused = self.cursor == Some(i);
            let (marker, style) = if focused {
                (CURSOR_MARKER, palette.cursor)
            } else {
                (NO_MARKER, palette.base)
            };
            let mut spans = vec![
                Span::styled(marker, palette.base),
                Span::styled(format!("{}  {}", ev.time(), ev.title()), style),
            ];
            if ev.notification() != Notification::None {
                spans.push(Span::styled(
                    format!("  ({})", ev.notification().label()),
                    palette.dim,
                ));
            }
            listing.push(Line::from(spans));
            if let Some(desc) = ev.description() {
                listing.push(Line::styled(
                    format!("{DESCRIPTION_INDENT}{desc}"),
                    palette.dim,
                ));
            }
            if focused {
                listing.focus_last();
            }
        }
        listing.render(area, buf);
    }
}
