use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::Widget,
};
use std::iter::once;

/// Lines taken up by the heading and the blank line under it
const HEADING_LINES: u16 = 2;

/// A heading over a list of lines.  If the lines do not all fit, the list is
/// scrolled just far enough for the focused line to be shown.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Listing<'a> {
    heading: Line<'a>,
    body: Vec<Line<'a>>,
    focus: Option<usize>,
}

impl<'a> Listing<'a> {
    pub(crate) fn new(heading: Line<'a>) -> Self {
        Listing {
            heading,
            body: Vec::new(),
            focus: None,
        }
    }

    pub(crate) fn push(&mut self, line: Line<'a>) {
        self.body.push(line);
    }

    /// Marks the most recently pushed line as the one to keep in view
    pub(crate) fn focus_last(&mut self) {
        self.focus = self.body.len().checked_sub(1);
    }
}

impl Widget for Listing<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = usize::from(area.height.saturating_sub(HEADING_LINES));
        let skip = self
            .focus
            .map_or(0, |f| (f + 1).saturating_sub(visible));
        Text::from_iter(
            once(self.heading)
                .chain(once(Line::default()))
                .chain(self.body.into_iter().skip(skip)),
        )
        .render(area, buf);
    }
}
