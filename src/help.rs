use crate::form::Popup;
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::Widget,
};

static TEXT: &[&str] = &[
    "Tab               Switch between calendar and tasks",
    "t                 Toggle dark/light theme",
    "?                 Show this help",
    "q, ESC            Quit",
    "",
    "Calendar:",
    "h, l, LEFT/RIGHT  Previous/next day",
    "k, j, UP/DOWN     Previous/next week",
    "p, n, PAGE UP/DN  Previous/next month",
    "0, HOME           Jump to today",
    "a                 Add an event",
    "K, J              Move between events",
    "d, DELETE         Delete the event",
    "",
    "Tasks:",
    "k, j, UP/DOWN     Move between tasks",
    "a                 Add a task",
    "SPACE, ENTER      Mark done/not done",
    "d, DELETE         Delete the task",
    "",
    "Press the Any Key to dismiss.",
];

#[derive(Copy, Clone, Debug)]
pub(crate) struct Help<'a>(pub(crate) &'a Palette);

impl Widget for Help<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from(TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>())
            .style(self.0.popup);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        Popup {
            title: " Commands ",
            width,
            height,
            style: self.0.popup,
        }
        .render(text, area, buf);
    }
}
