use crate::listing::Listing;
use crate::store::TodoList;
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Checklist<'a> {
    todos: &'a TodoList,
    cursor: Option<usize>,
    palette: &'a Palette,
}

impl<'a> Checklist<'a> {
    pub(crate) fn new(todos: &'a TodoList, palette: &'a Palette) -> Self {
        Checklist {
            todos,
            cursor: None,
            palette,
        }
    }

    pub(crate) fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for Checklist<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let mut listing = Listing::new(Line::styled(
            format!(
                "Tasks ({}/{} done)",
                self.todos.completed_count(),
                self.todos.len()
            ),
            palette.title,
        ));
        if self.todos.is_empty() {
            listing.push(Line::styled("  No tasks yet", palette.dim));
        }
        for (i, todo) in self.todos.iter().enumerate() {
            let focused = self.cursor == Some(i);
            let (checkbox, mut style) = if todo.completed() {
                ("[x] ", palette.done)
            } else {
                ("[ ] ", palette.base)
            };
            if focused {
                style = style.patch(palette.cursor);
            }
            listing.push(Line::from(vec![
                Span::styled(if focused { "› " } else { "  " }, palette.base),
                Span::styled(checkbox, style),
                Span::styled(todo.text(), style),
            ]));
            if focused {
                listing.focus_last();
            }
        }
        listing.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Todo, TodoId};
    use crate::theme::Theme;
    use ratatui::style::Modifier;
    use time::macros::datetime;

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        buf.content
            .chunks(usize::from(buf.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn test_render_todos() {
        let mut todos = TodoList::default();
        for (id, text) in [(1_i64, "Buy milk"), (2, "Call Bob"), (3, "Pay rent")] {
            let todo = Todo::new(TodoId::from(id), text, datetime!(2025-01-22 08:00 UTC));
            todos.push(todo.unwrap());
        }
        todos.toggle(TodoId::from(2_i64));
        let palette = Theme::Dark.palette();
        let area = Rect::new(0, 0, 24, 6);
        let mut buffer = Buffer::empty(area);
        Checklist::new(&todos, palette)
            .cursor(Some(2))
            .render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "Tasks (1/3 done)        ",
                "                        ",
                "  [ ] Buy milk          ",
                "  [x] Call Bob          ",
                "› [ ] Pay rent          ",
                "                        ",
            ]
        );
        assert!(buffer[(6, 3)].modifier.contains(Modifier::CROSSED_OUT));
        assert!(!buffer[(6, 2)].modifier.contains(Modifier::CROSSED_OUT));
        assert!(buffer[(6, 4)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_render_empty() {
        let todos = TodoList::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buffer = Buffer::empty(area);
        Checklist::new(&todos, Theme::Light.palette()).render(area, &mut buffer);
        assert_eq!(
            buffer_lines(&buffer),
            [
                "Tasks (0/0 done)    ",
                "                    ",
                "  No tasks yet      ",
            ]
        );
    }
}
