use crate::calendar::long_date;
use crate::store::{EventDraft, EventTime, Notification};
use crate::theme::Palette;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
};
use time::Date;

const FORM_WIDTH: u16 = 46;
const FORM_HEIGHT: u16 = 11;
const PROMPT_WIDTH: u16 = 46;
const PROMPT_HEIGHT: u16 = 8;

/// Width of the text area inside a popup
const TEXT_WIDTH: usize = 42;

const MARKER_WIDTH: usize = 3;
const LABEL_WIDTH: usize = 13;
const VALUE_WIDTH: usize = TEXT_WIDTH - MARKER_WIDTH - LABEL_WIDTH;

const ACTIVE_MARKER: &str = " › ";
const INACTIVE_MARKER: &str = "   ";
const TEXT_CURSOR: &str = "_";

/// A bordered, titled box of fixed size centered in the area it is drawn in,
/// with a one-cell margin around the border and none inside it
#[derive(Clone, Copy, Debug)]
pub(crate) struct Popup<'a> {
    pub(crate) title: &'a str,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) style: Style,
}

impl Popup<'_> {
    /*
     * ..................
     * .┌─── Title ────┐.
     * .│text          │.
     * .│text          │.
     * .└──────────────┘.
     * ..................
     */
    pub(crate) fn render(self, text: Text<'_>, area: Rect, buf: &mut Buffer) {
        let [outer_area] = Layout::horizontal([self.width])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([self.height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(self.style).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(self.title)
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        text.render(block_area.inner(Margin::new(1, 1)), buf);
    }
}

/// A single line of free text
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct TextInput {
    value: String,
}

impl TextInput {
    pub(crate) fn new() -> TextInput {
        TextInput::default()
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn push(&mut self, ch: char) {
        self.value.push(ch);
    }

    /// Returns `false` if there was nothing to erase
    pub(crate) fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }

    /// The last `width` characters of the value, so that the end being typed
    /// stays visible
    fn tail(&self, width: usize) -> &str {
        let skip = self.value.chars().count().saturating_sub(width);
        self.value
            .char_indices()
            .nth(skip)
            .map_or("", |(i, _)| &self.value[i..])
    }

    fn spans(&self, width: usize, active: bool, palette: &Palette) -> Vec<Span<'_>> {
        if active {
            vec![
                Span::styled(self.tail(width.saturating_sub(1)), palette.popup),
                Span::styled(TEXT_CURSOR, palette.hint),
            ]
        } else {
            vec![Span::styled(self.value.as_str(), palette.popup)]
        }
    }
}

/// Four digit slots making up an `HH:MM` time, filled left to right
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct TimeInput {
    digits: [Option<u8>; 4],
    pos: usize,
}

impl TimeInput {
    fn new(time: EventTime) -> TimeInput {
        let (hour, minute) = (time.hour(), time.minute());
        TimeInput {
            digits: [
                Some(hour / 10),
                Some(hour % 10),
                Some(minute / 10),
                Some(minute % 10),
            ],
            pos: 4,
        }
    }

    /// Returns `false` if every slot is already filled
    fn push_digit(&mut self, d: u8) -> bool {
        let Some(slot) = self.digits.get_mut(self.pos) else {
            return false;
        };
        *slot = Some(d);
        self.pos += 1;
        true
    }

    fn backspace(&mut self) -> bool {
        let Some(pos) = self.pos.checked_sub(1) else {
            return false;
        };
        if let Some(slot) = self.digits.get_mut(pos) {
            *slot = None;
        }
        self.pos = pos;
        true
    }

    /// Returns `None` if a slot is unfilled or the digits do not make a valid
    /// time of day
    fn value(self) -> Option<EventTime> {
        let [Some(h1), Some(h2), Some(m1), Some(m2)] = self.digits else {
            return None;
        };
        EventTime::from_hm(h1 * 10 + h2, m1 * 10 + m2).ok()
    }

    fn spans(self, palette: &Palette) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (i, (dg, fallback)) in std::iter::zip(self.digits, ["H", "H", "M", "M"]).enumerate() {
            if i == 2 {
                spans.push(Span::styled(":", palette.popup));
            }
            spans.push(match dg {
                Some(d) => Span::styled(d.to_string(), palette.popup),
                None => Span::styled(fallback, palette.unfilled),
            });
        }
        spans
    }
}

impl Default for TimeInput {
    fn default() -> TimeInput {
        TimeInput::new(EventTime::default())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Field {
    #[default]
    Title,
    Time,
    Description,
    Notification,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::Title,
        Field::Time,
        Field::Description,
        Field::Notification,
    ];

    fn next(self) -> Field {
        match self {
            Field::Title => Field::Time,
            Field::Time => Field::Description,
            Field::Description => Field::Notification,
            Field::Notification => Field::Title,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Title => Field::Notification,
            Field::Time => Field::Title,
            Field::Description => Field::Time,
            Field::Notification => Field::Description,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Time => "Time",
            Field::Description => "Description",
            Field::Notification => "Notification",
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventFormState {
    title: TextInput,
    time: TimeInput,
    description: TextInput,
    notification: Notification,
    field: Field,
}

impl EventFormState {
    pub(crate) fn new() -> EventFormState {
        EventFormState::default()
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        let accepted = match (input, self.field) {
            (FormInput::Cancel, _) => return FormOutput::Cancel,
            (FormInput::Submit, _) => return self.submit(),
            (FormInput::NextField, _) => {
                self.field = self.field.next();
                true
            }
            (FormInput::PreviousField, _) => {
                self.field = self.field.previous();
                true
            }
            (FormInput::Left, Field::Notification) => {
                self.notification = self.notification.previous();
                true
            }
            (FormInput::Right, Field::Notification) => {
                self.notification = self.notification.next();
                true
            }
            (FormInput::Backspace, Field::Title) => self.title.backspace(),
            (FormInput::Backspace, Field::Description) => self.description.backspace(),
            (FormInput::Backspace, Field::Time) => self.time.backspace(),
            (FormInput::Char(ch), Field::Title) => {
                self.title.push(ch);
                true
            }
            (FormInput::Char(ch), Field::Description) => {
                self.description.push(ch);
                true
            }
            (FormInput::Char(ch), Field::Time) => ch
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .is_some_and(|d| self.time.push_digit(d)),
            _ => false,
        };
        if accepted {
            FormOutput::Ok
        } else {
            FormOutput::Invalid
        }
    }

    fn submit(&self) -> FormOutput {
        let Some(time) = self.time.value() else {
            return FormOutput::Invalid;
        };
        if self.title.value().trim().is_empty() {
            return FormOutput::Invalid;
        }
        FormOutput::Submit(EventDraft {
            title: self.title.value().to_owned(),
            time,
            description: self.description.value().to_owned(),
            notification: self.notification,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Cancel,
    Submit,
    NextField,
    PreviousField,
    Left,
    Right,
    Backspace,
    Char(char),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    Cancel,
    Submit(EventDraft),
}

/// Popup for entering a new event on a given date
#[derive(Clone, Copy, Debug)]
pub(crate) struct EventForm<'a> {
    state: &'a EventFormState,
    date: Date,
    palette: &'a Palette,
}

impl<'a> EventForm<'a> {
    pub(crate) fn new(state: &'a EventFormState, date: Date, palette: &'a Palette) -> Self {
        EventForm {
            state,
            date,
            palette,
        }
    }

    fn to_text(self) -> Text<'a> {
        let mut lines = vec![Line::default()];
        lines.extend(Field::ALL.into_iter().map(|field| self.field_line(field)));
        lines.push(Line::default());
        lines.push(Line::styled(" Enter: save   Esc: cancel", self.palette.hint));
        Text::from(lines)
    }

    fn field_line(self, field: Field) -> Line<'a> {
        let active = field == self.state.field;
        let (marker, label_style) = if active {
            (ACTIVE_MARKER, self.palette.title)
        } else {
            (INACTIVE_MARKER, self.palette.popup)
        };
        let mut spans = vec![
            Span::styled(marker, self.palette.popup),
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
        ];
        match field {
            Field::Title => spans.extend(self.state.title.spans(VALUE_WIDTH, active, self.palette)),
            Field::Time => spans.extend(self.state.time.spans(self.palette)),
            Field::Description => {
                spans.extend(
                    self.state
                        .description
                        .spans(VALUE_WIDTH, active, self.palette),
                );
            }
            Field::Notification => spans.push(Span::styled(
                format!("‹ {} ›", self.state.notification.label()),
                self.palette.popup,
            )),
        }
        Line::from(spans)
    }
}

impl Widget for EventForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" New event: {} ", long_date(self.date));
        Popup {
            title: &title,
            width: FORM_WIDTH,
            height: FORM_HEIGHT,
            style: self.palette.popup,
        }
        .render(self.to_text(), area, buf);
    }
}

/// Popup for entering the text of a new todo
#[derive(Clone, Copy, Debug)]
pub(crate) struct TodoPrompt<'a> {
    input: &'a TextInput,
    palette: &'a Palette,
}

impl<'a> TodoPrompt<'a> {
    pub(crate) fn new(input: &'a TextInput, palette: &'a Palette) -> Self {
        TodoPrompt { input, palette }
    }
}

impl Widget for TodoPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut entry = vec![Span::styled(ACTIVE_MARKER, self.palette.popup)];
        entry.extend(
            self.input
                .spans(TEXT_WIDTH - MARKER_WIDTH, true, self.palette),
        );
        let text = Text::from(vec![
            Line::default(),
            Line::from(entry),
            Line::default(),
            Line::styled(" Enter: add   Esc: cancel", self.palette.hint),
        ]);
        Popup {
            title: " New task ",
            width: PROMPT_WIDTH,
            height: PROMPT_HEIGHT,
            style: self.palette.popup,
        }
        .render(text, area, buf);
    }
}
