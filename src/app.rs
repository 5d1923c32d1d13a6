use crate::agenda::Agenda;
use crate::calendar::{Calendar, MonthView, CALENDAR_HEIGHT, CALENDAR_WIDTH};
use crate::checklist::Checklist;
use crate::form::{EventForm, EventFormState, FormInput, FormOutput, TextInput, TodoPrompt};
use crate::help::Help;
use crate::planner::Planner;
use crate::store::{Event, Storage, StoreError, Todo, TodoId};
use crate::theme::Palette;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use time::OffsetDateTime;
use tracing::error;

/// Lines taken up by the tab bar and the rule under it
const TABS_HEIGHT: u16 = 2;

const HINT: &str = " ?: help   Tab: switch view   t: theme   q: quit";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S> {
    planner: Planner<S>,
    month: MonthView,
    tab: Tab,
    state: AppState,
    event_cursor: usize,
    todo_cursor: usize,
    status: Option<String>,
}

impl<S: Storage> App<S> {
    pub(crate) fn new(planner: Planner<S>, month: MonthView) -> App<S> {
        App {
            planner,
            month,
            tab: Tab::Calendar,
            state: AppState::Browsing,
            event_cursor: 0,
            todo_cursor: 0,
            status: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        self.refresh_today();
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    /// Refreshes today's date on every terminal event so that the today
    /// marker follows the clock across midnight
    fn refresh_today(&mut self) {
        if let Ok(now) = OffsetDateTime::now_local() {
            self.month.set_today(now.date());
        }
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        self.status = None;
        match &mut self.state {
            AppState::Browsing => self.handle_browse_key(key),
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::AddingEvent(form) => {
                let input = match key {
                    KeyCode::Esc => FormInput::Cancel,
                    KeyCode::Enter => FormInput::Submit,
                    KeyCode::Tab | KeyCode::Down => FormInput::NextField,
                    KeyCode::BackTab | KeyCode::Up => FormInput::PreviousField,
                    KeyCode::Left => FormInput::Left,
                    KeyCode::Right => FormInput::Right,
                    KeyCode::Backspace => FormInput::Backspace,
                    KeyCode::Char(ch) => FormInput::Char(ch),
                    _ => return false,
                };
                match form.handle_input(input) {
                    FormOutput::Ok => true,
                    FormOutput::Invalid => false,
                    FormOutput::Cancel => {
                        self.state = AppState::Browsing;
                        true
                    }
                    FormOutput::Submit(draft) => {
                        self.state = AppState::Browsing;
                        let date = self.month.selected();
                        match self.planner.add_event(date, &draft) {
                            Ok(Some(id)) => {
                                self.event_cursor = self
                                    .planner
                                    .events()
                                    .on(date)
                                    .iter()
                                    .position(|ev| ev.id() == id)
                                    .unwrap_or_default();
                            }
                            Ok(None) => (),
                            Err(e) => self.report(e),
                        }
                        true
                    }
                }
            }
            AppState::AddingTodo(input) => match key {
                KeyCode::Esc => {
                    self.state = AppState::Browsing;
                    true
                }
                KeyCode::Enter => {
                    if input.value().trim().is_empty() {
                        return false;
                    }
                    let r = self.planner.add_todo(input.value());
                    self.state = AppState::Browsing;
                    self.todo_cursor = self.planner.todos().len().saturating_sub(1);
                    if let Err(e) = r {
                        self.report(e);
                    }
                    true
                }
                KeyCode::Backspace => input.backspace(),
                KeyCode::Char(ch) => {
                    input.push(ch);
                    true
                }
                _ => false,
            },
            AppState::Quitting => false,
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Tab => {
                self.tab = self.tab.other();
                true
            }
            KeyCode::Char('t') => {
                if let Err(e) = self.planner.toggle_theme() {
                    self.report(e);
                }
                true
            }
            KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state = AppState::Quitting;
                true
            }
            _ => match self.tab {
                Tab::Calendar => self.handle_calendar_key(key),
                Tab::Todos => self.handle_todo_key(key),
            },
        }
    }

    fn handle_calendar_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
            KeyCode::Char('p') | KeyCode::PageUp => self.month.previous_month().is_ok(),
            KeyCode::Char('n') | KeyCode::PageDown => self.month.next_month().is_ok(),
            KeyCode::Char('0') | KeyCode::Home => {
                self.event_cursor = 0;
                self.month.jump_to_today().is_ok()
            }
            KeyCode::Char('a') => {
                self.state = AppState::AddingEvent(EventFormState::new());
                true
            }
            KeyCode::Char('J') => {
                let len = self.selected_events().len();
                step(&mut self.event_cursor, len, true)
            }
            KeyCode::Char('K') => {
                let len = self.selected_events().len();
                step(&mut self.event_cursor, len, false)
            }
            KeyCode::Char('d') | KeyCode::Delete => self.delete_event(),
            _ => false,
        }
    }

    fn handle_todo_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                step(&mut self.todo_cursor, self.planner.todos().len(), true)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                step(&mut self.todo_cursor, self.planner.todos().len(), false)
            }
            KeyCode::Char('a') => {
                self.state = AppState::AddingTodo(TextInput::new());
                true
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_todo(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_todo(),
            _ => false,
        }
    }

    fn move_selection(&mut self, days: i64) -> bool {
        if self.month.move_selection(days).is_ok() {
            self.event_cursor = 0;
            true
        } else {
            false
        }
    }

    fn delete_event(&mut self) -> bool {
        let date = self.month.selected();
        let Some(id) = self
            .event_cursor()
            .and_then(|i| self.selected_events().get(i))
            .map(Event::id)
        else {
            return false;
        };
        if let Err(e) = self.planner.delete_event(date, id) {
            self.report(e);
        }
        true
    }

    fn toggle_todo(&mut self) -> bool {
        let Some(id) = self.selected_todo() else {
            return false;
        };
        if let Err(e) = self.planner.toggle_todo(id) {
            self.report(e);
        }
        true
    }

    fn delete_todo(&mut self) -> bool {
        let Some(id) = self.selected_todo() else {
            return false;
        };
        if let Err(e) = self.planner.delete_todo(id) {
            self.report(e);
        }
        true
    }

    fn selected_todo(&self) -> Option<TodoId> {
        self.todo_cursor()
            .and_then(|i| self.planner.todos().get(i))
            .map(Todo::id)
    }

    /// Logs a failed write and shows it in the status line.  The change that
    /// failed to be written stays in effect.
    fn report(&mut self, e: StoreError) {
        let msg = format!("{:#}", anyhow::Error::new(e));
        error!("{msg}");
        self.status = Some(msg);
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<S> App<S> {
    fn selected_events(&self) -> &[Event] {
        self.planner.events().on(self.month.selected())
    }

    fn event_cursor(&self) -> Option<usize> {
        clamp_cursor(self.event_cursor, self.selected_events().len())
    }

    fn todo_cursor(&self) -> Option<usize> {
        clamp_cursor(self.todo_cursor, self.planner.todos().len())
    }

    fn render_tabs(&self, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let [tabs_area, rule_area] = Layout::vertical([Constraint::Length(1); 2]).areas(area);
        let tab_span = |tab: Tab| {
            let style = if tab == self.tab {
                palette.tab_active
            } else {
                palette.tab_inactive
            };
            Span::styled(tab.title(), style)
        };
        Line::from(vec![
            Span::raw(" "),
            tab_span(Tab::Calendar),
            Span::raw("   "),
            tab_span(Tab::Todos),
        ])
        .render(tabs_area, buf);
        Line::styled(format!("{} theme ", self.planner.theme()), palette.hint)
            .right_aligned()
            .render(tabs_area, buf);
        Line::styled("─".repeat(usize::from(rule_area.width)), palette.rule)
            .render(rule_area, buf);
    }
}

impl<S> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.planner.theme().palette();
        buf.set_style(area, palette.base);
        let [tabs_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(TABS_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_tabs(tabs_area, buf, palette);
        let [body_area] = Layout::horizontal([CALENDAR_WIDTH])
            .flex(Flex::Center)
            .areas(body_area);
        match self.tab {
            Tab::Calendar => {
                let [cal_area, _, agenda_area] = Layout::vertical([
                    Constraint::Length(CALENDAR_HEIGHT),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(body_area);
                Calendar::new(&self.month, self.planner.events(), palette).render(cal_area, buf);
                Agenda::new(self.month.selected(), self.selected_events(), palette)
                    .cursor(self.event_cursor())
                    .render(agenda_area, buf);
            }
            Tab::Todos => Checklist::new(self.planner.todos(), palette)
                .cursor(self.todo_cursor())
                .render(body_area, buf),
        }
        match &self.status {
            Some(msg) => Line::styled(format!(" {msg}"), palette.error),
            None => Line::styled(HINT, palette.hint),
        }
        .render(status_area, buf);
        match &self.state {
            AppState::Helping => Help(palette).render(area, buf),
            AppState::AddingEvent(form) => {
                EventForm::new(form, self.month.selected(), palette).render(area, buf);
            }
            AppState::AddingTodo(input) => TodoPrompt::new(input, palette).render(area, buf),
            AppState::Browsing | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tab {
    Calendar,
    Todos,
}

impl Tab {
    fn other(self) -> Tab {
        match self {
            Tab::Calendar => Tab::Todos,
            Tab::Todos => Tab::Calendar,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Calendar => "Calendar",
            Tab::Todos => "Todo List",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    AddingEvent(EventFormState),
    AddingTodo(TextInput),
    Quitting,
}

fn clamp_cursor(cursor: usize, len: usize) -> Option<usize> {
    len.checked_sub(1).map(|last| cursor.min(last))
}

/// Moves a list cursor one entry forwards or backwards, returning `false` if
/// it is already at that end of the list
fn step(cursor: &mut usize, len: usize, forwards: bool) -> bool {
    let Some(current) = clamp_cursor(*cursor, len) else {
        return false;
    };
    let next = if forwards {
        Some(current + 1).filter(|&c| c < len)
    } else {
        current.checked_sub(1)
    };
    match next {
        Some(c) => {
            *cursor = c;
            true
        }
        None => false,
    }
}
