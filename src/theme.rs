use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub(crate) fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub(crate) fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = InvalidTheme;

    fn from_str(s: &str) -> Result<Theme, InvalidTheme> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(InvalidTheme(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown theme {0:?}")]
pub(crate) struct InvalidTheme(String);

/// The styles every widget draws with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Palette {
    pub(crate) base: Style,
    pub(crate) title: Style,
    pub(crate) weekday: Style,
    pub(crate) rule: Style,
    pub(crate) other_month: Style,
    pub(crate) today: Style,
    pub(crate) selected: Style,
    pub(crate) event_marker: Style,
    pub(crate) tab_active: Style,
    pub(crate) tab_inactive: Style,
    pub(crate) cursor: Style,
    pub(crate) done: Style,
    pub(crate) dim: Style,
    pub(crate) hint: Style,
    pub(crate) error: Style,
    pub(crate) unfilled: Style,
    pub(crate) popup: Style,
}

const DARK_BASE: Style = Style::new().fg(Color::White).bg(Color::Black);

static DARK: Palette = Palette {
    base: DARK_BASE,
    title: DARK_BASE.add_modifier(Modifier::BOLD),
    weekday: DARK_BASE.add_modifier(Modifier::BOLD),
    rule: DARK_BASE,
    other_month: DARK_BASE.fg(Color::DarkGray),
    today: Style::new()
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD),
    selected: Style::new().add_modifier(Modifier::REVERSED),
    event_marker: DARK_BASE.fg(Color::LightBlue),
    tab_active: DARK_BASE
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED)),
    tab_inactive: DARK_BASE.fg(Color::Gray),
    cursor: DARK_BASE.add_modifier(Modifier::REVERSED),
    done: DARK_BASE
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT),
    dim: DARK_BASE.fg(Color::DarkGray),
    hint: DARK_BASE.fg(Color::Gray),
    error: DARK_BASE.fg(Color::LightRed).add_modifier(Modifier::BOLD),
    unfilled: DARK_BASE.fg(Color::DarkGray),
    popup: DARK_BASE,
};

const LIGHT_BASE: Style = Style::new().fg(Color::Black).bg(Color::White);

static LIGHT: Palette = Palette {
    base: LIGHT_BASE,
    title: LIGHT_BASE.add_modifier(Modifier::BOLD),
    weekday: LIGHT_BASE.add_modifier(Modifier::BOLD),
    rule: LIGHT_BASE.fg(Color::Gray),
    other_month: LIGHT_BASE.fg(Color::Gray),
    today: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
    selected: Style::new().add_modifier(Modifier::REVERSED),
    event_marker: LIGHT_BASE.fg(Color::Magenta),
    tab_active: LIGHT_BASE
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED)),
    tab_inactive: LIGHT_BASE.fg(Color::DarkGray),
    cursor: LIGHT_BASE.add_modifier(Modifier::REVERSED),
    done: LIGHT_BASE
        .fg(Color::Gray)
        .add_modifier(Modifier::CROSSED_OUT),
    dim: LIGHT_BASE.fg(Color::DarkGray),
    hint: LIGHT_BASE.fg(Color::DarkGray),
    error: LIGHT_BASE.fg(Color::Red).add_modifier(Modifier::BOLD),
    unfilled: LIGHT_BASE.fg(Color::Gray),
    popup: LIGHT_BASE,
};
