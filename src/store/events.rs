use crate::calendar::{EventLookup, YMD_FMT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem,
    macros::{format_description, time},
    Date, Time,
};

static HM_FMT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

/// A day's key in the events mapping, serialized as `YYYY-MM-DD`
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct DateKey(Date);

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(YMD_FMT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<DateKey, InvalidDateKey> {
        Date::parse(s, YMD_FMT)
            .map(DateKey)
            .map_err(|_| InvalidDateKey(s.to_owned()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = InvalidDateKey;

    fn try_from(s: String) -> Result<DateKey, InvalidDateKey> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> String {
        key.to_string()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date key {0:?}; expected YYYY-MM-DD")]
pub(crate) struct InvalidDateKey(String);

/// Time of day of an event, serialized as zero-padded 24-hour `HH:MM`.  The
/// ordering matches the ordering of the serialized strings.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct EventTime(Time);

impl EventTime {
    pub(crate) fn from_hm(hour: u8, minute: u8) -> Result<EventTime, InvalidEventTime> {
        Time::from_hms(hour, minute, 0)
            .map(EventTime)
            .map_err(|_| InvalidEventTime(format!("{hour:02}:{minute:02}")))
    }

    pub(crate) fn hour(self) -> u8 {
        self.0.hour()
    }

    pub(crate) fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl Default for EventTime {
    fn default() -> EventTime {
        EventTime(time!(12:00))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for EventTime {
    type Err = InvalidEventTime;

    fn from_str(s: &str) -> Result<EventTime, InvalidEventTime> {
        Time::parse(s, HM_FMT)
            .map(EventTime)
            .map_err(|_| InvalidEventTime(s.to_owned()))
    }
}

impl TryFrom<String> for EventTime {
    type Error = InvalidEventTime;

    fn try_from(s: String) -> Result<EventTime, InvalidEventTime> {
        s.parse()
    }
}

impl From<EventTime> for String {
    fn from(t: EventTime) -> String {
        t.to_string()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid event time {0:?}; expected HH:MM")]
pub(crate) struct InvalidEventTime(String);

/// How long before an event to be reminded of it, serialized as a number of
/// minutes
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub(crate) enum Notification {
    #[default]
    None,
    FiveMinutes,
    FifteenMinutes,
    HalfHour,
    Hour,
}

impl Notification {
    const ALL: [Notification; 5] = [
        Notification::None,
        Notification::FiveMinutes,
        Notification::FifteenMinutes,
        Notification::HalfHour,
        Notification::Hour,
    ];

    pub(crate) fn minutes(self) -> u32 {
        match self {
            Notification::None => 0,
            Notification::FiveMinutes => 5,
            Notification::FifteenMinutes => 15,
            Notification::HalfHour => 30,
            Notification::Hour => 60,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Notification::None => "None",
            Notification::FiveMinutes => "5 minutes before",
            Notification::FifteenMinutes => "15 minutes before",
            Notification::HalfHour => "30 minutes before",
            Notification::Hour => "1 hour before",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|&n| n == self).unwrap_or(0)
    }

    pub(crate) fn next(self) -> Notification {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub(crate) fn previous(self) -> Notification {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TryFrom<u32> for Notification {
    type Error = InvalidNotification;

    fn try_from(minutes: u32) -> Result<Notification, InvalidNotification> {
        Self::ALL
            .into_iter()
            .find(|n| n.minutes() == minutes)
            .ok_or(InvalidNotification(minutes))
    }
}

impl From<Notification> for u32 {
    fn from(n: Notification) -> u32 {
        n.minutes()
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("unsupported notification lead time of {0} minutes")]
pub(crate) struct InvalidNotification(u32);

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct EventId(i64);

impl EventId {
    pub(crate) fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EventId {
    fn from(raw: i64) -> EventId {
        EventId(raw)
    }
}

/// The contents of the event form before the event is given an id
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventDraft {
    pub(crate) title: String,
    pub(crate) time: EventTime,
    pub(crate) description: String,
    pub(crate) notification: Notification,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Event {
    id: EventId,
    title: String,
    time: EventTime,
    #[serde(default)]
    description: String,
    #[serde(default)]
    notification: Notification,
}

impl Event {
    /// Returns `None` if the draft's title is blank
    pub(crate) fn new(id: EventId, draft: &EventDraft) -> Option<Event> {
        (!draft.title.trim().is_empty()).then(|| Event {
            id,
            title: draft.title.clone(),
            time: draft.time,
            description: draft.description.clone(),
            notification: draft.notification,
        })
    }

    pub(crate) fn id(&self) -> EventId {
        self.id
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn time(&self) -> EventTime {
        self.time
    }

    pub(crate) fn description(&self) -> Option<&str> {
        Some(self.description.as_str()).filter(|d| !d.trim().is_empty())
    }

    pub(crate) fn notification(&self) -> Notification {
        self.notification
    }
}

/// Events grouped by day.  Each day's events are kept sorted by time, and a
/// day with no events has no entry.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct EventsByDate(BTreeMap<DateKey, Vec<Event>>);

impl EventsByDate {
    pub(crate) fn on(&self, date: Date) -> &[Event] {
        self.0
            .get(&DateKey::from(date))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn insert(&mut self, date: Date, event: Event) {
        let events = self.0.entry(DateKey::from(date)).or_default();
        events.push(event);
        // Stable, so events at the same time stay in insertion order
        events.sort_by_key(Event::time);
    }

    pub(crate) fn remove(&mut self, date: Date, id: EventId) -> Option<Event> {
        let key = DateKey::from(date);
        let events = self.0.get_mut(&key)?;
        let i = events.iter().position(|ev| ev.id == id)?;
        let removed = events.remove(i);
        if events.is_empty() {
            self.0.remove(&key);
        }
        Some(removed)
    }

    /// Number of days with events
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn max_id(&self) -> Option<EventId> {
        self.0.values().flatten().map(Event::id).max()
    }
}

impl EventLookup for EventsByDate {
    fn has_events(&self, date: Date) -> bool {
        !self.on(date).is_empty()
    }
}
