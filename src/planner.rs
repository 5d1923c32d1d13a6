use crate::store::{
    load_value, save_value, Event, EventDraft, EventId, EventsByDate, IdClock, Storage,
    StoreError, Todo, TodoId, TodoList, EVENTS_KEY, THEME_KEY, TODOS_KEY,
};
use crate::theme::Theme;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

/// Owns the events, the todos, and the theme, and writes each of them back to
/// storage in full whenever it changes
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Planner<S> {
    storage: S,
    events: EventsByDate,
    todos: TodoList,
    theme: Theme,
    ids: IdClock,
}

impl<S> Planner<S> {
    pub(crate) fn events(&self) -> &EventsByDate {
        &self.events
    }

    pub(crate) fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub(crate) fn theme(&self) -> Theme {
        self.theme
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> Planner<S> {
    pub(crate) fn load(storage: S) -> Result<Planner<S>, StoreError> {
        let events: EventsByDate = load_value(&storage, EVENTS_KEY)?;
        let todos: TodoList = load_value(&storage, TODOS_KEY)?;
        let theme = load_theme(&storage)?;
        let last_id = events
            .max_id()
            .map(EventId::get)
            .max(todos.max_id().map(TodoId::get))
            .unwrap_or_default();
        info!(
            days = events.len(),
            todos = todos.len(),
            %theme,
            "loaded stored state"
        );
        Ok(Planner {
            storage,
            events,
            todos,
            theme,
            ids: IdClock::starting_after(last_id),
        })
    }

    fn next_id(&mut self) -> i64 {
        self.ids.next_at(OffsetDateTime::now_utc())
    }

    /// Adds an event on `date`.  Returns `Ok(None)` without touching anything
    /// if the draft's title is blank.
    pub(crate) fn add_event(
        &mut self,
        date: Date,
        draft: &EventDraft,
    ) -> Result<Option<EventId>, StoreError> {
        let id = EventId::from(self.next_id());
        let Some(event) = Event::new(id, draft) else {
            debug!("ignoring event with a blank title");
            return Ok(None);
        };
        debug!(%date, id = id.get(), time = %event.time(), "adding event");
        self.events.insert(date, event);
        self.save_events()?;
        Ok(Some(id))
    }

    /// Returns `Ok(false)` if there was no such event
    pub(crate) fn delete_event(&mut self, date: Date, id: EventId) -> Result<bool, StoreError> {
        if self.events.remove(date, id).is_none() {
            return Ok(false);
        }
        debug!(%date, id = id.get(), "deleted event");
        self.save_events()?;
        Ok(true)
    }

    /// Appends a todo.  Returns `Ok(None)` without touching anything if
    /// `text` is blank.
    pub(crate) fn add_todo(&mut self, text: &str) -> Result<Option<TodoId>, StoreError> {
        let id = TodoId::from(self.next_id());
        let Some(todo) = Todo::new(id, text, OffsetDateTime::now_utc()) else {
            debug!("ignoring todo with blank text");
            return Ok(None);
        };
        debug!(id = id.get(), created_at = %todo.created_at(), "adding todo");
        self.todos.push(todo);
        self.save_todos()?;
        Ok(Some(id))
    }

    /// Returns the todo's new completion state, or `None` if there was no
    /// such todo
    pub(crate) fn toggle_todo(&mut self, id: TodoId) -> Result<Option<bool>, StoreError> {
        let Some(completed) = self.todos.toggle(id) else {
            return Ok(None);
        };
        debug!(id = id.get(), completed, "toggled todo");
        self.save_todos()?;
        Ok(Some(completed))
    }

    /// Returns `Ok(false)` if there was no such todo
    pub(crate) fn delete_todo(&mut self, id: TodoId) -> Result<bool, StoreError> {
        if self.todos.remove(id).is_none() {
            return Ok(false);
        }
        debug!(id = id.get(), "deleted todo");
        self.save_todos()?;
        Ok(true)
    }

    pub(crate) fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        self.theme = self.theme.toggled();
        debug!(theme = %self.theme, "switched theme");
        save_value(&mut self.storage, THEME_KEY, &self.theme)?;
        Ok(self.theme)
    }

    fn save_events(&mut self) -> Result<(), StoreError> {
        save_value(&mut self.storage, EVENTS_KEY, &self.events)
    }

    fn save_todos(&mut self) -> Result<(), StoreError> {
        save_value(&mut self.storage, TODOS_KEY, &self.todos)
    }
}

/// Reads the stored theme, which may be either a JSON string or the bare
/// word `dark` or `light`
fn load_theme<S: Storage>(storage: &S) -> Result<Theme, StoreError> {
    match load_value(storage, THEME_KEY) {
        Err(StoreError::Decode { key, source }) => storage
            .load(THEME_KEY)?
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or(StoreError::Decode { key, source }),
        r => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStorage, MemoryStorage, Notification};
    use time::macros::date;

    fn draft(title: &str, time: &str) -> EventDraft {
        EventDraft {
            title: title.into(),
            time: time.parse().unwrap(),
            ..EventDraft::default()
        }
    }

    fn titles_on<S>(planner: &Planner<S>, date: Date) -> Vec<String> {
        planner
            .events()
            .on(date)
            .iter()
            .map(|ev| ev.title().to_owned())
            .collect()
    }

    #[test]
    fn test_events_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(FileStorage::new(tmp.path())).unwrap();
        assert!(planner.events().is_empty());
        planner.add_event(day, &draft("Meeting", "09:00")).unwrap();
        planner.add_event(day, &draft("Lunch", "12:30")).unwrap();
        assert_eq!(titles_on(&planner, day), ["Meeting", "Lunch"]);
        let reloaded = Planner::load(FileStorage::new(tmp.path())).unwrap();
        assert_eq!(reloaded.events(), planner.events());
        assert_eq!(titles_on(&reloaded, day), ["Meeting", "Lunch"]);
    }

    #[test]
    fn test_events_sorted_regardless_of_insertion_order() {
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        planner.add_event(day, &draft("Lunch", "12:30")).unwrap();
        planner.add_event(day, &draft("Meeting", "09:00")).unwrap();
        assert_eq!(titles_on(&planner, day), ["Meeting", "Lunch"]);
        let stored = planner.storage().raw(EVENTS_KEY).unwrap();
        let stored = serde_json::from_str::<serde_json::Value>(stored).unwrap();
        assert_eq!(stored["2025-01-22"][0]["title"], "Meeting");
        assert_eq!(stored["2025-01-22"][1]["title"], "Lunch");
    }

    #[test]
    fn test_blank_event_is_ignored() {
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        assert_eq!(planner.add_event(day, &draft("  ", "09:00")).unwrap(), None);
        assert!(planner.events().is_empty());
        assert_eq!(planner.storage().writes(), 0);
    }

    #[test]
    fn test_event_fields_are_stored() {
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        let draft = EventDraft {
            title: "Dentist".into(),
            time: "08:15".parse().unwrap(),
            description: "Bring forms".into(),
            notification: Notification::HalfHour,
        };
        let id = planner.add_event(day, &draft).unwrap().unwrap();
        let reloaded = Planner::load(planner.storage().clone()).unwrap();
        let event = &reloaded.events().on(day)[0];
        assert_eq!(event.id(), id);
        assert_eq!(event.description(), Some("Bring forms"));
        assert_eq!(event.notification(), Notification::HalfHour);
        assert_eq!(event.time().to_string(), "08:15");
    }

    #[test]
    fn test_delete_last_event_removes_day() {
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        let id = planner
            .add_event(day, &draft("Meeting", "09:00"))
            .unwrap()
            .unwrap();
        assert!(planner.delete_event(day, id).unwrap());
        assert!(planner.events().is_empty());
        assert_eq!(planner.storage().raw(EVENTS_KEY), Some("{}"));
        let writes = planner.storage().writes();
        assert!(!planner.delete_event(day, id).unwrap());
        assert_eq!(planner.storage().writes(), writes);
    }

    #[test]
    fn test_rapid_ids_are_unique() {
        let day = date!(2025 - 01 - 22);
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(planner.add_event(day, &draft("x", "10:00")).unwrap().unwrap().get());
            ids.push(planner.add_todo("y").unwrap().unwrap().get());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        let first = planner.add_todo("a").unwrap().unwrap();
        let mut reloaded = Planner::load(planner.storage().clone()).unwrap();
        let second = reloaded.add_todo("b").unwrap().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_whitespace_todo_is_ignored() {
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        planner.add_todo("Buy milk").unwrap();
        let before = planner.todos().clone();
        assert_eq!(planner.add_todo(" \t ").unwrap(), None);
        assert_eq!(planner.todos(), &before);
        assert_eq!(planner.storage().writes(), 1);
    }

    #[test]
    fn test_todo_lifecycle() {
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        let a = planner.add_todo("a").unwrap().unwrap();
        let b = planner.add_todo("b").unwrap().unwrap();
        assert_eq!(planner.toggle_todo(b).unwrap(), Some(true));
        assert_eq!(planner.toggle_todo(b).unwrap(), Some(false));
        assert_eq!(planner.toggle_todo(b).unwrap(), Some(true));
        assert!(planner.delete_todo(a).unwrap());
        assert!(!planner.delete_todo(a).unwrap());
        assert_eq!(planner.toggle_todo(a).unwrap(), None);
        let reloaded = Planner::load(planner.storage().clone()).unwrap();
        assert_eq!(reloaded.todos().len(), 1);
        let todo = reloaded.todos().get(0).unwrap();
        assert_eq!(todo.text(), "b");
        assert!(todo.completed());
    }

    #[test]
    fn test_theme_persists() {
        let mut planner = Planner::load(MemoryStorage::default()).unwrap();
        assert_eq!(planner.theme(), Theme::Dark);
        assert_eq!(planner.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(planner.storage().raw(THEME_KEY), Some(r#""light""#));
        let mut reloaded = Planner::load(planner.storage().clone()).unwrap();
        assert_eq!(reloaded.theme(), Theme::Light);
        assert_eq!(reloaded.toggle_theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_theme_stored_as_bare_word() {
        let mut storage = MemoryStorage::default();
        storage.save(THEME_KEY, "light").unwrap();
        let mut planner = Planner::load(storage).unwrap();
        assert_eq!(planner.theme(), Theme::Light);
        assert_eq!(planner.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(planner.storage().raw(THEME_KEY), Some(r#""dark""#));
        let mut storage = MemoryStorage::default();
        storage.save(THEME_KEY, "sepia").unwrap();
        assert!(matches!(
            Planner::load(storage),
            Err(StoreError::Decode { key: THEME_KEY, .. })
        ));
    }

    #[test]
    fn test_event_before_year_one_survives_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let day = date!(-0001 - 06 - 15);
        let mut planner = Planner::load(FileStorage::new(tmp.path())).unwrap();
        planner.add_event(day, &draft("Solstice", "06:00")).unwrap();
        let reloaded = Planner::load(FileStorage::new(tmp.path())).unwrap();
        assert_eq!(titles_on(&reloaded, day), ["Solstice"]);
        assert_eq!(reloaded.events(), planner.events());
    }

    #[test]
    fn test_malformed_storage_fails_to_load() {
        let mut storage = MemoryStorage::default();
        storage.save(TODOS_KEY, r#"{"not": "a list"}"#).unwrap();
        assert!(matches!(
            Planner::load(storage),
            Err(StoreError::Decode { key: TODOS_KEY, .. })
        ));
    }
}
