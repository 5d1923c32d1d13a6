mod error;
mod events;
mod todos;
pub(crate) use self::error::StoreError;
pub(crate) use self::events::{Event, EventDraft, EventId, EventTime, EventsByDate, Notification};
pub(crate) use self::todos::{Todo, TodoId, TodoList};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::debug;

pub(crate) const EVENTS_KEY: &str = "calendarEvents";
pub(crate) const TODOS_KEY: &str = "todoItems";
pub(crate) const THEME_KEY: &str = "theme";

/// A key-value store holding one serialized value per key.  Values are
/// always replaced whole.
pub(crate) trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Decodes the JSON value stored under `key`, or returns the type's default
/// if nothing is stored
pub(crate) fn load_value<S, T>(storage: &S, key: &'static str) -> Result<T, StoreError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned + Default,
{
    match storage.load(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Decode { key, source }),
        None => Ok(T::default()),
    }
}

pub(crate) fn save_value<S, T>(storage: &mut S, key: &'static str, value: &T) -> Result<(), StoreError>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    storage.save(key, &raw)
}

/// Stores each key in a file named `{key}.json` inside a directory
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub(crate) fn new<P: AsRef<Path>>(dir: P) -> FileStorage {
        FileStorage {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(key, path = %path.display(), bytes = value.len(), "wrote stored value");
        Ok(())
    }
}

/// Hands out millisecond creation timestamps for use as ids, never repeating
/// or going backwards even when called more than once per millisecond
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct IdClock {
    last: i64,
}

impl IdClock {
    pub(crate) fn starting_after(last: i64) -> IdClock {
        IdClock { last }
    }

    pub(crate) fn next_at(&mut self, now: OffsetDateTime) -> i64 {
        let millis = i64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX);
        self.last = millis.max(self.last.saturating_add(1));
        self.last
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStorage {
    values: std::collections::HashMap<String, String>,
    writes: usize,
}

#[cfg(test)]
impl MemoryStorage {
    pub(crate) fn writes(&self) -> usize {
        self.writes
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_file_storage_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.load(TODOS_KEY).unwrap(), None);
        storage.save(TODOS_KEY, "[]").unwrap();
        assert_eq!(storage.load(TODOS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(fs::read_to_string(dir.join("todoItems.json")).unwrap(), "[]");
        storage.save(TODOS_KEY, "[1]").unwrap();
        assert_eq!(storage.load(TODOS_KEY).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_load_value_defaults_when_absent() {
        let storage = MemoryStorage::default();
        let todos: TodoList = load_value(&storage, TODOS_KEY).unwrap();
        assert!(todos.is_empty());
        let events: EventsByDate = load_value(&storage, EVENTS_KEY).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_load_value_malformed() {
        let mut storage = MemoryStorage::default();
        storage.save(EVENTS_KEY, "{not json").unwrap();
        let r = load_value::<_, EventsByDate>(&storage, EVENTS_KEY);
        assert!(matches!(r, Err(StoreError::Decode { key: EVENTS_KEY, .. })));
    }

    #[test]
    fn test_write_failure_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let mut storage = FileStorage::new(blocker.join("data"));
        let r = save_value(&mut storage, THEME_KEY, "dark");
        assert!(matches!(r, Err(StoreError::CreateDir { .. })));
    }

    #[test]
    fn test_id_clock_never_repeats() {
        let now = datetime!(2025-01-22 08:00 UTC);
        let mut clock = IdClock::default();
        let first = clock.next_at(now);
        assert_eq!(first, 1_737_532_800_000);
        assert_eq!(clock.next_at(now), first + 1);
        assert_eq!(clock.next_at(now), first + 2);
        let later = datetime!(2025-01-22 08:00:01 UTC);
        assert_eq!(clock.next_at(later), first + 1000);
        let mut clock = IdClock::starting_after(first + 5000);
        assert_eq!(clock.next_at(now), first + 5001);
    }
}
