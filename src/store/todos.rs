use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct TodoId(i64);

impl TodoId {
    pub(crate) fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TodoId {
    fn from(raw: i64) -> TodoId {
        TodoId(raw)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Todo {
    id: TodoId,
    text: String,
    completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Todo {
    /// Returns `None` if `text` is blank
    pub(crate) fn new(id: TodoId, text: &str, created_at: OffsetDateTime) -> Option<Todo> {
        (!text.trim().is_empty()).then(|| Todo {
            id,
            text: text.to_owned(),
            completed: false,
            created_at,
        })
    }

    pub(crate) fn id(&self) -> TodoId {
        self.id
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// Todos in the order they were added
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct TodoList(Vec<Todo>);

impl TodoList {
    pub(crate) fn push(&mut self, todo: Todo) {
        self.0.push(todo);
    }

    /// Flips the todo's completion and returns its new state
    pub(crate) fn toggle(&mut self, id: TodoId) -> Option<bool> {
        let todo = self.0.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let i = self.0.iter().position(|t| t.id == id)?;
        Some(self.0.remove(i))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Todo> {
        self.0.get(index)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.0.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn completed_count(&self) -> usize {
        self.0.iter().filter(|t| t.completed).count()
    }

    pub(crate) fn max_id(&self) -> Option<TodoId> {
        self.0.iter().map(Todo::id).max()
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn list(texts: &[&str]) -> TodoList {
        let mut todos = TodoList::default();
        for (i, text) in std::iter::zip(1.., texts) {
            todos.push(Todo::new(TodoId(i), text, datetime!(2025-01-22 08:00 UTC)).unwrap());
        }
        todos
    }

    #[test]
    fn test_blank_text_rejected() {
        let created = datetime!(2025-01-22 08:00 UTC);
        assert_eq!(Todo::new(TodoId(1), "", created), None);
        assert_eq!(Todo::new(TodoId(1), "   \n", created), None);
        let todo = Todo::new(TodoId(1), "Buy milk", created).unwrap();
        assert!(!todo.completed());
        assert_eq!(todo.created_at(), created);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut todos = list(&["a", "b"]);
        assert_eq!(todos.toggle(TodoId(2)), Some(true));
        assert_eq!(todos.completed_count(), 1);
        assert_eq!(todos.toggle(TodoId(2)), Some(false));
        assert_eq!(todos, list(&["a", "b"]));
        assert_eq!(todos.toggle(TodoId(9)), None);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut todos = list(&["a", "b", "a"]);
        assert_eq!(todos.remove(TodoId(3)).map(|t| t.id()), Some(TodoId(3)));
        assert_eq!(todos.len(), 2);
        let texts = todos.iter().map(Todo::text).collect::<Vec<_>>();
        assert_eq!(texts, ["a", "b"]);
        assert_eq!(todos.remove(TodoId(3)), None);
        assert_eq!(todos.len(), 2);
    }

    #[test]
    fn test_stored_format() {
        let stored = r#"[
            {"id": 1737540000000, "text": "Buy milk", "completed": false, "createdAt": "2025-01-22T08:00:00.000Z"},
            {"id": 1737540000005, "text": "Call Bob", "completed": true, "createdAt": "2025-01-22T08:01:30.250Z"}
        ]"#;
        let todos = serde_json::from_str::<TodoList>(stored).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos.completed_count(), 1);
        assert_eq!(todos.max_id(), Some(TodoId(1_737_540_000_005)));
        let first = todos.get(0).unwrap();
        assert_eq!(first.text(), "Buy milk");
        assert_eq!(first.created_at(), datetime!(2025-01-22 08:00 UTC));
        let json = serde_json::to_value(&todos).unwrap();
        assert_eq!(json[1]["createdAt"], "2025-01-22T08:01:30.25Z");
        assert_eq!(json[1]["completed"], true);
        assert_eq!(serde_json::from_value::<TodoList>(json).unwrap(), todos);
    }
}
