use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(alias = "done", default)]
    pub is_completed: bool,
}

impl Todo {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Ids of the todos in `current` that are completed but were open, or did
/// not exist yet, in `at_start`.
pub fn newly_completed(at_start: &[Todo], current: &[Todo]) -> Vec<String> {
    let was_completed: HashMap<&str, bool> = at_start.iter().map(|todo| (todo.id.as_str(), todo.is_completed)).collect();

    current
        .iter()
        .filter(|todo| todo.is_completed && !was_completed.get(todo.id.as_str()).copied().unwrap_or(false))
        .map(|todo| todo.id.clone())
        .collect()
}
