//! Todo list persistence.
//!
//! The whole list lives under the `todos` key and is rewritten on every
//! change, so a running engine sees each edit as one store change. New todos
//! go to the top of the list.

use crate::db::keys;
use crate::db::store::Store;
use crate::libs::todo::Todo;
use anyhow::Result;

pub struct Todos {
    store: Store,
}

impl Todos {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn fetch(&self) -> Result<Vec<Todo>> {
        Ok(self.store.get::<Vec<Todo>>(keys::TODOS)?.unwrap_or_default())
    }

    pub fn insert(&self, title: &str) -> Result<Todo> {
        let mut todos = self.fetch()?;
        let next_id = todos.iter().filter_map(|todo| todo.id.parse::<u64>().ok()).max().unwrap_or(0) + 1;
        let todo = Todo::new(next_id.to_string(), title.trim());
        todos.insert(0, todo.clone());
        self.save(&todos)?;
        Ok(todo)
    }

    /// Marks a todo as completed or open. Returns `None` when no todo has `id`.
    pub fn set_completed(&self, id: &str, completed: bool) -> Result<Option<Todo>> {
        let mut todos = self.fetch()?;
        let updated = match todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.is_completed = completed;
                todo.clone()
            }
            None => return Ok(None),
        };
        self.save(&todos)?;
        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> Result<Option<Todo>> {
        let mut todos = self.fetch()?;
        let Some(position) = todos.iter().position(|todo| todo.id == id) else {
            return Ok(None);
        };
        let removed = todos.remove(position);
        self.save(&todos)?;
        Ok(Some(removed))
    }

    fn save(&self, todos: &[Todo]) -> Result<()> {
        self.store.set(keys::TODOS, todos)?;
        Ok(())
    }
}
