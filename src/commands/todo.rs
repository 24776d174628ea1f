use crate::{
    db::{store::Store, todos::Todos},
    libs::{messages::Message, view::View},
    msg_error, msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TodoArgs {
    #[command(subcommand)]
    command: Option<TodoCommand>,
}

#[derive(Debug, Subcommand)]
enum TodoCommand {
    /// Add a todo
    Add {
        /// What needs doing
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Mark a todo as done
    Done {
        /// Todo ID
        id: String,
    },
    /// Mark a todo as not done
    Undo {
        /// Todo ID
        id: String,
    },
    /// Remove a todo
    Remove {
        /// Todo ID
        id: String,
    },
    /// List all todos
    List,
}

pub fn cmd(args: TodoArgs) -> Result<()> {
    let todos = Todos::new(Store::new()?);
    match args.command {
        Some(TodoCommand::Add { title }) => handle_add(&todos, &title.join(" ")),
        Some(TodoCommand::Done { id }) => handle_set_completed(&todos, &id, true),
        Some(TodoCommand::Undo { id }) => handle_set_completed(&todos, &id, false),
        Some(TodoCommand::Remove { id }) => handle_remove(&todos, &id),
        Some(TodoCommand::List) | None => handle_list(&todos),
    }
}

fn handle_add(todos: &Todos, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        msg_error!(Message::TodoTitleEmpty);
        return Ok(());
    }

    let todo = todos.insert(title)?;
    msg_success!(Message::TodoAdded(todo.id, todo.title));
    Ok(())
}

pub fn handle_set_completed(todos: &Todos, id: &str, completed: bool) -> Result<()> {
    let todo = todos
        .set_completed(id, completed)?
        .ok_or_else(|| msg_error_anyhow!(Message::TodoNotFound(id.to_string())))?;
    if completed {
        msg_success!(Message::TodoCompleted(todo.title));
    } else {
        msg_success!(Message::TodoReopened(todo.title));
    }
    Ok(())
}

pub fn handle_remove(todos: &Todos, id: &str) -> Result<()> {
    let todo = todos
        .delete(id)?
        .ok_or_else(|| msg_error_anyhow!(Message::TodoNotFound(id.to_string())))?;
    msg_success!(Message::TodoRemoved(todo.title));
    Ok(())
}

fn handle_list(todos: &Todos) -> Result<()> {
    let todos = todos.fetch()?;
    if todos.is_empty() {
        msg_info!(Message::NoTodos);
        return Ok(());
    }

    msg_print!(format!("Todos ({})", todos.len()), true);
    View::todos(&todos)?;
    Ok(())
}
