use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use derive_more::Display;
use thiserror::Error;
use tracing::info;
use validator::Validate;

/// Longest title, in characters, a todo can hold once surrounding whitespace is trimmed
pub const MAX_TITLE_CHARS: usize = 40;

#[derive(PartialEq, Eq, Debug, Clone, Display)]
#[display("#{id} {title:?} (complete: {complete})")]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub complete: bool,
}

/// A todo that hasn't been stored yet. New todos always start out incomplete.
#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct NewTodo {
    pub title: String,
}

/// Changes to apply to a stored todo. Fields left as [None] are not touched.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub complete: Option<bool>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title is required")]
    Missing,
    #[error("Title must be at most {} characters", MAX_TITLE_CHARS)]
    TooLong,
}

#[derive(Validate)]
struct TitleCandidate {
    // max must stay equal to MAX_TITLE_CHARS
    #[validate(length(min = 1, max = 40))]
    title: String,
}

/// Trims surrounding whitespace off a title and makes sure what's left is between 1 and
/// [MAX_TITLE_CHARS] characters long.
pub fn normalize_title(raw: &str) -> Result<String, TitleError> {
    let candidate = TitleCandidate {
        title: raw.trim().to_owned(),
    };

    match candidate.validate() {
        Ok(()) => Ok(candidate.title),
        Err(_) if candidate.title.is_empty() => Err(TitleError::Missing),
        Err(_) => Err(TitleError::TooLong),
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
    }

    pub trait TodoWriter {
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoItem, anyhow::Error>;

        /// Returns the updated todo, or [None] if there was no todo with the given ID
        async fn update_todo(
            &self,
            todo_id: i32,
            update: &TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;

        /// Returns whether a todo was actually removed
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error(transparent)]
        InvalidTitle(#[from] TitleError),
        #[error("todo {0} does not exist")]
        NotFound(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    #[cfg(test)]
    #[allow(clippy::items_after_test_module)]
    mod todo_error_clone {
        use super::TodoError;
        use anyhow::anyhow;

        impl Clone for TodoError {
            fn clone(&self) -> Self {
                match self {
                    Self::InvalidTitle(title_err) => Self::InvalidTitle(title_err.clone()),
                    Self::NotFound(todo_id) => Self::NotFound(*todo_id),
                    Self::PortError(err) => Self::PortError(anyhow!(format!("{}", err))),
                }
            }
        }
    }

    pub trait TodoPort {
        async fn list_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<TodoItem>, TodoError>;
        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<TodoItem, TodoError>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, TodoError>;
        /// Fails with [TodoError::NotFound] for an unknown ID before looking at the update
        async fn update_todo(
            &self,
            todo_id: i32,
            update: &TodoUpdate,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, TodoError>;
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), TodoError>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<TodoItem>, TodoError> {
        let todos = todo_read
            .all_todos(&mut *ext_cxn)
            .await
            .context("listing todos")?;

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<TodoItem, TodoError> {
        todo_read
            .todo_by_id(todo_id, &mut *ext_cxn)
            .await
            .context("fetching a todo by ID")?
            .ok_or(TodoError::NotFound(todo_id))
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, TodoError> {
        let normalized = NewTodo {
            title: normalize_title(&new_todo.title)?,
        };

        let created = todo_write
            .create_todo(&normalized, &mut *ext_cxn)
            .await
            .context("creating a todo")?;
        info!("Created todo {created}");

        Ok(created)
    }

    async fn update_todo(
        &self,
        todo_id: i32,
        update: &TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, TodoError> {
        driving_ports::TodoPort::todo_by_id(self, todo_id, &mut *ext_cxn, todo_read).await?;

        let normalized = TodoUpdate {
            title: update.title.as_deref().map(normalize_title).transpose()?,
            complete: update.complete,
        };

        todo_write
            .update_todo(todo_id, &normalized, &mut *ext_cxn)
            .await
            .context("updating a todo")?
            .ok_or(TodoError::NotFound(todo_id))
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        let removed = todo_write
            .delete_todo(todo_id, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;

        if removed {
            Ok(())
        } else {
            Err(TodoError::NotFound(todo_id))
        }
    }
}
