use crate::domain;
use crate::domain::todo::{NewTodo, TodoItem, TodoUpdate};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

#[derive(FromRow)]
struct TodoRow {
    id: i32,
    title: String,
    complete: bool,
}

impl From<TodoRow> for TodoItem {
    fn from(value: TodoRow) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            complete: value.complete,
        }
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<TodoItem> =
            query_as::<_, TodoRow>("SELECT id, title, complete FROM todo ORDER BY id")
                .fetch_all(cxn.borrow_connection())
                .await
                .context("trying to fetch all todo items")?
                .into_iter()
                .map(TodoItem::from)
                .collect();

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo = query_as::<_, TodoRow>("SELECT id, title, complete FROM todo WHERE id = $1")
            .bind(todo_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a todo item by ID")?
            .map(TodoItem::from);

        Ok(todo)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoItem, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TodoRow>(
            "INSERT INTO todo(title, complete) VALUES ($1, FALSE) RETURNING id, title, complete",
        )
        .bind(&new_todo.title)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(created.into())
    }

    async fn update_todo(
        &self,
        todo_id: i32,
        update: &TodoUpdate,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // NULL parameters leave the column as-is
        let updated = query_as::<_, TodoRow>(
            "UPDATE todo SET title = COALESCE($1, title), complete = COALESCE($2, complete) \
             WHERE id = $3 RETURNING id, title, complete",
        )
        .bind(update.title.as_deref())
        .bind(update.complete)
        .bind(todo_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?
        .map(TodoItem::from);

        Ok(updated)
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM todo WHERE id = $1")
            .bind(todo_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
