//! Server-rendered pages for the todo list.
//!
//! Completing, reopening and deleting a todo are plain GET links so the page works without any
//! scripting. Every action redirects back to the list with a 303 so browsers follow up with a GET.

use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::domain::todo::{NewTodo, TodoItem, TodoUpdate};
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_macros::FromRequestParts;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{debug, error, info};

const TODO_LIST_TEMPLATE: &str = "index.html";
const NOT_FOUND_PAGE: &str = include_str!("../templates/not_found.html");
const ERROR_PAGE: &str = include_str!("../templates/error.html");

/// Templates for the pages that depend on stored data. Loaded once at startup.
pub struct PageTemplates {
    tera: Tera,
}

impl PageTemplates {
    pub fn load() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TODO_LIST_TEMPLATE, include_str!("../templates/index.html"))?;

        Ok(PageTemplates { tera })
    }

    pub fn render_todo_list(&self, todos: Vec<TodoItem>) -> Result<String, tera::Error> {
        let todo_list: Vec<dto::TodoItem> = todos.into_iter().map(dto::TodoItem::from).collect();
        let mut context = Context::new();
        context.insert("todo_list", &todo_list);

        self.tera.render(TODO_LIST_TEMPLATE, &context)
    }
}

/// Failures that end a page request without a redirect
#[derive(Debug, PartialEq, Eq)]
pub enum PageError {
    NotFound,
    InternalFailure,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            Self::InternalFailure => {
                (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
            }
        }
    }
}

impl From<PathRejection> for PageError {
    fn from(value: PathRejection) -> Self {
        debug!("Treating unusable todo ID as unknown: {}", value.body_text());
        Self::NotFound
    }
}

/// Todo ID taken from the path. Anything that can't be a stored todo's ID renders the Not Found
/// page.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PageError))]
struct PagePath<T>(T);

/// Builds a router for the HTML pages
pub fn ui_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};

                todo_list_page(&app_state.templates, &mut ext_cxn, &todo_service, &DbTodoReader)
                    .await
            }),
        )
        .route(
            "/add",
            post(
                |State(app_state): AppState,
                 form: Result<Form<dto::TitleForm>, FormRejection>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    add_todo(submitted_title(form), &mut ext_cxn, &todo_service, &DbTodoWriter)
                        .await
                },
            ),
        )
        .route(
            "/complete/:todo_id",
            get(
                |State(app_state): AppState, PagePath(todo_id): PagePath<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    set_completion(
                        todo_id,
                        true,
                        &mut ext_cxn,
                        &todo_service,
                        &DbTodoReader,
                        &DbTodoWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/incomplete/:todo_id",
            get(
                |State(app_state): AppState, PagePath(todo_id): PagePath<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    set_completion(
                        todo_id,
                        false,
                        &mut ext_cxn,
                        &todo_service,
                        &DbTodoReader,
                        &DbTodoWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/delete/:todo_id",
            get(
                |State(app_state): AppState, PagePath(todo_id): PagePath<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    delete_todo(todo_id, &mut ext_cxn, &todo_service, &DbTodoWriter).await
                },
            ),
        )
        .route(
            "/edit/:todo_id",
            post(
                |State(app_state): AppState,
                 PagePath(todo_id): PagePath<i32>,
                 form: Result<Form<dto::TitleForm>, FormRejection>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};

                    edit_todo(
                        todo_id,
                        submitted_title(form),
                        &mut ext_cxn,
                        &todo_service,
                        &DbTodoReader,
                        &DbTodoWriter,
                    )
                    .await
                },
            ),
        )
}

/// Pulls the title out of a submitted form. A form that can't be read counts as no title.
fn submitted_title(form: Result<Form<dto::TitleForm>, FormRejection>) -> Option<String> {
    match form {
        Ok(Form(form)) => form.title,
        Err(rejection) => {
            debug!("Ignoring unreadable form: {}", rejection.body_text());
            None
        }
    }
}

fn redirect_home() -> Redirect {
    Redirect::to("/")
}

fn page_error(action: &str, err: TodoError) -> PageError {
    match err {
        TodoError::NotFound(todo_id) => {
            info!("Todo {todo_id} does not exist while {action}");
            PageError::NotFound
        }
        other => {
            error!("Failed {action}: {other:#}");
            PageError::InternalFailure
        }
    }
}

/// Renders the list of every todo
async fn todo_list_page(
    templates: &PageTemplates,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Html<String>, PageError> {
    let todos = todo_service
        .list_todos(&mut *ext_cxn, todo_reader)
        .await
        .map_err(|err| page_error("listing todos", err))?;

    let page = templates.render_todo_list(todos).map_err(|err| {
        error!("Failed to render the todo list: {err:?}");
        PageError::InternalFailure
    })?;

    Ok(Html(page))
}

/// Adds a todo from the page's form. Submissions without a usable title are dropped quietly.
async fn add_todo(
    title: Option<String>,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Redirect, PageError> {
    let Some(title) = title else {
        info!("Ignoring a new todo without a title");
        return Ok(redirect_home());
    };

    match todo_service
        .create_todo(&NewTodo { title }, &mut *ext_cxn, todo_writer)
        .await
    {
        Ok(_) => Ok(redirect_home()),
        Err(TodoError::InvalidTitle(title_err)) => {
            info!("Ignoring a new todo: {title_err}");
            Ok(redirect_home())
        }
        Err(err) => Err(page_error("adding a todo", err)),
    }
}

/// Marks a todo as complete or incomplete
async fn set_completion(
    todo_id: i32,
    complete: bool,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
    todo_writer: &impl TodoWriter,
) -> Result<Redirect, PageError> {
    let update = TodoUpdate {
        title: None,
        complete: Some(complete),
    };
    let updated = todo_service
        .update_todo(todo_id, &update, &mut *ext_cxn, todo_reader, todo_writer)
        .await
        .map_err(|err| page_error("changing a todo's completion", err))?;
    info!("Set completion of todo {updated}");

    Ok(redirect_home())
}

async fn delete_todo(
    todo_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Redirect, PageError> {
    todo_service
        .delete_todo(todo_id, &mut *ext_cxn, todo_writer)
        .await
        .map_err(|err| page_error("deleting a todo", err))?;
    info!("Deleted todo {todo_id}");

    Ok(redirect_home())
}

/// Renames a todo. An unusable title leaves the todo alone, but an unknown ID is still a 404.
async fn edit_todo(
    todo_id: i32,
    title: Option<String>,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
    todo_writer: &impl TodoWriter,
) -> Result<Redirect, PageError> {
    let Some(title) = title else {
        todo_service
            .todo_by_id(todo_id, &mut *ext_cxn, todo_reader)
            .await
            .map_err(|err| page_error("editing a todo", err))?;
        info!("Ignoring edit of todo {todo_id} without a title");
        return Ok(redirect_home());
    };

    let update = TodoUpdate {
        title: Some(title),
        complete: None,
    };
    match todo_service
        .update_todo(todo_id, &update, &mut *ext_cxn, todo_reader, todo_writer)
        .await
    {
        Ok(updated) => info!("Edited todo {updated}"),
        Err(TodoError::InvalidTitle(title_err)) => {
            info!("Ignoring edit of todo {todo_id}: {title_err}")
        }
        Err(err) => return Err(page_error("editing a todo", err)),
    }

    Ok(redirect_home())
}
