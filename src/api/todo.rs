use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{ApiErrorResponse, ErrorMessage, Json, JsonErrorResponse, Path};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(list_todos, get_todo, create_todo, update_todo, delete_todo),
    components(schemas(
        dto::TodoItem,
        dto::NewTodo,
        dto::UpdateTodo,
        dto::DeleteResult,
        ErrorMessage
    ))
)]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Creates a router for endpoints under "/api/todos"
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                list_todos(&mut ext_cxn, &todo_service, &todo_reader).await
            })
            .post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
        .route(
            "/:todo_id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                    get_todo(todo_id, &mut ext_cxn, &todo_service, &todo_reader).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(todo_id): Path<i32>,
                 update: Result<Json<dto::UpdateTodo>, JsonErrorResponse>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    update_todo(
                        todo_id,
                        update.map(|Json(update)| update),
                        &mut ext_cxn,
                        &todo_service,
                        &todo_reader,
                        &todo_writer,
                    )
                    .await
                },
            )
            .delete(
                |State(app_state): AppState, Path(todo_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    delete_todo(todo_id, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
}

/// Logs a failed todo operation at a level matching how surprising it is, then converts it
/// to an API response
fn api_error(action: &str, err: TodoError) -> ApiErrorResponse {
    match err {
        TodoError::PortError(ref cause) => error!("Failed {action}: {cause:#}"),
        ref expected => info!("Rejected {action}: {expected}"),
    }

    ApiErrorResponse::from(err)
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "Every todo, oldest first", body = [dto::TodoItem]),
        (status = 500, description = "The todo store could not be reached", body = ErrorMessage),
    ),
)]
/// Retrieves every todo
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<Vec<dto::TodoItem>>, ErrorResponse> {
    info!("Requested todos");
    let todos = todo_service
        .list_todos(&mut *ext_cxn, todo_reader)
        .await
        .map_err(|err| api_error("listing todos", err))?;

    Ok(Json(todos.into_iter().map(dto::TodoItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = i32, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "The requested todo", body = dto::TodoItem),
        (status = 404, description = "No todo has that ID", body = ErrorMessage,
            example = json!({"error": "Todo not found"})),
        (status = 500, description = "The todo store could not be reached", body = ErrorMessage),
    ),
)]
/// Retrieves a single todo
async fn get_todo(
    todo_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Requested todo {todo_id}");
    let todo = todo_service
        .todo_by_id(todo_id, &mut *ext_cxn, todo_reader)
        .await
        .map_err(|err| api_error("fetching a todo", err))?;

    Ok(Json(todo.into()))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "The todo was created", body = dto::TodoItem),
        (status = 400,
            description = "The body wasn't JSON or the title was missing, blank or too long",
            body = ErrorMessage, example = json!({"error": "Title is required"})),
        (status = 500, description = "The todo store could not be reached", body = ErrorMessage),
    ),
)]
/// Creates an incomplete todo
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<(StatusCode, Json<dto::TodoItem>), ErrorResponse> {
    info!("Attempt to create todo: {:?}", new_todo.title);
    let domain_new_todo = domain::todo::NewTodo::from(new_todo);
    let created = todo_service
        .create_todo(&domain_new_todo, &mut *ext_cxn, todo_writer)
        .await
        .map_err(|err| api_error("creating a todo", err))?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/api/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = i32, Path, description = "ID of the todo")),
    request_body = dto::UpdateTodo,
    responses(
        (status = 200, description = "The todo after the update", body = dto::TodoItem),
        (status = 400,
            description = "The body wasn't JSON or the title was missing, blank or too long",
            body = ErrorMessage, example = json!({"error": "Missing JSON"})),
        (status = 404, description = "No todo has that ID, checked before the body",
            body = ErrorMessage),
        (status = 500, description = "The todo store could not be reached", body = ErrorMessage),
    ),
)]
/// Replaces a todo's title and, when given a boolean, its completion state. An unknown ID is
/// reported ahead of any problem with the body.
async fn update_todo(
    todo_id: i32,
    update: Result<dto::UpdateTodo, JsonErrorResponse>,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
    todo_writer: &impl TodoWriter,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Updating todo {todo_id}");
    let update = match update {
        Ok(update) => update,
        Err(body_rejection) => {
            todo_service
                .todo_by_id(todo_id, &mut *ext_cxn, todo_reader)
                .await
                .map_err(|err| api_error("updating a todo", err))?;
            return Err(body_rejection.into());
        }
    };

    let domain_update = domain::todo::TodoUpdate::from(update);
    let updated = todo_service
        .update_todo(
            todo_id,
            &domain_update,
            &mut *ext_cxn,
            todo_reader,
            todo_writer,
        )
        .await
        .map_err(|err| api_error("updating a todo", err))?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = i32, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "The todo was deleted", body = dto::DeleteResult),
        (status = 404, description = "No todo has that ID", body = ErrorMessage),
        (status = 500, description = "The todo store could not be reached", body = ErrorMessage),
    ),
)]
/// Deletes a todo
async fn delete_todo(
    todo_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Json<dto::DeleteResult>, ErrorResponse> {
    info!("Deleting todo {todo_id}");
    todo_service
        .delete_todo(todo_id, &mut *ext_cxn, todo_writer)
        .await
        .map_err(|err| api_error("deleting a todo", err))?;

    Ok(Json(dto::DeleteResult { result: true }))
}
