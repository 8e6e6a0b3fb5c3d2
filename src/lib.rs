use axum::Router;
use axum::extract::State;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;
pub mod ui;

/// Data every request handler can reach
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    pub templates: ui::PageTemplates,
}

impl SharedData {
    pub fn new(ext_cxn: persistence::ExternalConnectivity, templates: ui::PageTemplates) -> Self {
        SharedData { ext_cxn, templates }
    }
}

pub type AppState = State<Arc<SharedData>>;

/// Assembles the pages, the JSON API under "/api/todos" and its documentation into one router
/// with request tracing attached
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .merge(ui::ui_routes())
        .nest("/api/todos", api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router)
}
