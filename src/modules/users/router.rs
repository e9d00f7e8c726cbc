use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::{require_admin, require_viewer};
use crate::state::AppState;

use super::controller::{
    approve_editor_request, get_users, list_editor_requests, reject_editor_request,
    request_editor,
};

/// Routes under `/api/users`. Role requirements differ per route, so the
/// Admin and Viewer halves carry their own layers.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", get(get_users))
        .route("/editor-requests", get(list_editor_requests))
        .route("/editor-requests/{user_id}/approve", post(approve_editor_request))
        .route("/editor-requests/{user_id}/reject", post(reject_editor_request))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let viewer_routes = Router::new()
        .route("/request-editor", post(request_editor))
        .route_layer(middleware::from_fn_with_state(state, require_viewer));

    admin_routes.merge(viewer_routes)
}
