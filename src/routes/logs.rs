use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::logs::LogList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::LogListQuery,
    services::log_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("action" = Option<String>, Query, description = "Filter by exact action label"),
    ),
    responses(
        (status = 200, description = "Activity log, newest first", body = ApiResponse<LogList>),
        (status = 403, description = "Manager only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logs"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LogListQuery>,
) -> AppResult<Json<ApiResponse<LogList>>> {
    let response = log_service::list_logs(&state, &user, query).await?;
    Ok(Json(response))
}
