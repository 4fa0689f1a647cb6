use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    dto::logs::LogList,
    entity::activity_logs::{Column as LogCol, Entity as ActivityLogs, Model as LogModel},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_manager},
    models::LogEntry,
    response::{ApiResponse, Meta},
    routes::params::LogListQuery,
    state::AppState,
};

pub async fn list_logs(
    state: &AppState,
    user: &AuthUser,
    query: LogListQuery,
) -> AppResult<ApiResponse<LogList>> {
    ensure_manager(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(action) = query.action.as_ref().filter(|a| !a.is_empty()) {
        condition = condition.add(LogCol::Action.eq(action.clone()));
    }

    let finder = ActivityLogs::find()
        .filter(condition)
        .order_by_desc(LogCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(log_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Logs", LogList { items }, Some(meta)))
}

fn log_from_entity(model: LogModel) -> LogEntry {
    LogEntry {
        id: model.id,
        action: model.action,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
