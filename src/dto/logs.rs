use serde::Serialize;
use utoipa::ToSchema;

use crate::models::LogEntry;

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct LogList {
    #[schema(value_type = Vec<LogEntry>)]
    pub items: Vec<LogEntry>,
}
