use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 手动布置作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub topic: String,
    #[serde(default)]
    pub description: String,
    /// 不填则为当前时间
    pub announced_at: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub due_at: DateTime<Utc>,
    pub attachment: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<i64>,
}
