use serde::{Deserialize, Serialize};

/// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    /// 6 位选课码，仅包含大写字母和数字
    pub code: String,
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
