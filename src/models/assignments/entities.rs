use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::questions::entities::QuestionLevel;

/// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub subject_id: i64,
    pub topic: String,
    pub description: String,
    pub announced_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// 附件引用（由文件服务保存实际内容）
    pub attachment: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub is_adaptive: bool,
    pub adaptive_level: Option<QuestionLevel>,
}

impl Assignment {
    pub fn due_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }
}

/// 手动布置的作业（存储层写入用）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub subject_id: i64,
    pub topic: String,
    pub description: String,
    pub announced_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub attachment: Option<String>,
    pub created_by: i64,
    pub question_ids: Vec<i64>,
}

/// 自适应作业（存储层在一个事务内写入作业、题目关联和接收人）
#[derive(Debug, Clone)]
pub struct NewAdaptiveAssignment {
    pub subject_id: i64,
    pub topic: String,
    pub description: String,
    pub announced_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub created_by: i64,
    pub level: QuestionLevel,
    pub question_id: i64,
    pub student_id: i64,
    pub adaptive_key: String,
}

/// 作业题目来源
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// 作业直接关联的题目
    Linked,
    /// 按作业主题从题库回退查找
    TopicFallback,
    None,
}

/// 自适应去重键：`{小写主题}:{难度}`
pub fn adaptive_key(topic: &str, level: QuestionLevel) -> String {
    format!("{}:{}", crate::models::questions::entities::topic_key(topic), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_key_ignores_topic_case() {
        assert_eq!(
            adaptive_key("Fractions", QuestionLevel::Low),
            adaptive_key(" fractions", QuestionLevel::Low)
        );
        assert_eq!(adaptive_key("Algebra", QuestionLevel::High), "algebra:high");
    }
}
