use serde::Serialize;

use crate::models::questions::entities::Question;

/// 创建题目结果，`created` 为 false 表示题库中已存在相同题目
#[derive(Debug, Clone, Serialize)]
pub struct CreateQuestionResponse {
    pub question: Question,
    pub created: bool,
}

/// 题目下拉选项
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionOption {
    pub id: i64,
    pub label: String,
}

/// 导入行错误
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportRowError {
    pub row: usize,
    pub field: Option<String>,
    pub message: String,
}

/// 主题导入数量
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// 题库导入报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub cleared: u64,
    pub topic_counts: Vec<TopicCount>,
    pub unknown_levels: Vec<String>,
    pub errors: Vec<ImportRowError>,
}
