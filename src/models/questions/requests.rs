use serde::Deserialize;

use crate::models::questions::entities::QuestionLevel;

/// 创建单个题目请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub subject_id: Option<i64>,
    pub topic: String,
    pub level: QuestionLevel,
    pub question: String,
    #[serde(default)]
    pub hint: String,
}

/// 按主题列出课程题目
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionTopicQuery {
    pub topic: String,
}

/// 导入参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportQuestionsQuery {
    /// 为 true 时先清空题库
    #[serde(default)]
    pub clear: bool,
}
