use serde::Serialize;

use crate::models::questions::entities::QuestionLevel;
use crate::models::submissions::entities::Submission;

/// 推荐器执行结果
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    /// 已创建自适应作业
    Created {
        assignment_id: i64,
        question_id: i64,
        level: QuestionLevel,
    },
    /// 该学生在此主题和难度上已有自适应作业
    SkippedDuplicate { level: QuestionLevel },
    /// 题库中没有该主题和难度的题目
    SkippedNoQuestions { level: QuestionLevel },
    /// 推荐过程出错，评分不受影响
    Failed { level: QuestionLevel, message: String },
}

/// 评分结果
#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcome {
    pub submission: Submission,
    /// 仅在给出数字分数时存在
    pub recommendation: Option<RecommendationOutcome>,
}

/// 删除提交结果
#[derive(Debug, Clone, Serialize)]
pub struct DeleteSubmissionResponse {
    pub submission_id: i64,
    pub assignment_id: i64,
}
