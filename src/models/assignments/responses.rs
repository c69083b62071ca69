use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::assignments::entities::{Assignment, QuestionSource};
use crate::models::questions::entities::Question;
use crate::models::subjects::entities::Subject;
use crate::models::submissions::entities::Submission;

pub const NO_QUESTION_AVAILABLE: &str = "No question available";

/// 作业首题预览
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionPreview {
    pub question: String,
    pub hint: String,
}

impl QuestionPreview {
    /// 按字符截断首题文本，超出部分以 `...` 结尾
    pub fn from_question(question: Option<&Question>, max_chars: usize) -> Self {
        match question {
            Some(q) => Self {
                question: truncate_chars(&q.question, max_chars),
                hint: q.hint.clone(),
            },
            None => Self {
                question: NO_QUESTION_AVAILABLE.to_string(),
                hint: String::new(),
            },
        }
    }
}

/// 作业卡片：实体本身加上展示用的预览，实体不做修改
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentCard {
    pub assignment: Assignment,
    pub preview: QuestionPreview,
}

/// 学生作答页
#[derive(Debug, Clone, Serialize)]
pub struct Worksheet {
    pub assignment: Assignment,
    pub subject: Subject,
    pub questions: Vec<Question>,
    pub source: QuestionSource,
    pub due_passed: bool,
    pub submission: Option<Submission>,
    /// 已提交答案（题目 ID 字符串 → 答案）
    pub answers: BTreeMap<String, String>,
}

/// 删除作业结果
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAssignmentResponse {
    pub assignment_id: i64,
    pub removed_submissions: u64,
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("短文本", 50), "短文本");
        assert_eq!(truncate_chars("一二三四五", 3), "一二三...");
    }

    #[test]
    fn test_preview_without_question() {
        let preview = QuestionPreview::from_question(None, 50);
        assert_eq!(preview.question, NO_QUESTION_AVAILABLE);
        assert!(preview.hint.is_empty());
    }
}
