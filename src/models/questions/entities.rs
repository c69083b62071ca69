use serde::{Deserialize, Serialize};

/// 题目难度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionLevel {
    Low,
    Medium,
    High,
}

impl QuestionLevel {
    pub const LOW: &'static str = "low";
    pub const MEDIUM: &'static str = "medium";
    pub const HIGH: &'static str = "high";

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionLevel::Low => Self::LOW,
            QuestionLevel::Medium => Self::MEDIUM,
            QuestionLevel::High => Self::HIGH,
        }
    }

    /// 按成绩选择后续练习难度：<4 低，<7 中，其余高
    pub fn from_score(score: i32) -> Self {
        if score < 4 {
            QuestionLevel::Low
        } else if score < 7 {
            QuestionLevel::Medium
        } else {
            QuestionLevel::High
        }
    }

    /// 导入时的难度归一化
    ///
    /// 返回 `(难度, 是否为已知写法)`，未知写法按低难度处理。
    pub fn normalize_import(raw: &str) -> (Self, bool) {
        match raw.trim().to_lowercase().as_str() {
            "low" => (QuestionLevel::Low, true),
            "moderate" | "medium" => (QuestionLevel::Medium, true),
            "high" => (QuestionLevel::High, true),
            _ => (QuestionLevel::Low, false),
        }
    }
}

impl std::fmt::Display for QuestionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::LOW => Ok(QuestionLevel::Low),
            Self::MEDIUM => Ok(QuestionLevel::Medium),
            Self::HIGH => Ok(QuestionLevel::High),
            _ => Err(format!("Invalid question level: {s}")),
        }
    }
}

/// 题目实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub topic: String,
    pub level: QuestionLevel,
    pub question: String,
    pub hint: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 新题目（存储层写入用）
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub subject_id: Option<i64>,
    pub topic: String,
    pub level: QuestionLevel,
    pub question: String,
    pub hint: String,
}

/// 主题的规范化键，用于不区分大小写的匹配
pub fn topic_key(topic: &str) -> String {
    topic.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(QuestionLevel::from_score(0), QuestionLevel::Low);
        assert_eq!(QuestionLevel::from_score(3), QuestionLevel::Low);
        assert_eq!(QuestionLevel::from_score(4), QuestionLevel::Medium);
        assert_eq!(QuestionLevel::from_score(6), QuestionLevel::Medium);
        assert_eq!(QuestionLevel::from_score(7), QuestionLevel::High);
        assert_eq!(QuestionLevel::from_score(10), QuestionLevel::High);
    }

    #[test]
    fn test_normalize_import_level() {
        assert_eq!(
            QuestionLevel::normalize_import("MODERATE"),
            (QuestionLevel::Medium, true)
        );
        assert_eq!(
            QuestionLevel::normalize_import(" High "),
            (QuestionLevel::High, true)
        );
        assert_eq!(
            QuestionLevel::normalize_import("urgent"),
            (QuestionLevel::Low, false)
        );
        assert_eq!(
            QuestionLevel::normalize_import(""),
            (QuestionLevel::Low, false)
        );
    }

    #[test]
    fn test_topic_key_is_case_insensitive() {
        assert_eq!(topic_key("  Fractions "), topic_key("FRACTIONS"));
    }
}
