use std::collections::HashMap;

use serde::Deserialize;

/// 提交作业请求（题目 ID 字符串 → 答案）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAssignmentRequest {
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

/// 评分请求
///
/// `score` 同时接受数字和字符串，空白或缺省表示清除分数。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeSubmissionRequest {
    #[serde(default, deserialize_with = "deserialize_optional_score")]
    pub score: Option<String>,
    #[serde(default)]
    pub feedback: String,
}

// 自定义反序列化函数，把数字或字符串统一转为字符串，交给服务层解析
fn deserialize_optional_score<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Visitor};
    use std::fmt;

    struct ScoreVisitor;

    impl<'de> Visitor<'de> for ScoreVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a string or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Some(value.to_string()))
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accepts_number_and_string() {
        let req: GradeSubmissionRequest = serde_json::from_str(r#"{"score": 7.9}"#).unwrap();
        assert_eq!(req.score.as_deref(), Some("7.9"));

        let req: GradeSubmissionRequest =
            serde_json::from_str(r#"{"score": "abc", "feedback": "ok"}"#).unwrap();
        assert_eq!(req.score.as_deref(), Some("abc"));
        assert_eq!(req.feedback, "ok");

        let req: GradeSubmissionRequest = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert!(req.score.is_none());

        let req: GradeSubmissionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.score.is_none());
    }
}
