use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    /// 原始答案 JSON（题目 ID 字符串 → 答案），无法解析时为 null
    pub answers: Value,
    pub submitted_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub feedback: String,
    pub graded_at: Option<DateTime<Utc>>,
    /// 是否为有效提交（存在非空答案）
    pub is_submitted: bool,
}

impl Submission {
    /// 解析为题目 ID → 答案文本，非字符串值按 JSON 文本展示
    pub fn answer_map(&self) -> std::collections::BTreeMap<String, String> {
        match &self.answers {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect(),
            _ => Default::default(),
        }
    }
}

/// 判断原始答案是否包含实际内容
///
/// 对象：任一值去空白后非空；数组：任一元素去空白后非空；
/// 其他 JSON 值按真值判断；无法解析视为无答案。
pub fn has_real_answers(raw: &str) -> bool {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map.values().any(value_has_content),
        Ok(Value::Array(items)) => items.iter().any(value_has_content),
        Ok(other) => is_truthy(&other),
        Err(_) => false,
    }
}

fn value_has_content(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        other => is_truthy(other),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_object_is_not_submitted() {
        assert!(!has_real_answers(r#"{"1": "", "2": "   "}"#));
        assert!(has_real_answers(r#"{"1": "", "2": "x = 4"}"#));
    }

    #[test]
    fn test_array_answers() {
        assert!(!has_real_answers(r#"["", "  "]"#));
        assert!(has_real_answers(r#"["", "answer"]"#));
    }

    #[test]
    fn test_other_json_and_garbage() {
        assert!(has_real_answers("42"));
        assert!(!has_real_answers("0"));
        assert!(!has_real_answers("null"));
        assert!(!has_real_answers("not json"));
        assert!(!has_real_answers(""));
    }

    #[test]
    fn test_answer_map_flattens_values() {
        let submission = Submission {
            id: 1,
            assignment_id: 1,
            student_id: 1,
            answers: serde_json::json!({"3": "yes", "4": 7, "5": null}),
            submitted_at: Utc::now(),
            score: None,
            feedback: String::new(),
            graded_at: None,
            is_submitted: true,
        };
        let map = submission.answer_map();
        assert_eq!(map.get("3").map(String::as_str), Some("yes"));
        assert_eq!(map.get("4").map(String::as_str), Some("7"));
        assert_eq!(map.get("5").map(String::as_str), Some(""));
    }
}
