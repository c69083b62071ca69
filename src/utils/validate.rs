use once_cell::sync::Lazy;
use regex::Regex;

static SUBJECT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("Invalid subject code regex"));

pub const SUBJECT_CODE_LEN: usize = 6;

/// 校验并规范化手动指定的选课码（转大写）
pub fn normalize_subject_code(code: &str) -> Result<String, &'static str> {
    let code = code.trim().to_ascii_uppercase();
    if !SUBJECT_CODE_RE.is_match(&code) {
        return Err("Subject code must be exactly 6 letters or digits");
    }
    Ok(code)
}

pub fn validate_subject_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Subject name is required");
    }
    if len > 100 {
        return Err("Subject name must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_topic(topic: &str) -> Result<(), &'static str> {
    let len = topic.trim().chars().count();
    if len == 0 {
        return Err("Topic is required");
    }
    if len > 100 {
        return Err("Topic must be at most 100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_code_is_uppercased() {
        assert_eq!(normalize_subject_code("ab12cd"), Ok("AB12CD".to_string()));
        assert_eq!(normalize_subject_code(" XY9Z00 "), Ok("XY9Z00".to_string()));
    }

    #[test]
    fn test_subject_code_rejects_bad_input() {
        assert!(normalize_subject_code("ABC").is_err());
        assert!(normalize_subject_code("ABCDEFG").is_err());
        assert!(normalize_subject_code("AB-12C").is_err());
        assert!(normalize_subject_code("ÄBC123").is_err());
    }

    #[test]
    fn test_topic_and_name() {
        assert!(validate_topic("   ").is_err());
        assert!(validate_topic("Fractions").is_ok());
        assert!(validate_subject_name("").is_err());
        assert!(validate_subject_name("Math").is_ok());
    }
}
