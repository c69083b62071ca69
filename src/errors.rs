//! 统一错误处理模块
//!
//! 错误类型由宏生成，每个变体带有错误代码、类型名称和详情。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成 enum 定义、code()/error_type()/message() 以及 snake_case 构造函数。
macro_rules! define_edu_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EduError {
            $($variant(String),)*
        }

        impl EduError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl EduError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_edu_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Serialization("E005", "Serialization Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Authentication("E008", "Authentication Error"),
    Authorization("E009", "Authorization Error"),
    InvalidCode("E010", "Invalid Subject Code"),
    AlreadySubmitted("E011", "Already Submitted"),
    Conflict("E012", "Resource Conflict"),
    Import("E013", "Import Error"),
}

impl EduError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于服务内部故障（需要记录日志，不向客户端暴露细节）
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EduError::DatabaseConfig(_)
                | EduError::DatabaseConnection(_)
                | EduError::DatabaseOperation(_)
                | EduError::FileOperation(_)
                | EduError::Serialization(_)
        )
    }
}

impl fmt::Display for EduError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduError {}

impl From<sea_orm::DbErr> for EduError {
    fn from(err: sea_orm::DbErr) -> Self {
        EduError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EduError {
    fn from(err: std::io::Error) -> Self {
        EduError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EduError {
    fn from(err: serde_json::Error) -> Self {
        EduError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for EduError {
    fn from(err: csv::Error) -> Self {
        EduError::Import(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduError::database_config("test").code(), "E001");
        assert_eq!(EduError::validation("test").code(), "E006");
        assert_eq!(EduError::not_found("test").code(), "E007");
        assert_eq!(EduError::invalid_code("test").code(), "E010");
        assert_eq!(EduError::already_submitted("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduError::invalid_code("test").error_type(),
            "Invalid Subject Code"
        );
        assert_eq!(EduError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_error_message() {
        let err = EduError::validation("Invalid score");
        assert_eq!(err.message(), "Invalid score");
    }

    #[test]
    fn test_format_simple() {
        let err = EduError::not_found("Submission not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Submission not found"));
    }

    #[test]
    fn test_internal_classification() {
        assert!(EduError::from(sea_orm::DbErr::Custom("boom".into())).is_internal());
        assert!(!EduError::validation("x").is_internal());
        assert!(!EduError::already_submitted("x").is_internal());
    }
}
