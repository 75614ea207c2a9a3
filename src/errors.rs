//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_learnsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LearnSystemError {
            $($variant(String),)*
        }

        impl LearnSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LearnSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LearnSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LearnSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LearnSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LearnSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_learnsystem_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Serialization("E004", "Serialization Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    DateParse("E007", "Date Parse Error"),
    CachePluginNotFound("E008", "Cache Plugin Not Found"),
    // 练习提交核心的领域错误
    UnsupportedExerciseType("E101", "Unsupported Exercise Type"),
    MalformedAnswerShape("E102", "Malformed Answer Shape"),
    ConcurrentUpdateConflict("E103", "Concurrent Update Conflict"),
    BadgeRegistry("E104", "Badge Registry Error"),
}

impl LearnSystemError {
    /// 是否为瞬时错误（重试后可能成功）
    pub fn is_transient(&self) -> bool {
        matches!(self, LearnSystemError::ConcurrentUpdateConflict(_))
    }

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
}

impl fmt::Display for LearnSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LearnSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LearnSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        LearnSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LearnSystemError {
    fn from(err: std::io::Error) -> Self {
        LearnSystemError::BadgeRegistry(err.to_string())
    }
}

impl From<serde_json::Error> for LearnSystemError {
    fn from(err: serde_json::Error) -> Self {
        LearnSystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LearnSystemError {
    fn from(err: chrono::ParseError) -> Self {
        LearnSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LearnSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LearnSystemError::database_config("test").code(), "E001");
        assert_eq!(LearnSystemError::validation("test").code(), "E005");
        assert_eq!(
            LearnSystemError::unsupported_exercise_type("test").code(),
            "E101"
        );
        assert_eq!(
            LearnSystemError::concurrent_update_conflict("test").code(),
            "E103"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LearnSystemError::malformed_answer_shape("test").error_type(),
            "Malformed Answer Shape"
        );
        assert_eq!(
            LearnSystemError::not_found("test").error_type(),
            "Resource Not Found"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LearnSystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_transient() {
        assert!(LearnSystemError::concurrent_update_conflict("race").is_transient());
        assert!(!LearnSystemError::not_found("missing").is_transient());
    }

    #[test]
    fn test_format_simple() {
        let err = LearnSystemError::unsupported_exercise_type("quiz3d");
        let formatted = err.format_simple();
        assert!(formatted.contains("Unsupported Exercise Type"));
        assert!(formatted.contains("quiz3d"));
    }
}
