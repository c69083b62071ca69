//! 数据模型定义
//!
//! 业务实体、请求与响应结构。数据库实体位于 `entity` 模块，由存储层负责转换。

pub mod assignments;
pub mod common;
pub mod dashboard;
pub mod enrollments;
pub mod questions;
pub mod subjects;
pub mod submissions;
pub mod users;

pub use common::response::ApiResponse;

use serde::Serialize;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    PayloadTooLarge = 1013,
    InternalServerError = 1500,

    // 认证错误
    AuthFailed = 2000,
    TokenExpired = 2001,

    // 课程错误
    SubjectNotFound = 3000,
    SubjectCodeInvalid = 3001,

    // 作业与提交错误
    AssignmentNotFound = 4000,
    SubmissionNotFound = 4100,
    SubmissionAlreadyExists = 4101,

    // 题库导入错误
    ImportFileMissing = 5000,
    ImportFileParseFailed = 5001,
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
