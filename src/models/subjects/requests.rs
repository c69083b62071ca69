use serde::Deserialize;

/// 创建课程请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    /// 不填则自动生成
    pub code: Option<String>,
}

/// 选课请求
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub code: String,
}
