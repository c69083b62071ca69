use serde::Serialize;

use crate::models::assignments::responses::AssignmentCard;
use crate::models::subjects::entities::Subject;
use crate::models::submissions::entities::Submission;

/// 教师视角的课程详情
#[derive(Debug, Clone, Serialize)]
pub struct TeacherSubjectDetail {
    pub subject: Subject,
    pub student_count: u64,
    pub assignments: Vec<AssignmentCard>,
    pub submissions: Vec<Submission>,
}

/// 学生视角的课程详情
#[derive(Debug, Clone, Serialize)]
pub struct StudentSubjectDetail {
    pub subject: Subject,
    pub assignments: Vec<AssignmentCard>,
    pub submissions: Vec<Submission>,
}

/// 删除课程结果
#[derive(Debug, Clone, Serialize)]
pub struct DeleteSubjectResponse {
    pub subject_id: i64,
    pub name: String,
}
