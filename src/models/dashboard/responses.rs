use serde::Serialize;

use crate::models::assignments::responses::AssignmentCard;
use crate::models::enrollments::responses::EnrolledSubject;
use crate::models::subjects::entities::Subject;
use crate::models::submissions::entities::Submission;

/// 教师首页
#[derive(Debug, Clone, Serialize)]
pub struct TeacherDashboard {
    pub subjects: Vec<Subject>,
    /// 本人布置的作业，按截止时间升序
    pub assignments: Vec<AssignmentCard>,
    /// 本人作业收到的提交，最新在前
    pub submissions: Vec<Submission>,
}

/// 学生首页
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub enrollments: Vec<EnrolledSubject>,
    /// 已选课程中尚未截止的作业
    pub assignments: Vec<AssignmentCard>,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}
