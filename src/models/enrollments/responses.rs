use serde::Serialize;

use crate::models::enrollments::entities::Enrollment;
use crate::models::subjects::entities::Subject;

/// 选课结果，`created` 为 false 表示此前已选过
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentOutcome {
    pub subject: Subject,
    pub enrollment: Enrollment,
    pub created: bool,
}

/// 学生已选课程
#[derive(Debug, Clone, Serialize)]
pub struct EnrolledSubject {
    pub enrollment: Enrollment,
    pub subject: Subject,
}
