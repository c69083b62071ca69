//! 首页聚合视图

use std::sync::Arc;

use chrono::Utc;

use crate::errors::Result;
use crate::models::dashboard::responses::{Dashboard, StudentDashboard, TeacherDashboard};
use crate::models::users::entities::{Identity, UserRole};
use crate::services::access::{self, SHORT_PREVIEW_CHARS};
use crate::storage::Storage;

pub struct DashboardService {
    storage: Arc<dyn Storage>,
}

impl DashboardService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 按角色返回首页
    pub async fn dashboard(&self, identity: &Identity) -> Result<Dashboard> {
        match identity.role {
            UserRole::Teacher => Ok(Dashboard::Teacher(self.teacher_dashboard(identity).await?)),
            UserRole::Student => Ok(Dashboard::Student(self.student_dashboard(identity).await?)),
        }
    }

    pub async fn teacher_dashboard(&self, identity: &Identity) -> Result<TeacherDashboard> {
        access::require_teacher(identity)?;
        let subjects = self.storage.list_subjects_by_teacher(identity.id).await?;
        let assignments = self.storage.list_assignments_by_creator(identity.id).await?;
        let assignments =
            access::build_cards(&self.storage, assignments, SHORT_PREVIEW_CHARS).await?;
        let submissions = self.storage.list_submissions_by_creator(identity.id).await?;

        Ok(TeacherDashboard {
            subjects,
            assignments,
            submissions,
        })
    }

    pub async fn student_dashboard(&self, identity: &Identity) -> Result<StudentDashboard> {
        access::require_student(identity)?;
        let enrollments = self.storage.list_enrollments_by_student(identity.id).await?;
        let assignments = self
            .storage
            .list_open_assignments_for_student(identity.id, None, Utc::now())
            .await?;
        let assignments =
            access::build_cards(&self.storage, assignments, SHORT_PREVIEW_CHARS).await?;
        let submissions = self
            .storage
            .list_submissions_by_student(identity.id, None)
            .await?;

        Ok(StudentDashboard {
            enrollments,
            assignments,
            submissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::assignments::entities::NewAssignment;
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_teacher_dashboard_ordering() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        storage
            .create_subject("Art", "ART001", teacher.id)
            .await
            .unwrap();
        let now = Utc::now();
        let late = storage
            .create_assignment(NewAssignment {
                subject_id: subject.id,
                topic: "Late".to_string(),
                description: String::new(),
                announced_at: now,
                due_at: now + Duration::days(10),
                attachment: None,
                created_by: teacher.id,
                question_ids: vec![],
            })
            .await
            .unwrap();
        let soon = test_support::assignment(&storage, &subject, &teacher, "Soon", vec![]).await;
        storage
            .create_submission(late.id, student.id, r#"{"1":"a"}"#)
            .await
            .unwrap();

        let Dashboard::Teacher(board) = DashboardService::new(storage.clone())
            .dashboard(&teacher)
            .await
            .unwrap()
        else {
            panic!("expected teacher dashboard");
        };
        let names: Vec<_> = board.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Mathematics"]);
        let ids: Vec<_> = board.assignments.iter().map(|c| c.assignment.id).collect();
        assert_eq!(ids, vec![soon.id, late.id]);
        assert_eq!(board.submissions.len(), 1);
    }

    #[tokio::test]
    async fn test_student_dashboard_lists_open_work() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let other_subject = storage
            .create_subject("History", "HIS001", teacher.id)
            .await
            .unwrap();
        test_support::enroll(&storage, &subject, &student).await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;
        let open = test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q.id])
            .await;
        test_support::assignment(&storage, &other_subject, &teacher, "Wars", vec![]).await;
        let now = Utc::now();
        storage
            .create_assignment(NewAssignment {
                subject_id: subject.id,
                topic: "Closed".to_string(),
                description: String::new(),
                announced_at: now - Duration::days(3),
                due_at: now - Duration::days(1),
                attachment: None,
                created_by: teacher.id,
                question_ids: vec![],
            })
            .await
            .unwrap();

        let board = DashboardService::new(storage.clone())
            .student_dashboard(&student)
            .await
            .unwrap();
        assert_eq!(board.enrollments.len(), 1);
        assert_eq!(board.assignments.len(), 1);
        assert_eq!(board.assignments[0].assignment.id, open.id);
        assert_eq!(board.assignments[0].preview.question, "q");
        assert!(board.submissions.is_empty());
    }
}
