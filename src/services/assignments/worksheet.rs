use chrono::Utc;

use super::AssignmentService;
use crate::errors::Result;
use crate::models::assignments::responses::Worksheet;
use crate::models::users::entities::Identity;
use crate::services::access;

pub async fn worksheet(
    service: &AssignmentService,
    identity: &Identity,
    assignment_id: i64,
) -> Result<Worksheet> {
    let storage = service.storage();
    let (assignment, subject) =
        access::visible_assignment(storage, identity, assignment_id).await?;

    let (questions, source) = access::worksheet_questions(storage, &assignment).await?;
    let submission = storage
        .get_submission_by_assignment_and_student(assignment.id, identity.id)
        .await?;
    let answers = submission
        .as_ref()
        .map(|s| s.answer_map())
        .unwrap_or_default();

    Ok(Worksheet {
        due_passed: assignment.due_passed(Utc::now()),
        assignment,
        subject,
        questions,
        source,
        submission,
        answers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduError;
    use crate::models::assignments::entities::{NewAdaptiveAssignment, QuestionSource};
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_question_sources() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;
        test_support::question(&storage, None, "Geometry", QuestionLevel::Low, "g").await;

        let linked =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q.id]).await;
        let fallback =
            test_support::assignment(&storage, &subject, &teacher, "Geometry", vec![]).await;
        // 回退查找按主题精确匹配
        let case_mismatch =
            test_support::assignment(&storage, &subject, &teacher, "geometry", vec![]).await;

        let service = AssignmentService::new(storage.clone());
        let sheet = service.worksheet(&student, linked.id).await.unwrap();
        assert_eq!(sheet.source, QuestionSource::Linked);
        assert_eq!(sheet.questions.len(), 1);
        assert!(!sheet.due_passed);
        assert!(sheet.submission.is_none());

        let sheet = service.worksheet(&student, fallback.id).await.unwrap();
        assert_eq!(sheet.source, QuestionSource::TopicFallback);
        assert_eq!(sheet.questions[0].question, "g");

        let sheet = service.worksheet(&student, case_mismatch.id).await.unwrap();
        assert_eq!(sheet.source, QuestionSource::None);
        assert!(sheet.questions.is_empty());
    }

    #[tokio::test]
    async fn test_existing_answers_are_returned() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q.id]).await;
        let raw = format!(r#"{{"{}": "x = 2"}}"#, q.id);
        storage
            .create_submission(assignment.id, student.id, &raw)
            .await
            .unwrap();

        let sheet = AssignmentService::new(storage.clone())
            .worksheet(&student, assignment.id)
            .await
            .unwrap();
        assert!(sheet.submission.is_some());
        assert_eq!(
            sheet.answers.get(&q.id.to_string()).map(String::as_str),
            Some("x = 2")
        );
    }

    #[tokio::test]
    async fn test_adaptive_visible_only_to_recipient() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let classmate = test_support::student(&storage, "mate").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        test_support::enroll(&storage, &subject, &classmate).await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;
        let now = Utc::now();
        let adaptive = storage
            .create_adaptive_assignment(NewAdaptiveAssignment {
                subject_id: subject.id,
                topic: "Algebra".to_string(),
                description: "follow-up".to_string(),
                announced_at: now,
                due_at: now + chrono::Duration::days(7),
                created_by: teacher.id,
                level: QuestionLevel::Low,
                question_id: q.id,
                student_id: student.id,
                adaptive_key: "algebra:low".to_string(),
            })
            .await
            .unwrap()
            .unwrap();

        let service = AssignmentService::new(storage.clone());
        assert!(service.worksheet(&student, adaptive.id).await.is_ok());
        let err = service.worksheet(&classmate, adaptive.id).await.unwrap_err();
        assert!(matches!(err, EduError::NotFound(_)));
    }
}
