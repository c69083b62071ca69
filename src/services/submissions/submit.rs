use serde_json::{Map, Value};
use tracing::info;

use super::SubmissionService;
use crate::errors::{EduError, Result};
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::models::users::entities::Identity;
use crate::services::access;

pub async fn submit(
    service: &SubmissionService,
    identity: &Identity,
    assignment_id: i64,
    req: SubmitAssignmentRequest,
) -> Result<Submission> {
    let storage = service.storage();
    let (assignment, _subject) = access::visible_assignment(storage, identity, assignment_id).await?;

    if storage
        .get_submission_by_assignment_and_student(assignment.id, identity.id)
        .await?
        .is_some()
    {
        return Err(EduError::already_submitted(
            "You have already submitted this assignment",
        ));
    }

    let (questions, _source) = access::worksheet_questions(storage, &assignment).await?;
    if questions.is_empty() {
        return Err(EduError::validation(
            "No questions available for this assignment",
        ));
    }

    // 只收集展示给学生的题目，缺失的答案记为空串
    let mut answers = Map::new();
    for question in &questions {
        let key = question.id.to_string();
        let text = req
            .answers
            .get(&key)
            .map(|a| a.trim().to_string())
            .unwrap_or_default();
        answers.insert(key, Value::String(text));
    }

    let has_content = answers
        .values()
        .any(|v| v.as_str().is_some_and(|s| !s.is_empty()));
    if !has_content {
        return Err(EduError::validation(
            "No answers provided. Submission not saved.",
        ));
    }

    let raw = serde_json::to_string(&Value::Object(answers))?;
    let submission = storage
        .create_submission(assignment.id, identity.id, &raw)
        .await?;

    info!(
        "Student {} submitted assignment {} (submission {})",
        identity.id, assignment.id, submission.id
    );
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;

    fn answers(pairs: &[(i64, &str)]) -> SubmitAssignmentRequest {
        SubmitAssignmentRequest {
            answers: pairs
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_blank_answers_are_rejected() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let q1 = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q1").await;
        let q2 = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q2").await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q1.id, q2.id])
                .await;

        let service = SubmissionService::new(storage.clone());
        let err = service
            .submit(&student, assignment.id, answers(&[(q1.id, "  "), (q2.id, "")]))
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::Validation(_)));
        assert!(
            storage
                .get_submission_by_assignment_and_student(assignment.id, student.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_submit_stores_trimmed_answers_once() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let q1 = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q1").await;
        let q2 = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q2").await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q1.id, q2.id])
                .await;

        let service = SubmissionService::new(storage.clone());
        let submission = service
            .submit(
                &student,
                assignment.id,
                answers(&[(q1.id, " x = 4 "), (999, "ignored")]),
            )
            .await
            .unwrap();
        assert!(submission.is_submitted);
        let map = submission.answer_map();
        assert_eq!(map.get(&q1.id.to_string()).map(String::as_str), Some("x = 4"));
        assert_eq!(map.get(&q2.id.to_string()).map(String::as_str), Some(""));
        assert!(!map.contains_key("999"));

        let err = service
            .submit(&student, assignment.id, answers(&[(q1.id, "again")]))
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::AlreadySubmitted(_)));
    }

    #[tokio::test]
    async fn test_topic_fallback_and_no_questions() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let bank =
            test_support::question(&storage, None, "Geometry", QuestionLevel::High, "angles?").await;
        let with_fallback =
            test_support::assignment(&storage, &subject, &teacher, "Geometry", vec![]).await;
        let empty = test_support::assignment(&storage, &subject, &teacher, "Poetry", vec![]).await;

        let service = SubmissionService::new(storage.clone());
        let submission = service
            .submit(&student, with_fallback.id, answers(&[(bank.id, "90")]))
            .await
            .unwrap();
        assert_eq!(submission.assignment_id, with_fallback.id);

        let err = service
            .submit(&student, empty.id, answers(&[(bank.id, "90")]))
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::Validation(_)));
    }

    #[tokio::test]
    async fn test_not_enrolled_is_not_found() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let outsider = test_support::student(&storage, "outsider").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![q.id]).await;

        let err = SubmissionService::new(storage.clone())
            .submit(&outsider, assignment.id, answers(&[(q.id, "x")]))
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::NotFound(_)));
    }
}
