use tracing::info;

use super::SubmissionService;
use crate::errors::{EduError, Result};
use crate::models::submissions::responses::DeleteSubmissionResponse;
use crate::models::users::entities::Identity;
use crate::services::access;

pub async fn delete_submission(
    service: &SubmissionService,
    identity: &Identity,
    submission_id: i64,
) -> Result<DeleteSubmissionResponse> {
    access::require_student(identity)?;
    let storage = service.storage();

    // 他人的提交与不存在的提交返回相同结果
    let submission = match storage.get_submission_by_id(submission_id).await? {
        Some(s) if s.student_id == identity.id => s,
        _ => {
            return Err(EduError::not_found(
                "The submission you're trying to delete wasn't found",
            ));
        }
    };

    storage.delete_submission(submission.id).await?;
    info!(
        "Student {} deleted submission {} for assignment {}",
        identity.id, submission.id, submission.assignment_id
    );

    Ok(DeleteSubmissionResponse {
        submission_id: submission.id,
        assignment_id: submission.assignment_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_only_owner_can_delete() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let owner = test_support::student(&storage, "owner").await;
        let other = test_support::student(&storage, "other").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![]).await;
        let submission = storage
            .create_submission(assignment.id, owner.id, r#"{"1":"x"}"#)
            .await
            .unwrap();

        let service = SubmissionService::new(storage.clone());
        let err = service
            .delete_submission(&other, submission.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::NotFound(_)));

        let deleted = service
            .delete_submission(&owner, submission.id)
            .await
            .unwrap();
        assert_eq!(deleted.assignment_id, assignment.id);
        assert!(
            storage
                .get_submission_by_id(submission.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
