use tracing::info;

use super::SubjectService;
use crate::errors::Result;
use crate::models::subjects::responses::DeleteSubjectResponse;
use crate::models::users::entities::Identity;
use crate::services::access;

/// 删除课程，选课、作业和提交随之级联删除
pub async fn delete_subject(
    service: &SubjectService,
    identity: &Identity,
    subject_id: i64,
) -> Result<DeleteSubjectResponse> {
    let storage = service.storage();
    let subject = access::owned_subject(storage, identity, subject_id).await?;

    storage.delete_subject(subject.id).await?;
    info!(
        "Subject \"{}\" ({}) deleted by {}",
        subject.name, subject.id, identity.id
    );

    Ok(DeleteSubjectResponse {
        subject_id: subject.id,
        name: subject.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduError;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_delete_cascades() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let other = test_support::teacher(&storage, "other").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let assignment =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![]).await;

        let service = SubjectService::new(storage.clone());
        let err = service.delete_subject(&other, subject.id).await.unwrap_err();
        assert!(matches!(err, EduError::NotFound(_)));

        let deleted = service.delete_subject(&teacher, subject.id).await.unwrap();
        assert_eq!(deleted.name, "Mathematics");
        assert!(storage.get_subject_by_id(subject.id).await.unwrap().is_none());
        assert!(
            storage
                .get_assignment_by_id(assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_enrollment(subject.id, student.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
