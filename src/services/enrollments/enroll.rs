use tracing::{debug, info};

use super::EnrollmentService;
use crate::errors::{EduError, Result};
use crate::models::enrollments::responses::EnrollmentOutcome;
use crate::models::users::entities::Identity;
use crate::services::access;

pub async fn enroll(
    service: &EnrollmentService,
    identity: &Identity,
    code: &str,
) -> Result<EnrollmentOutcome> {
    access::require_student(identity)?;
    let storage = service.storage();

    let code = code.trim();
    let subject = storage
        .get_subject_by_code(code)
        .await?
        .ok_or_else(|| EduError::invalid_code("Invalid code."))?;

    if let Some(enrollment) = storage.get_enrollment(subject.id, identity.id).await? {
        debug!(
            "Student {} already enrolled in subject {}",
            identity.id, subject.id
        );
        return Ok(EnrollmentOutcome {
            subject,
            enrollment,
            created: false,
        });
    }

    match storage.create_enrollment(subject.id, identity.id).await {
        Ok(enrollment) => {
            info!("Student {} enrolled in subject {}", identity.id, subject.id);
            Ok(EnrollmentOutcome {
                subject,
                enrollment,
                created: true,
            })
        }
        // 并发选课时唯一索引冲突，读取已存在的记录
        Err(EduError::Conflict(_)) => {
            let enrollment = storage
                .get_enrollment(subject.id, identity.id)
                .await?
                .ok_or_else(|| EduError::database_operation("选课记录丢失"))?;
            Ok(EnrollmentOutcome {
                subject,
                enrollment,
                created: false,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_enroll_twice_keeps_one_row() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "XY12Z9").await;

        let service = EnrollmentService::new(storage.clone());
        let first = service.enroll(&student, " XY12Z9 ").await.unwrap();
        let second = service.enroll(&student, "XY12Z9").await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.enrollment.id, second.enrollment.id);
        assert_eq!(first.subject.id, subject.id);

        let enrolled = service.list_enrollments(&student).await.unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(storage.count_enrollments_by_subject(subject.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_code_is_rejected() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        test_support::subject(&storage, &teacher, "XY12Z9").await;

        let service = EnrollmentService::new(storage.clone());
        let err = service.enroll(&student, "NOPE00").await.unwrap_err();
        assert!(matches!(err, EduError::InvalidCode(_)));
        assert!(service.list_enrollments(&student).await.unwrap().is_empty());

        let err = service.enroll(&teacher, "XY12Z9").await.unwrap_err();
        assert!(matches!(err, EduError::Authorization(_)));
    }
}
