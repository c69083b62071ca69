use chrono::Utc;

use super::SubjectService;
use crate::errors::Result;
use crate::models::subjects::responses::{StudentSubjectDetail, TeacherSubjectDetail};
use crate::models::users::entities::Identity;
use crate::services::access::{self, LONG_PREVIEW_CHARS, SHORT_PREVIEW_CHARS};

pub async fn teacher_detail(
    service: &SubjectService,
    identity: &Identity,
    subject_id: i64,
) -> Result<TeacherSubjectDetail> {
    let storage = service.storage();
    let subject = access::owned_subject(storage, identity, subject_id).await?;

    let student_count = storage.count_enrollments_by_subject(subject.id).await?;
    let assignments = storage.list_assignments_by_subject(subject.id).await?;
    let assignments = access::build_cards(storage, assignments, SHORT_PREVIEW_CHARS).await?;
    let submissions = storage.list_submissions_by_subject(subject.id).await?;

    Ok(TeacherSubjectDetail {
        subject,
        student_count,
        assignments,
        submissions,
    })
}

pub async fn student_detail(
    service: &SubjectService,
    identity: &Identity,
    subject_id: i64,
) -> Result<StudentSubjectDetail> {
    let storage = service.storage();
    let subject = access::enrolled_subject(storage, identity, subject_id).await?;

    let assignments = storage
        .list_open_assignments_for_student(identity.id, Some(subject.id), Utc::now())
        .await?;
    let assignments = access::build_cards(storage, assignments, LONG_PREVIEW_CHARS).await?;
    let submissions = storage
        .list_submissions_by_student(identity.id, Some(subject.id))
        .await?;

    Ok(StudentSubjectDetail {
        subject,
        assignments,
        submissions,
    })
}
