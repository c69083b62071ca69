use tracing::info;

use super::AssignmentService;
use crate::errors::{EduError, Result};
use crate::models::assignments::responses::DeleteAssignmentResponse;
use crate::models::users::entities::Identity;
use crate::services::access;

pub async fn delete_assignment(
    service: &AssignmentService,
    identity: &Identity,
    assignment_id: i64,
) -> Result<DeleteAssignmentResponse> {
    access::require_teacher(identity)?;
    let storage = service.storage();

    let assignment = match storage.get_assignment_by_id(assignment_id).await? {
        Some(a) if a.created_by == identity.id => a,
        _ => return Err(EduError::not_found("Assignment not found")),
    };

    let removed_submissions = storage.count_submissions_by_assignment(assignment.id).await?;
    storage.delete_assignment(assignment.id).await?;
    info!(
        "Assignment \"{}\" deleted! ({} submissions removed.)",
        assignment.topic, removed_submissions
    );

    Ok(DeleteAssignmentResponse {
        assignment_id: assignment.id,
        removed_submissions,
    })
}
