use std::collections::BTreeSet;

use chrono::Utc;
use tracing::info;

use super::AssignmentService;
use crate::errors::{EduError, Result};
use crate::models::assignments::entities::{Assignment, NewAssignment};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::Identity;
use crate::services::access;
use crate::utils::validate::validate_topic;

pub async fn create_assignment(
    service: &AssignmentService,
    identity: &Identity,
    subject_id: i64,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let storage = service.storage();
    let subject = access::owned_subject(storage, identity, subject_id).await?;

    validate_topic(&req.topic).map_err(EduError::validation)?;
    let announced_at = req.announced_at.unwrap_or_else(Utc::now);
    if req.due_at <= announced_at {
        return Err(EduError::validation(
            "Due date must be after the announcement date",
        ));
    }

    // 去重并保持请求中的顺序
    let mut seen = BTreeSet::new();
    let question_ids: Vec<i64> = req
        .question_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    let found = storage.get_questions_by_ids(&question_ids).await?;
    if found.len() != question_ids.len() {
        let missing: Vec<String> = question_ids
            .iter()
            .filter(|id| !found.iter().any(|q| q.id == **id))
            .map(|id| id.to_string())
            .collect();
        return Err(EduError::validation(format!(
            "Unknown question ids: {}",
            missing.join(", ")
        )));
    }

    let attachment = req
        .attachment
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    let assignment = storage
        .create_assignment(NewAssignment {
            subject_id: subject.id,
            topic: req.topic.trim().to_string(),
            description: req.description.trim().to_string(),
            announced_at,
            due_at: req.due_at,
            attachment,
            created_by: identity.id,
            question_ids,
        })
        .await?;

    info!(
        "Assignment created for {} in {} ({} questions)",
        assignment.topic,
        subject.name,
        found.len()
    );
    Ok(assignment)
}
