use tracing::debug;

use super::QuestionService;
use crate::errors::{EduError, Result};
use crate::models::questions::entities::NewQuestion;
use crate::models::questions::requests::CreateQuestionRequest;
use crate::models::questions::responses::CreateQuestionResponse;
use crate::models::users::entities::Identity;
use crate::services::access;
use crate::utils::validate::validate_topic;

pub async fn create_question(
    service: &QuestionService,
    identity: &Identity,
    req: CreateQuestionRequest,
) -> Result<CreateQuestionResponse> {
    access::require_teacher(identity)?;
    let storage = service.storage();

    if let Some(subject_id) = req.subject_id {
        access::owned_subject(storage, identity, subject_id).await?;
    }
    validate_topic(&req.topic).map_err(EduError::validation)?;
    let text = req.question.trim();
    if text.is_empty() {
        return Err(EduError::validation("Question text is required"));
    }

    let candidate = NewQuestion {
        subject_id: req.subject_id,
        topic: req.topic.trim().to_string(),
        level: req.level,
        question: text.to_string(),
        hint: req.hint.trim().to_string(),
    };

    if let Some(existing) = storage.find_question(&candidate).await? {
        debug!("Question {} already exists, reusing", existing.id);
        return Ok(CreateQuestionResponse {
            question: existing,
            created: false,
        });
    }

    let question = storage.create_question(candidate).await?;
    Ok(CreateQuestionResponse {
        question,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_create_is_get_or_create() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let service = QuestionService::new(storage.clone());
        let req = || CreateQuestionRequest {
            subject_id: Some(subject.id),
            topic: " Algebra ".to_string(),
            level: QuestionLevel::Medium,
            question: "Solve 2x = 8".to_string(),
            hint: "divide".to_string(),
        };

        let first = service.create_question(&teacher, req()).await.unwrap();
        let second = service.create_question(&teacher, req()).await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.question.id, second.question.id);
        assert_eq!(first.question.topic, "Algebra");
    }

    #[tokio::test]
    async fn test_foreign_subject_is_rejected() {
        let storage = test_support::storage().await;
        let owner = test_support::teacher(&storage, "owner").await;
        let other = test_support::teacher(&storage, "other").await;
        let subject = test_support::subject(&storage, &owner, "ABC123").await;

        let err = QuestionService::new(storage.clone())
            .create_question(
                &other,
                CreateQuestionRequest {
                    subject_id: Some(subject.id),
                    topic: "Algebra".to_string(),
                    level: QuestionLevel::Low,
                    question: "q".to_string(),
                    hint: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::NotFound(_)));
    }
}
