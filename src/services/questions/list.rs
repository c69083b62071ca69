use super::QuestionService;
use crate::errors::{EduError, Result};
use crate::models::assignments::responses::truncate_chars;
use crate::models::questions::responses::QuestionOption;
use crate::models::users::entities::Identity;
use crate::services::access;

/// 选项标签的最大字符数
const OPTION_LABEL_CHARS: usize = 60;

pub async fn list_topic_options(
    service: &QuestionService,
    identity: &Identity,
    subject_id: i64,
    topic: &str,
) -> Result<Vec<QuestionOption>> {
    let storage = service.storage();
    let subject = access::owned_subject(storage, identity, subject_id).await?;

    if topic.trim().is_empty() {
        return Err(EduError::validation("No topic provided"));
    }

    let questions = storage
        .list_subject_questions_by_topic(subject.id, topic)
        .await?;
    Ok(questions
        .into_iter()
        .map(|q| QuestionOption {
            id: q.id,
            label: truncate_chars(&q.question, OPTION_LABEL_CHARS),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionLevel;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_options_are_scoped_and_truncated() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let long = "y".repeat(61);
        test_support::question(&storage, Some(&subject), "Algebra", QuestionLevel::Low, &long)
            .await;
        test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "bank only").await;

        let service = QuestionService::new(storage.clone());
        let options = service
            .list_topic_options(&teacher, subject.id, "Algebra")
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, format!("{}...", "y".repeat(60)));

        let err = service
            .list_topic_options(&teacher, subject.id, " ")
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::Validation(_)));
    }
}
