//! 业务层测试用的内存存储与数据构造

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::models::assignments::entities::{Assignment, NewAssignment};
use crate::models::questions::entities::{NewQuestion, Question, QuestionLevel};
use crate::models::subjects::entities::Subject;
use crate::models::users::entities::{Identity, UserRole};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

pub(crate) async fn storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await)
}

pub(crate) async fn teacher(storage: &Arc<dyn Storage>, name: &str) -> Identity {
    let user = storage
        .create_user(name, &format!("{name}@example.com"), UserRole::Teacher)
        .await
        .unwrap();
    Identity::from(&user)
}

pub(crate) async fn student(storage: &Arc<dyn Storage>, name: &str) -> Identity {
    let user = storage
        .create_user(name, &format!("{name}@example.com"), UserRole::Student)
        .await
        .unwrap();
    Identity::from(&user)
}

pub(crate) async fn subject(storage: &Arc<dyn Storage>, owner: &Identity, code: &str) -> Subject {
    storage
        .create_subject("Mathematics", code, owner.id)
        .await
        .unwrap()
}

pub(crate) async fn enroll(storage: &Arc<dyn Storage>, subject: &Subject, who: &Identity) {
    storage.create_enrollment(subject.id, who.id).await.unwrap();
}

pub(crate) async fn question(
    storage: &Arc<dyn Storage>,
    subject: Option<&Subject>,
    topic: &str,
    level: QuestionLevel,
    text: &str,
) -> Question {
    storage
        .create_question(NewQuestion {
            subject_id: subject.map(|s| s.id),
            topic: topic.to_string(),
            level,
            question: text.to_string(),
            hint: String::new(),
        })
        .await
        .unwrap()
}

/// 创建一份一周后截止的普通作业
pub(crate) async fn assignment(
    storage: &Arc<dyn Storage>,
    subject: &Subject,
    owner: &Identity,
    topic: &str,
    question_ids: Vec<i64>,
) -> Assignment {
    let now = Utc::now();
    storage
        .create_assignment(NewAssignment {
            subject_id: subject.id,
            topic: topic.to_string(),
            description: String::new(),
            announced_at: now,
            due_at: now + Duration::days(7),
            attachment: None,
            created_by: owner.id,
            question_ids,
        })
        .await
        .unwrap()
}
