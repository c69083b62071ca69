//! 自适应推荐
//!
//! 评分后按成绩为学生挑选同主题的后续练习，每个 (学生, 主题, 难度) 最多一份。

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::models::assignments::entities::{Assignment, NewAdaptiveAssignment, adaptive_key};
use crate::models::questions::entities::QuestionLevel;
use crate::models::submissions::responses::RecommendationOutcome;
use crate::storage::Storage;

/// 自适应作业的截止期限（天）
pub const FOLLOW_UP_DAYS: i64 = 7;

pub fn follow_up_description(topic: &str, level: QuestionLevel) -> String {
    format!("Adaptive follow-up on {topic} (Level: {level})")
}

pub struct AdaptiveRecommender {
    storage: Arc<dyn Storage>,
}

impl AdaptiveRecommender {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 根据分数为学生推荐后续练习
    ///
    /// 只会新增作业，不修改提交或题目。
    pub async fn recommend(
        &self,
        source: &Assignment,
        student_id: i64,
        score: i32,
        teacher_id: i64,
    ) -> Result<RecommendationOutcome> {
        let level = QuestionLevel::from_score(score);
        let key = adaptive_key(&source.topic, level);

        if self.storage.has_adaptive_recipient(student_id, &key).await? {
            debug!("Student {} already has adaptive work for {}", student_id, key);
            return Ok(RecommendationOutcome::SkippedDuplicate { level });
        }

        let candidates = self
            .storage
            .list_questions_by_topic_and_level(&source.topic, level)
            .await?;

        // ThreadRng 不能跨 await 持有
        let picked = {
            let mut rng = rand::rng();
            candidates.choose(&mut rng).map(|q| q.id)
        };
        let Some(question_id) = picked else {
            warn!(
                "No {} questions for topic '{}', skipping adaptive follow-up",
                level, source.topic
            );
            return Ok(RecommendationOutcome::SkippedNoQuestions { level });
        };

        let now = Utc::now();
        let created = self
            .storage
            .create_adaptive_assignment(NewAdaptiveAssignment {
                subject_id: source.subject_id,
                topic: source.topic.clone(),
                description: follow_up_description(&source.topic, level),
                announced_at: now,
                due_at: now + Duration::days(FOLLOW_UP_DAYS),
                created_by: teacher_id,
                level,
                question_id,
                student_id,
                adaptive_key: key,
            })
            .await?;

        match created {
            Some(assignment) => {
                info!(
                    "Adaptive {} assignment {} created for student {} (question {})",
                    level, assignment.id, student_id, question_id
                );
                Ok(RecommendationOutcome::Created {
                    assignment_id: assignment.id,
                    question_id,
                    level,
                })
            }
            None => Ok(RecommendationOutcome::SkippedDuplicate { level }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    #[test]
    fn test_description_format() {
        assert_eq!(
            follow_up_description("Fractions", QuestionLevel::Medium),
            "Adaptive follow-up on Fractions (Level: medium)"
        );
    }

    #[tokio::test]
    async fn test_creates_once_per_topic_and_level() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::enroll(&storage, &subject, &student).await;
        let q = test_support::question(
            &storage,
            Some(&subject),
            "fractions",
            QuestionLevel::Low,
            "1/2 + 1/4 = ?",
        )
        .await;
        let source =
            test_support::assignment(&storage, &subject, &teacher, "Fractions", vec![]).await;

        let recommender = AdaptiveRecommender::new(storage.clone());
        let first = recommender
            .recommend(&source, student.id, 3, teacher.id)
            .await
            .unwrap();
        let RecommendationOutcome::Created {
            assignment_id,
            question_id,
            level,
        } = first
        else {
            panic!("expected Created, got {first:?}");
        };
        assert_eq!(question_id, q.id);
        assert_eq!(level, QuestionLevel::Low);

        let created = storage
            .get_assignment_by_id(assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(created.is_adaptive);
        assert_eq!(created.adaptive_level, Some(QuestionLevel::Low));
        assert_eq!(created.created_by, teacher.id);
        assert_eq!(created.subject_id, subject.id);
        assert_eq!(created.description, "Adaptive follow-up on Fractions (Level: low)");
        assert_eq!(
            (created.due_at - created.announced_at).num_days(),
            FOLLOW_UP_DAYS
        );
        assert!(
            storage
                .is_assignment_recipient(assignment_id, student.id)
                .await
                .unwrap()
        );

        // 同一主题同一难度（主题大小写不同）不再创建
        let mut lower = source.clone();
        lower.topic = "FRACTIONS".to_string();
        let second = recommender
            .recommend(&lower, student.id, 2, teacher.id)
            .await
            .unwrap();
        assert_eq!(
            second,
            RecommendationOutcome::SkippedDuplicate {
                level: QuestionLevel::Low
            }
        );
        assert_eq!(
            storage
                .list_assignments_by_subject(subject.id)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_no_questions_creates_nothing() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::question(&storage, None, "Fractions", QuestionLevel::Low, "q").await;
        let source =
            test_support::assignment(&storage, &subject, &teacher, "Fractions", vec![]).await;

        let outcome = AdaptiveRecommender::new(storage.clone())
            .recommend(&source, student.id, 8, teacher.id)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            RecommendationOutcome::SkippedNoQuestions {
                level: QuestionLevel::High
            }
        );
        assert_eq!(
            storage
                .list_assignments_by_subject(subject.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_other_level_still_allowed() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "low q").await;
        test_support::question(&storage, None, "Algebra", QuestionLevel::Medium, "mid q").await;
        let source =
            test_support::assignment(&storage, &subject, &teacher, "Algebra", vec![]).await;

        let recommender = AdaptiveRecommender::new(storage.clone());
        let low = recommender
            .recommend(&source, student.id, 1, teacher.id)
            .await
            .unwrap();
        let medium = recommender
            .recommend(&source, student.id, 5, teacher.id)
            .await
            .unwrap();
        assert!(matches!(low, RecommendationOutcome::Created { .. }));
        assert!(matches!(
            medium,
            RecommendationOutcome::Created {
                level: QuestionLevel::Medium,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unique_key_closes_race() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let student = test_support::student(&storage, "stud").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let q = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "q").await;

        // 模拟两次评分都通过了去重检查后的写入
        let now = Utc::now();
        let request = NewAdaptiveAssignment {
            subject_id: subject.id,
            topic: "Algebra".to_string(),
            description: follow_up_description("Algebra", QuestionLevel::Low),
            announced_at: now,
            due_at: now + Duration::days(FOLLOW_UP_DAYS),
            created_by: teacher.id,
            level: QuestionLevel::Low,
            question_id: q.id,
            student_id: student.id,
            adaptive_key: adaptive_key("Algebra", QuestionLevel::Low),
        };
        let first = storage
            .create_adaptive_assignment(request.clone())
            .await
            .unwrap();
        let second = storage.create_adaptive_assignment(request).await.unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
        // 回滚后不留下孤立的作业
        assert_eq!(
            storage
                .list_assignments_by_subject(subject.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
