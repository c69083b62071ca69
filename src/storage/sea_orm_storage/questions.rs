//! 题库存储操作

use super::SeaOrmStorage;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{EduError, Result};
use crate::models::questions::entities::{NewQuestion, Question, QuestionLevel, topic_key};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建题目
    pub async fn create_question_impl(&self, question: NewQuestion) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(question.subject_id),
            topic_key: Set(topic_key(&question.topic)),
            topic: Set(question.topic),
            level: Set(question.level.to_string()),
            question: Set(question.question),
            hint: Set(question.hint),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("创建题目失败: {e}")))?;

        Ok(result.into_question())
    }

    /// 通过 ID 获取题目
    pub async fn get_question_by_id_impl(&self, question_id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(question_id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 按完整身份查找题目
    pub async fn find_question_impl(&self, question: &NewQuestion) -> Result<Option<Question>> {
        let subject_cond = match question.subject_id {
            Some(id) => Column::SubjectId.eq(id),
            None => Column::SubjectId.is_null(),
        };

        let result = Questions::find()
            .filter(
                Condition::all()
                    .add(subject_cond)
                    .add(Column::Topic.eq(question.topic.as_str()))
                    .add(Column::Level.eq(question.level.as_str()))
                    .add(Column::Question.eq(question.question.as_str()))
                    .add(Column::Hint.eq(question.hint.as_str())),
            )
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 按 (主题, 题干) 查找题目
    pub async fn find_question_by_topic_and_text_impl(
        &self,
        topic: &str,
        question: &str,
    ) -> Result<Option<Question>> {
        let result = Questions::find()
            .filter(
                Condition::all()
                    .add(Column::Topic.eq(topic))
                    .add(Column::Question.eq(question)),
            )
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 批量获取题目
    pub async fn get_questions_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Questions::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 按主题（不区分大小写）和难度列出题目
    pub async fn list_questions_by_topic_and_level_impl(
        &self,
        topic: &str,
        level: QuestionLevel,
    ) -> Result<Vec<Question>> {
        let result = Questions::find()
            .filter(
                Condition::all()
                    .add(Column::TopicKey.eq(topic_key(topic)))
                    .add(Column::Level.eq(level.as_str())),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 按主题精确匹配列出题目
    pub async fn list_questions_by_topic_impl(&self, topic: &str) -> Result<Vec<Question>> {
        let result = Questions::find()
            .filter(Column::Topic.eq(topic))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 列出课程中某主题的题目
    pub async fn list_subject_questions_by_topic_impl(
        &self,
        subject_id: i64,
        topic: &str,
    ) -> Result<Vec<Question>> {
        let result = Questions::find()
            .filter(
                Condition::all()
                    .add(Column::SubjectId.eq(subject_id))
                    .add(Column::Topic.eq(topic)),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 删除指定课程下的题目，不涉及公共题目
    pub async fn delete_questions_by_subjects_impl(&self, subject_ids: &[i64]) -> Result<u64> {
        if subject_ids.is_empty() {
            return Ok(0);
        }
        let result = Questions::delete_many()
            .filter(Column::SubjectId.is_in(subject_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("清空题库失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
