//! 提交存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{EduError, Result};
use crate::models::submissions::entities::Submission;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        answers: &str,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            answers: Set(answers.to_string()),
            submitted_at: Set(now),
            score: Set(None),
            feedback: Set(String::new()),
            graded_at: Set(None),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EduError::already_submitted("You have already submitted this assignment")
            } else {
                EduError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生对某作业的提交
    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 写入评分
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        score: Option<i32>,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.score = Set(score);
        model.feedback = Set(feedback.to_string());
        model.graded_at = Set(Some(graded_at.timestamp()));

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("更新评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 删除提交
    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计作业的提交数
    pub async fn count_submissions_by_assignment_impl(&self, assignment_id: i64) -> Result<u64> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交数量失败: {e}")))?;

        Ok(count)
    }

    /// 列出教师作业收到的提交
    pub async fn list_submissions_by_creator_impl(&self, teacher_id: i64) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .inner_join(Assignments)
            .filter(AssignmentColumn::CreatedBy.eq(teacher_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出课程的提交
    pub async fn list_submissions_by_subject_impl(&self, subject_id: i64) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .inner_join(Assignments)
            .filter(AssignmentColumn::SubjectId.eq(subject_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出学生的提交
    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
    ) -> Result<Vec<Submission>> {
        let mut select = Submissions::find().filter(Column::StudentId.eq(student_id));

        // 课程筛选
        if let Some(subject_id) = subject_id {
            select = select
                .inner_join(Assignments)
                .filter(AssignmentColumn::SubjectId.eq(subject_id));
        }

        let result = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }
}
