//! 作业存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::assignment_questions::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as AssignmentQuestions,
};
use crate::entity::assignment_recipients::{
    ActiveModel as RecipientActiveModel, Column as RecipientColumn, Entity as AssignmentRecipients,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::questions::Entity as Questions;
use crate::errors::{EduError, Result};
use crate::models::assignments::entities::{Assignment, NewAdaptiveAssignment, NewAssignment};
use crate::models::questions::entities::{Question, topic_key};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建作业及题目关联
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            topic_key: Set(topic_key(&req.topic)),
            topic: Set(req.topic),
            description: Set(req.description),
            announced_at: Set(req.announced_at.timestamp()),
            due_at: Set(req.due_at.timestamp()),
            attachment: Set(req.attachment),
            created_by: Set(req.created_by),
            created_at: Set(now),
            is_adaptive: Set(false),
            adaptive_level: Set(None),
            ..Default::default()
        };

        let assignment = model
            .insert(&txn)
            .await
            .map_err(|e| EduError::database_operation(format!("创建作业失败: {e}")))?;

        // 按请求顺序关联，重复的 ID 只取第一次
        let mut seen = std::collections::HashSet::new();
        for question_id in req.question_ids.into_iter().filter(|id| seen.insert(*id)) {
            Self::link_question(&txn, assignment.id, question_id).await?;
        }

        txn.commit()
            .await
            .map_err(|e| EduError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(assignment.into_assignment())
    }

    async fn link_question(
        txn: &DatabaseTransaction,
        assignment_id: i64,
        question_id: i64,
    ) -> std::result::Result<(), sea_orm::DbErr> {
        LinkActiveModel {
            assignment_id: Set(assignment_id),
            question_id: Set(question_id),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(())
    }

    /// 在一个事务中写入自适应作业、题目关联和接收人
    ///
    /// 去重键唯一约束冲突时回滚并返回 `None`。
    pub async fn create_adaptive_assignment_impl(
        &self,
        req: NewAdaptiveAssignment,
    ) -> Result<Option<Assignment>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduError::database_operation(format!("开启事务失败: {e}")))?;

        let inserted = Self::insert_adaptive_rows(&txn, &req, now).await;

        match inserted {
            Ok(assignment) => {
                txn.commit()
                    .await
                    .map_err(|e| EduError::database_operation(format!("提交事务失败: {e}")))?;
                Ok(Some(assignment.into_assignment()))
            }
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| EduError::database_operation(format!("回滚事务失败: {e}")))?;
                if is_unique_violation(&e) {
                    debug!(
                        "Adaptive key {} already taken by student {}",
                        req.adaptive_key, req.student_id
                    );
                    Ok(None)
                } else {
                    Err(EduError::database_operation(format!(
                        "创建自适应作业失败: {e}"
                    )))
                }
            }
        }
    }

    async fn insert_adaptive_rows(
        txn: &DatabaseTransaction,
        req: &NewAdaptiveAssignment,
        now: i64,
    ) -> std::result::Result<crate::entity::assignments::Model, sea_orm::DbErr> {
        let assignment = ActiveModel {
            subject_id: Set(req.subject_id),
            topic: Set(req.topic.clone()),
            topic_key: Set(topic_key(&req.topic)),
            description: Set(req.description.clone()),
            announced_at: Set(req.announced_at.timestamp()),
            due_at: Set(req.due_at.timestamp()),
            attachment: Set(None),
            created_by: Set(req.created_by),
            created_at: Set(now),
            is_adaptive: Set(true),
            adaptive_level: Set(Some(req.level.to_string())),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Self::link_question(txn, assignment.id, req.question_id).await?;

        RecipientActiveModel {
            assignment_id: Set(assignment.id),
            student_id: Set(req.student_id),
            adaptive_key: Set(Some(req.adaptive_key.clone())),
            assigned_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(assignment)
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出课程作业
    pub async fn list_assignments_by_subject_impl(&self, subject_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::SubjectId.eq(subject_id))
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 列出教师布置的作业
    pub async fn list_assignments_by_creator_impl(&self, teacher_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::CreatedBy.eq(teacher_id))
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 列出学生可见且未截止的作业
    ///
    /// 范围限定在已选课程内；自适应作业只对其接收人可见。
    pub async fn list_open_assignments_for_student_impl(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        let mut enrolled = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::SubjectId)
            .filter(EnrollmentColumn::StudentId.eq(student_id));
        if let Some(subject_id) = subject_id {
            enrolled = enrolled.filter(EnrollmentColumn::SubjectId.eq(subject_id));
        }
        let subject_ids: Vec<i64> = enrolled
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询选课记录失败: {e}")))?;

        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let targeted: Vec<i64> = AssignmentRecipients::find()
            .select_only()
            .column(RecipientColumn::AssignmentId)
            .filter(RecipientColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询定向作业失败: {e}")))?;

        let mut visibility = Condition::any().add(Column::IsAdaptive.eq(false));
        if !targeted.is_empty() {
            visibility = visibility.add(Column::Id.is_in(targeted));
        }

        let result = Assignments::find()
            .filter(Column::SubjectId.is_in(subject_ids))
            .filter(Column::DueAt.gt(now.timestamp()))
            .filter(visibility)
            .order_by_asc(Column::DueAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 列出作业关联的题目
    pub async fn list_assignment_questions_impl(&self, assignment_id: i64) -> Result<Vec<Question>> {
        let result = Questions::find()
            .inner_join(AssignmentQuestions)
            .filter(LinkColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(LinkColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业题目失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 学生是否为作业的定向接收人
    pub async fn is_assignment_recipient_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        let count = AssignmentRecipients::find()
            .filter(
                Condition::all()
                    .add(RecipientColumn::AssignmentId.eq(assignment_id))
                    .add(RecipientColumn::StudentId.eq(student_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询作业接收人失败: {e}")))?;

        Ok(count > 0)
    }

    /// 学生是否已有该去重键的自适应作业
    pub async fn has_adaptive_recipient_impl(
        &self,
        student_id: i64,
        adaptive_key: &str,
    ) -> Result<bool> {
        let count = AssignmentRecipients::find()
            .filter(
                Condition::all()
                    .add(RecipientColumn::StudentId.eq(student_id))
                    .add(RecipientColumn::AdaptiveKey.eq(adaptive_key)),
            )
            .count(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询自适应作业失败: {e}")))?;

        Ok(count > 0)
    }

    /// 删除作业（级联删除提交、题目关联和接收人）
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
