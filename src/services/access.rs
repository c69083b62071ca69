//! 业务层共用的权限与可见性检查
//!
//! 对无权访问的资源统一返回 NotFound，不泄露资源是否存在。

use std::sync::Arc;

use crate::errors::{EduError, Result};
use crate::models::assignments::entities::{Assignment, QuestionSource};
use crate::models::assignments::responses::{AssignmentCard, QuestionPreview};
use crate::models::questions::entities::Question;
use crate::models::subjects::entities::Subject;
use crate::models::users::entities::Identity;
use crate::storage::Storage;

/// 仪表盘与教师视图的预览长度
pub const SHORT_PREVIEW_CHARS: usize = 50;
/// 学生课程详情的预览长度
pub const LONG_PREVIEW_CHARS: usize = 500;

pub(crate) fn require_teacher(identity: &Identity) -> Result<()> {
    if identity.is_teacher() {
        Ok(())
    } else {
        Err(EduError::authorization("Teacher role required"))
    }
}

pub(crate) fn require_student(identity: &Identity) -> Result<()> {
    if identity.is_student() {
        Ok(())
    } else {
        Err(EduError::authorization("Student role required"))
    }
}

/// 获取教师本人的课程
pub(crate) async fn owned_subject(
    storage: &Arc<dyn Storage>,
    identity: &Identity,
    subject_id: i64,
) -> Result<Subject> {
    require_teacher(identity)?;
    match storage.get_subject_by_id(subject_id).await? {
        Some(subject) if subject.teacher_id == identity.id => Ok(subject),
        _ => Err(EduError::not_found("Subject not found")),
    }
}

/// 获取学生已选的课程
pub(crate) async fn enrolled_subject(
    storage: &Arc<dyn Storage>,
    identity: &Identity,
    subject_id: i64,
) -> Result<Subject> {
    require_student(identity)?;
    if storage
        .get_enrollment(subject_id, identity.id)
        .await?
        .is_none()
    {
        return Err(EduError::not_found("Subject not found"));
    }
    storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| EduError::not_found("Subject not found"))
}

/// 获取学生可见的作业
///
/// 学生必须已选该课程；自适应作业只对其接收人可见。
pub(crate) async fn visible_assignment(
    storage: &Arc<dyn Storage>,
    identity: &Identity,
    assignment_id: i64,
) -> Result<(Assignment, Subject)> {
    require_student(identity)?;
    let not_found = || EduError::not_found("Assignment not found");

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(not_found)?;

    let subject = enrolled_subject(storage, identity, assignment.subject_id)
        .await
        .map_err(|e| match e {
            EduError::NotFound(_) => not_found(),
            other => other,
        })?;

    if assignment.is_adaptive
        && !storage
            .is_assignment_recipient(assignment.id, identity.id)
            .await?
    {
        return Err(not_found());
    }

    Ok((assignment, subject))
}

/// 作答时展示的题目：优先作业关联的题目，否则按主题从题库回退查找
pub(crate) async fn worksheet_questions(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
) -> Result<(Vec<Question>, QuestionSource)> {
    let linked = storage.list_assignment_questions(assignment.id).await?;
    if !linked.is_empty() {
        return Ok((linked, QuestionSource::Linked));
    }

    let fallback = storage.list_questions_by_topic(&assignment.topic).await?;
    if fallback.is_empty() {
        Ok((Vec::new(), QuestionSource::None))
    } else {
        Ok((fallback, QuestionSource::TopicFallback))
    }
}

/// 为作业附上首题预览
pub(crate) async fn build_cards(
    storage: &Arc<dyn Storage>,
    assignments: Vec<Assignment>,
    preview_chars: usize,
) -> Result<Vec<AssignmentCard>> {
    let mut cards = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let questions = storage.list_assignment_questions(assignment.id).await?;
        let preview = QuestionPreview::from_question(questions.first(), preview_chars);
        cards.push(AssignmentCard {
            assignment,
            preview,
        });
    }
    Ok(cards)
}
