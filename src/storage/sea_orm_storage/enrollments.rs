//! 选课存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{EduError, Result};
use crate::models::enrollments::{entities::Enrollment, responses::EnrolledSubject};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 获取选课记录
    pub async fn get_enrollment_impl(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(
                Condition::all()
                    .add(Column::SubjectId.eq(subject_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 创建选课记录
    pub async fn create_enrollment_impl(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(subject_id),
            student_id: Set(student_id),
            enrolled_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EduError::conflict("Already enrolled")
            } else {
                EduError::database_operation(format!("选课失败: {e}"))
            }
        })?;

        Ok(result.into_enrollment())
    }

    /// 列出学生已选课程
    pub async fn list_enrollments_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<EnrolledSubject>> {
        let rows = Enrollments::find()
            .find_also_related(Subjects)
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, subject)| {
                subject.map(|s| EnrolledSubject {
                    enrollment: enrollment.into_enrollment(),
                    subject: s.into_subject(),
                })
            })
            .collect())
    }

    /// 统计课程学生数
    pub async fn count_enrollments_by_subject_impl(&self, subject_id: i64) -> Result<u64> {
        let count = Enrollments::find()
            .filter(Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询选课人数失败: {e}")))?;

        Ok(count)
    }
}
