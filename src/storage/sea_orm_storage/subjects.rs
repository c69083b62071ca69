//! 课程存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{EduError, Result};
use crate::models::subjects::entities::Subject;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_subject_impl(
        &self,
        name: &str,
        code: &str,
        teacher_id: i64,
    ) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            teacher_id: Set(teacher_id),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EduError::conflict(format!("选课码已存在: {code}"))
            } else {
                EduError::database_operation(format!("创建课程失败: {e}"))
            }
        })?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取课程
    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 通过选课码获取课程
    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 列出教师的课程
    pub async fn list_subjects_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Subject>> {
        let result = Subjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    /// 删除课程
    pub async fn delete_subject_impl(&self, subject_id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(subject_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
