use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Entity as Users};
use crate::errors::{EduError, Result};
use crate::models::users::entities::{User, UserRole};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 写入用户镜像
    pub async fn create_user_impl(
        &self,
        username: &str,
        email: &str,
        role: UserRole,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            role: Set(role.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }
}
