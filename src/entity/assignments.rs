//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub topic: String,
    pub topic_key: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub announced_at: i64,
    pub due_at: i64,
    pub attachment: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub is_adaptive: bool,
    pub adaptive_level: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::assignment_questions::Entity")]
    AssignmentQuestions,
    #[sea_orm(has_many = "super::assignment_recipients::Entity")]
    Recipients,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::assignment_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentQuestions.def()
    }
}

impl Related<super::assignment_recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;
        use crate::models::questions::entities::QuestionLevel;
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            subject_id: self.subject_id,
            topic: self.topic,
            description: self.description,
            announced_at: DateTime::<Utc>::from_timestamp(self.announced_at, 0)
                .unwrap_or_default(),
            due_at: DateTime::<Utc>::from_timestamp(self.due_at, 0).unwrap_or_default(),
            attachment: self.attachment,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            is_adaptive: self.is_adaptive,
            adaptive_level: self
                .adaptive_level
                .and_then(|level| level.parse::<QuestionLevel>().ok()),
        }
    }
}
