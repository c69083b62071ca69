pub mod create;
pub mod delete;
pub mod detail;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::subjects::entities::Subject;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::subjects::responses::{
    DeleteSubjectResponse, StudentSubjectDetail, TeacherSubjectDetail,
};
use crate::models::users::entities::Identity;
use crate::storage::Storage;

pub struct SubjectService {
    storage: Arc<dyn Storage>,
}

impl SubjectService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 创建课程
    pub async fn create_subject(
        &self,
        identity: &Identity,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        create::create_subject(self, identity, req).await
    }

    /// 列出课程：教师为本人课程，学生为已选课程
    pub async fn list_subjects(&self, identity: &Identity) -> Result<Vec<Subject>> {
        if identity.is_teacher() {
            self.storage.list_subjects_by_teacher(identity.id).await
        } else {
            Ok(self
                .storage
                .list_enrollments_by_student(identity.id)
                .await?
                .into_iter()
                .map(|e| e.subject)
                .collect())
        }
    }

    /// 教师课程详情
    pub async fn teacher_detail(
        &self,
        identity: &Identity,
        subject_id: i64,
    ) -> Result<TeacherSubjectDetail> {
        detail::teacher_detail(self, identity, subject_id).await
    }

    /// 学生课程详情
    pub async fn student_detail(
        &self,
        identity: &Identity,
        subject_id: i64,
    ) -> Result<StudentSubjectDetail> {
        detail::student_detail(self, identity, subject_id).await
    }

    /// 删除课程
    pub async fn delete_subject(
        &self,
        identity: &Identity,
        subject_id: i64,
    ) -> Result<DeleteSubjectResponse> {
        delete::delete_subject(self, identity, subject_id).await
    }
}
