pub mod create;
pub mod delete;
pub mod worksheet;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::assignments::responses::{DeleteAssignmentResponse, Worksheet};
use crate::models::users::entities::Identity;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Arc<dyn Storage>,
}

impl AssignmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 为本人课程布置作业
    pub async fn create_assignment(
        &self,
        identity: &Identity,
        subject_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, identity, subject_id, req).await
    }

    /// 学生作答页
    pub async fn worksheet(&self, identity: &Identity, assignment_id: i64) -> Result<Worksheet> {
        worksheet::worksheet(self, identity, assignment_id).await
    }

    /// 删除本人布置的作业
    pub async fn delete_assignment(
        &self,
        identity: &Identity,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse> {
        delete::delete_assignment(self, identity, assignment_id).await
    }
}
