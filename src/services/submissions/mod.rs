pub mod delete;
pub mod grade;
pub mod submit;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAssignmentRequest};
use crate::models::submissions::responses::{DeleteSubmissionResponse, GradeOutcome};
use crate::models::users::entities::Identity;
use crate::storage::Storage;

pub use grade::parse_score;

pub struct SubmissionService {
    storage: Arc<dyn Storage>,
}

impl SubmissionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 学生提交作业
    pub async fn submit(
        &self,
        identity: &Identity,
        assignment_id: i64,
        req: SubmitAssignmentRequest,
    ) -> Result<Submission> {
        submit::submit(self, identity, assignment_id, req).await
    }

    /// 教师评分，数字分数会触发自适应推荐
    pub async fn grade_submission(
        &self,
        identity: &Identity,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<GradeOutcome> {
        grade::grade_submission(self, identity, submission_id, req).await
    }

    /// 学生删除本人的提交
    pub async fn delete_submission(
        &self,
        identity: &Identity,
        submission_id: i64,
    ) -> Result<DeleteSubmissionResponse> {
        delete::delete_submission(self, identity, submission_id).await
    }
}
