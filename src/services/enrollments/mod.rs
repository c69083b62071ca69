pub mod enroll;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::enrollments::responses::{EnrolledSubject, EnrollmentOutcome};
use crate::models::users::entities::Identity;
use crate::services::access;
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Arc<dyn Storage>,
}

impl EnrollmentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 通过选课码选课（幂等）
    pub async fn enroll(&self, identity: &Identity, code: &str) -> Result<EnrollmentOutcome> {
        enroll::enroll(self, identity, code).await
    }

    /// 列出学生已选课程
    pub async fn list_enrollments(&self, identity: &Identity) -> Result<Vec<EnrolledSubject>> {
        access::require_student(identity)?;
        self.storage.list_enrollments_by_student(identity.id).await
    }
}
