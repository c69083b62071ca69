pub mod create;
pub mod import;
pub mod list;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::questions::requests::CreateQuestionRequest;
use crate::models::questions::responses::{CreateQuestionResponse, ImportReport, QuestionOption};
use crate::models::users::entities::Identity;
use crate::storage::Storage;

pub struct QuestionService {
    storage: Arc<dyn Storage>,
}

impl QuestionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 添加单个题目，完全相同的题目只保留一份
    pub async fn create_question(
        &self,
        identity: &Identity,
        req: CreateQuestionRequest,
    ) -> Result<CreateQuestionResponse> {
        create::create_question(self, identity, req).await
    }

    /// 列出课程某主题下的题目选项
    pub async fn list_topic_options(
        &self,
        identity: &Identity,
        subject_id: i64,
        topic: &str,
    ) -> Result<Vec<QuestionOption>> {
        list::list_topic_options(self, identity, subject_id, topic).await
    }

    /// 从 CSV 导入题库
    pub async fn import_csv(
        &self,
        identity: &Identity,
        data: &[u8],
        clear: bool,
    ) -> Result<ImportReport> {
        import::import_csv(self, identity, data, clear).await
    }
}
