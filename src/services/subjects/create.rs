use tracing::{info, warn};

use super::SubjectService;
use crate::errors::{EduError, Result};
use crate::models::subjects::entities::Subject;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::users::entities::Identity;
use crate::services::access;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{SUBJECT_CODE_LEN, normalize_subject_code, validate_subject_name};

/// 随机选课码冲突时的最大尝试次数
const MAX_CODE_ATTEMPTS: usize = 8;

pub async fn create_subject(
    service: &SubjectService,
    identity: &Identity,
    req: CreateSubjectRequest,
) -> Result<Subject> {
    access::require_teacher(identity)?;
    validate_subject_name(&req.name).map_err(EduError::validation)?;
    let name = req.name.trim();
    let storage = service.storage();

    // 指定选课码时冲突直接返回
    if let Some(code) = req.code.as_deref().filter(|c| !c.trim().is_empty()) {
        let code = normalize_subject_code(code).map_err(EduError::validation)?;
        let subject = storage.create_subject(name, &code, identity.id).await?;
        info!("Subject {} ({}) created by {}", subject.id, code, identity.id);
        return Ok(subject);
    }

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_random_code(SUBJECT_CODE_LEN);
        match storage.create_subject(name, &code, identity.id).await {
            Ok(subject) => {
                info!("Subject {} ({}) created by {}", subject.id, code, identity.id);
                return Ok(subject);
            }
            Err(EduError::Conflict(_)) => {
                warn!("Generated subject code {} already taken, retrying", code);
            }
            Err(e) => return Err(e),
        }
    }

    Err(EduError::conflict(
        "Could not allocate a unique subject code, please retry",
    ))
}
