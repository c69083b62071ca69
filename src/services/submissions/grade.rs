use chrono::Utc;
use tracing::{error, info};

use super::SubmissionService;
use crate::errors::{EduError, Result};
use crate::models::questions::entities::QuestionLevel;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::submissions::responses::{GradeOutcome, RecommendationOutcome};
use crate::models::users::entities::Identity;
use crate::services::access;
use crate::services::recommender::AdaptiveRecommender;

/// 解析分数
///
/// 空白或缺省返回 `None`（清除分数）；非数字或非有限值报错；
/// 其余向零取整后限制在 0..=10。
pub fn parse_score(raw: Option<&str>) -> Result<Option<i32>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let value: f64 = raw
        .parse()
        .map_err(|_| EduError::validation("Invalid score. Enter a number between 0-10."))?;
    if !value.is_finite() {
        return Err(EduError::validation(
            "Invalid score. Enter a number between 0-10.",
        ));
    }

    Ok(Some((value.trunc() as i64).clamp(0, 10) as i32))
}

pub async fn grade_submission(
    service: &SubmissionService,
    identity: &Identity,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> Result<GradeOutcome> {
    access::require_teacher(identity)?;
    let storage = service.storage();
    let not_found = || EduError::not_found("Submission not found");

    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(not_found)?;
    let assignment = match storage.get_assignment_by_id(submission.assignment_id).await? {
        Some(a) if a.created_by == identity.id => a,
        _ => return Err(not_found()),
    };

    // 解析失败时不写入任何数据
    let score = parse_score(req.score.as_deref())?;

    let graded = storage
        .grade_submission(submission.id, score, req.feedback.trim(), Utc::now())
        .await?
        .ok_or_else(not_found)?;

    info!(
        "Teacher {} graded submission {}: {:?}/10",
        identity.id, graded.id, graded.score
    );

    let recommendation = match score {
        Some(score) => {
            let recommender = AdaptiveRecommender::new(storage.clone());
            let outcome = match recommender
                .recommend(&assignment, graded.student_id, score, identity.id)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "Adaptive recommendation failed for submission {}: {}",
                        graded.id, e
                    );
                    RecommendationOutcome::Failed {
                        level: QuestionLevel::from_score(score),
                        message: e.message().to_string(),
                    }
                }
            };
            Some(outcome)
        }
        None => None,
    };

    Ok(GradeOutcome {
        submission: graded,
        recommendation,
    })
}
