//! 题库 CSV 导入

use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;

use tracing::{info, warn};

use super::QuestionService;
use crate::errors::{EduError, Result};
use crate::models::questions::entities::{NewQuestion, QuestionLevel};
use crate::models::questions::responses::{ImportReport, ImportRowError, TopicCount};
use crate::models::users::entities::Identity;
use crate::services::access;

/// 必需列
const REQUIRED_HEADERS: [&str; 5] = ["subject", "topic", "level", "question", "hint"];

/// 导入行数据
#[derive(Debug, Clone)]
struct ImportRow {
    row_num: usize,
    subject: String,
    topic: String,
    level: String,
    question: String,
    hint: String,
}

/// 解析结果：有效行与行级错误
struct ParsedCsv {
    rows: Vec<ImportRow>,
    errors: Vec<ImportRowError>,
}

fn parse_csv(data: &[u8]) -> Result<ParsedCsv> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    // 检查表头（不区分大小写）
    let headers = rdr
        .headers()
        .map_err(|e| EduError::import(format!("Failed to read CSV headers: {e}")))?;
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|h| !header_map.contains_key(*h))
        .collect();
    if !missing.is_empty() {
        return Err(EduError::validation(format!(
            "CSV missing headers: {}",
            missing.join(", ")
        )));
    }
    let idx = |name: &str| header_map.get(name).copied().unwrap_or_default();
    let (subject_idx, topic_idx, level_idx, question_idx, hint_idx) = (
        idx("subject"),
        idx("topic"),
        idx("level"),
        idx("question"),
        idx("hint"),
    );

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row_num = i + 2; // 表头为第 1 行
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                errors.push(ImportRowError {
                    row: row_num,
                    field: None,
                    message: format!("Failed to parse row: {e}"),
                });
                continue;
            }
        };

        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(ImportRow {
            row_num,
            subject: cell(subject_idx),
            topic: cell(topic_idx),
            level: cell(level_idx),
            question: cell(question_idx),
            hint: cell(hint_idx),
        });
    }

    Ok(ParsedCsv { rows, errors })
}

fn validate_row(row: &ImportRow) -> Option<ImportRowError> {
    let missing = |field: &str| ImportRowError {
        row: row.row_num,
        field: Some(field.to_string()),
        message: format!("Missing value for '{field}'"),
    };

    if row.topic.is_empty() {
        return Some(missing("topic"));
    }
    if row.question.is_empty() {
        return Some(missing("question"));
    }
    None
}

pub async fn import_csv(
    service: &QuestionService,
    identity: &Identity,
    data: &[u8],
    clear: bool,
) -> Result<ImportReport> {
    access::require_teacher(identity)?;
    let storage = service.storage();

    // 表头错误时不清空题库
    let parsed = parse_csv(data)?;
    let mut report = ImportReport {
        total: parsed.rows.len() + parsed.errors.len(),
        errors: parsed.errors,
        ..Default::default()
    };

    // 只能清空本人课程下的题目，公共题目和其他教师的题目不受影响
    let own_subjects = storage.list_subjects_by_teacher(identity.id).await?;
    if clear {
        let subject_ids: Vec<i64> = own_subjects.iter().map(|s| s.id).collect();
        report.cleared = storage.delete_questions_by_subjects(&subject_ids).await?;
        warn!(
            "Teacher {} cleared {} questions from own subjects before import",
            identity.id, report.cleared
        );
    }

    // 课程列按名称匹配本人的课程
    let subjects: HashMap<String, i64> = own_subjects
        .into_iter()
        .map(|s| (s.name.trim().to_lowercase(), s.id))
        .collect();

    let mut unknown_levels = BTreeSet::new();
    let mut topic_counts: HashMap<String, usize> = HashMap::new();

    for row in parsed.rows {
        if let Some(err) = validate_row(&row) {
            report.errors.push(err);
            continue;
        }

        let (level, known) = QuestionLevel::normalize_import(&row.level);
        if !known {
            unknown_levels.insert(row.level.to_lowercase());
        }

        match storage
            .find_question_by_topic_and_text(&row.topic, &row.question)
            .await
        {
            Ok(Some(_)) => {
                report.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                report.errors.push(ImportRowError {
                    row: row.row_num,
                    field: None,
                    message: format!("Error: {}", e.message()),
                });
                continue;
            }
        }

        let subject_id = subjects.get(&row.subject.to_lowercase()).copied();
        let question = NewQuestion {
            subject_id,
            topic: row.topic,
            level,
            question: row.question,
            hint: row.hint,
        };

        match storage.create_question(question).await {
            Ok(created) => {
                report.inserted += 1;
                *topic_counts.entry(created.topic).or_default() += 1;
            }
            Err(e) => {
                report.errors.push(ImportRowError {
                    row: row.row_num,
                    field: None,
                    message: format!("Error: {}", e.message()),
                });
            }
        }
    }

    if !unknown_levels.is_empty() {
        warn!("Unknown levels defaulted to 'low': {:?}", unknown_levels);
    }

    let mut counts: Vec<TopicCount> = topic_counts
        .into_iter()
        .map(|(topic, count)| TopicCount { topic, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    report.topic_counts = counts;
    report.unknown_levels = unknown_levels.into_iter().collect();

    info!(
        "Question import by {}: {} rows, {} inserted, {} skipped, {} errors",
        identity.id,
        report.total,
        report.inserted,
        report.skipped,
        report.errors.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    const SAMPLE: &str = "\
Subject,Topic,Level,Question,Hint
Mathematics,Fractions,LOW,What is 1/2 + 1/2?,Add numerators
Mathematics,Fractions,MODERATE,What is 3/4 - 1/8?,Common denominator
Physics,Motion,urgent,Define velocity,
Mathematics,,high,Orphan question,
Mathematics,Fractions,High,Simplify 12/16,Divide by 4
";

    #[tokio::test]
    async fn test_import_normalizes_and_reports() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let service = QuestionService::new(storage.clone());

        let report = service
            .import_csv(&teacher, SAMPLE.as_bytes(), false)
            .await
            .unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(report.inserted, 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.unknown_levels, vec!["urgent".to_string()]);
        assert_eq!(
            report.errors,
            vec![ImportRowError {
                row: 5,
                field: Some("topic".to_string()),
                message: "Missing value for 'topic'".to_string(),
            }]
        );
        assert_eq!(
            report.topic_counts,
            vec![
                TopicCount {
                    topic: "Fractions".to_string(),
                    count: 3
                },
                TopicCount {
                    topic: "Motion".to_string(),
                    count: 1
                },
            ]
        );

        let medium = storage
            .list_questions_by_topic_and_level("fractions", QuestionLevel::Medium)
            .await
            .unwrap();
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].subject_id, Some(subject.id));

        let motion = storage
            .list_questions_by_topic_and_level("Motion", QuestionLevel::Low)
            .await
            .unwrap();
        assert_eq!(motion.len(), 1);
        assert_eq!(motion[0].subject_id, None);

        // 再次导入全部跳过
        let again = service
            .import_csv(&teacher, SAMPLE.as_bytes(), false)
            .await
            .unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 4);
        assert!(again.topic_counts.is_empty());
    }

    #[tokio::test]
    async fn test_clear_then_import() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        test_support::question(&storage, Some(&subject), "Old", QuestionLevel::Low, "stale")
            .await;

        let report = QuestionService::new(storage.clone())
            .import_csv(&teacher, SAMPLE.as_bytes(), true)
            .await
            .unwrap();
        assert_eq!(report.cleared, 1);
        assert_eq!(report.inserted, 4);
        assert!(storage.list_questions_by_topic("Old").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_only_touches_own_subjects() {
        let storage = test_support::storage().await;
        let alice = test_support::teacher(&storage, "alice").await;
        let bob = test_support::teacher(&storage, "bob").await;
        let alice_subject = test_support::subject(&storage, &alice, "ALC001").await;
        let bob_subject = test_support::subject(&storage, &bob, "BOB001").await;

        let alice_q = test_support::question(
            &storage,
            Some(&alice_subject),
            "Algebra",
            QuestionLevel::Low,
            "x + 1 = 2",
        )
        .await;
        let linked = test_support::assignment(
            &storage,
            &alice_subject,
            &alice,
            "Algebra",
            vec![alice_q.id],
        )
        .await;
        test_support::question(&storage, None, "Shared", QuestionLevel::Low, "public").await;
        test_support::question(&storage, Some(&bob_subject), "Old", QuestionLevel::Low, "bob's")
            .await;

        let report = QuestionService::new(storage.clone())
            .import_csv(&bob, SAMPLE.as_bytes(), true)
            .await
            .unwrap();
        assert_eq!(report.cleared, 1);
        assert!(storage.list_questions_by_topic("Old").await.unwrap().is_empty());

        // 其他教师的题目和作业关联保持不变
        assert_eq!(
            storage.list_questions_by_topic("Algebra").await.unwrap(),
            vec![alice_q.clone()]
        );
        let links = storage.list_assignment_questions(linked.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, alice_q.id);
        assert_eq!(storage.list_questions_by_topic("Shared").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_headers_rejected_before_clear() {
        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        test_support::question(&storage, None, "Old", QuestionLevel::Low, "kept").await;

        let err = QuestionService::new(storage.clone())
            .import_csv(&teacher, b"topic,level,question\nA,low,q\n", true)
            .await
            .unwrap_err();
        assert!(matches!(err, EduError::Validation(_)));
        assert!(err.message().contains("subject"));
        assert!(err.message().contains("hint"));
        assert_eq!(storage.list_questions_by_topic("Old").await.unwrap().len(), 1);
    }
}
