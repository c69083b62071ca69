//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod enrollments;
mod questions;
mod subjects;
mod submissions;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{EduError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EduError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EduError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 内存 SQLite（单连接，连接关闭即数据消失）
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid in-memory url")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .expect("in-memory sqlite");

        Self::from_connection(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
            .await
            .expect("migrations")
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::models::{
    assignments::entities::{Assignment, NewAdaptiveAssignment, NewAssignment},
    enrollments::{entities::Enrollment, responses::EnrolledSubject},
    questions::entities::{NewQuestion, Question, QuestionLevel},
    subjects::entities::Subject,
    submissions::entities::Submission,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, username: &str, email: &str, role: UserRole) -> Result<User> {
        self.create_user_impl(username, email, role).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 课程模块
    async fn create_subject(&self, name: &str, code: &str, teacher_id: i64) -> Result<Subject> {
        self.create_subject_impl(name, code, teacher_id).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn list_subjects_by_teacher(&self, teacher_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_by_teacher_impl(teacher_id).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    // 选课模块
    async fn get_enrollment(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(subject_id, student_id).await
    }

    async fn create_enrollment(&self, subject_id: i64, student_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(subject_id, student_id).await
    }

    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<EnrolledSubject>> {
        self.list_enrollments_by_student_impl(student_id).await
    }

    async fn count_enrollments_by_subject(&self, subject_id: i64) -> Result<u64> {
        self.count_enrollments_by_subject_impl(subject_id).await
    }

    // 题库模块
    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(question_id).await
    }

    async fn find_question(&self, question: &NewQuestion) -> Result<Option<Question>> {
        self.find_question_impl(question).await
    }

    async fn find_question_by_topic_and_text(
        &self,
        topic: &str,
        question: &str,
    ) -> Result<Option<Question>> {
        self.find_question_by_topic_and_text_impl(topic, question)
            .await
    }

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>> {
        self.get_questions_by_ids_impl(ids).await
    }

    async fn list_questions_by_topic_and_level(
        &self,
        topic: &str,
        level: QuestionLevel,
    ) -> Result<Vec<Question>> {
        self.list_questions_by_topic_and_level_impl(topic, level)
            .await
    }

    async fn list_questions_by_topic(&self, topic: &str) -> Result<Vec<Question>> {
        self.list_questions_by_topic_impl(topic).await
    }

    async fn list_subject_questions_by_topic(
        &self,
        subject_id: i64,
        topic: &str,
    ) -> Result<Vec<Question>> {
        self.list_subject_questions_by_topic_impl(subject_id, topic)
            .await
    }

    async fn delete_questions_by_subjects(&self, subject_ids: &[i64]) -> Result<u64> {
        self.delete_questions_by_subjects_impl(subject_ids).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn create_adaptive_assignment(
        &self,
        assignment: NewAdaptiveAssignment,
    ) -> Result<Option<Assignment>> {
        self.create_adaptive_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_by_subject(&self, subject_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_subject_impl(subject_id).await
    }

    async fn list_assignments_by_creator(&self, teacher_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_creator_impl(teacher_id).await
    }

    async fn list_open_assignments_for_student(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Assignment>> {
        self.list_open_assignments_for_student_impl(student_id, subject_id, now)
            .await
    }

    async fn list_assignment_questions(&self, assignment_id: i64) -> Result<Vec<Question>> {
        self.list_assignment_questions_impl(assignment_id).await
    }

    async fn is_assignment_recipient(&self, assignment_id: i64, student_id: i64) -> Result<bool> {
        self.is_assignment_recipient_impl(assignment_id, student_id)
            .await
    }

    async fn has_adaptive_recipient(&self, student_id: i64, adaptive_key: &str) -> Result<bool> {
        self.has_adaptive_recipient_impl(student_id, adaptive_key)
            .await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        answers: &str,
    ) -> Result<Submission> {
        self.create_submission_impl(assignment_id, student_id, answers)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        score: Option<i32>,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, score, feedback, graded_at)
            .await
    }

    async fn delete_submission(&self, submission_id: i64) -> Result<bool> {
        self.delete_submission_impl(submission_id).await
    }

    async fn count_submissions_by_assignment(&self, assignment_id: i64) -> Result<u64> {
        self.count_submissions_by_assignment_impl(assignment_id)
            .await
    }

    async fn list_submissions_by_creator(&self, teacher_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_creator_impl(teacher_id).await
    }

    async fn list_submissions_by_subject(&self, subject_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_subject_impl(subject_id).await
    }

    async fn list_submissions_by_student(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_student_impl(student_id, subject_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("edu.db").unwrap(),
            "sqlite://edu.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/edu").unwrap(),
            "postgres://u:p@localhost/edu"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_storage_migrates() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user("alice", "alice@example.com", UserRole::Teacher)
            .await
            .unwrap();
        let loaded = storage.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.username, "alice");
        assert_eq!(loaded.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_assignment_links_keep_request_order() {
        use crate::models::questions::entities::QuestionLevel;
        use crate::services::test_support;

        let storage = test_support::storage().await;
        let teacher = test_support::teacher(&storage, "teach").await;
        let subject = test_support::subject(&storage, &teacher, "ABC123").await;
        let first = test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "a").await;
        let second =
            test_support::question(&storage, None, "Algebra", QuestionLevel::Low, "b").await;

        // 重复 ID 只保留第一次出现的位置
        let assignment = test_support::assignment(
            &storage,
            &subject,
            &teacher,
            "Algebra",
            vec![second.id, first.id, second.id],
        )
        .await;
        let ids: Vec<i64> = storage
            .list_assignment_questions(assignment.id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
