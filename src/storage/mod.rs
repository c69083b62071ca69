use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    assignments::entities::{Assignment, NewAdaptiveAssignment, NewAssignment},
    enrollments::{entities::Enrollment, responses::EnrolledSubject},
    questions::entities::{NewQuestion, Question, QuestionLevel},
    subjects::entities::Subject,
    submissions::entities::Submission,
    users::entities::{User, UserRole},
};

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户镜像
    // 写入认证服务同步过来的用户
    async fn create_user(&self, username: &str, email: &str, role: UserRole) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 课程管理方法
    // 创建课程，选课码冲突时返回 Conflict
    async fn create_subject(&self, name: &str, code: &str, teacher_id: i64) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    // 通过选课码精确查找课程
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    // 列出教师的课程（按名称排序）
    async fn list_subjects_by_teacher(&self, teacher_id: i64) -> Result<Vec<Subject>>;
    // 删除课程（级联删除选课、作业、课程题目）
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;

    /// 选课方法
    async fn get_enrollment(&self, subject_id: i64, student_id: i64)
    -> Result<Option<Enrollment>>;
    // 创建选课记录，重复时返回 Conflict
    async fn create_enrollment(&self, subject_id: i64, student_id: i64) -> Result<Enrollment>;
    // 列出学生已选课程
    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<EnrolledSubject>>;
    async fn count_enrollments_by_subject(&self, subject_id: i64) -> Result<u64>;

    /// 题库方法
    async fn create_question(&self, question: NewQuestion) -> Result<Question>;
    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>>;
    // 按完整题目身份查找（课程、主题、难度、题干、提示）
    async fn find_question(&self, question: &NewQuestion) -> Result<Option<Question>>;
    // 按 (主题, 题干) 查找，用于导入去重
    async fn find_question_by_topic_and_text(
        &self,
        topic: &str,
        question: &str,
    ) -> Result<Option<Question>>;
    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>>;
    // 按主题（不区分大小写）和难度列出题目
    async fn list_questions_by_topic_and_level(
        &self,
        topic: &str,
        level: QuestionLevel,
    ) -> Result<Vec<Question>>;
    // 按主题精确匹配列出题目
    async fn list_questions_by_topic(&self, topic: &str) -> Result<Vec<Question>>;
    // 列出课程中某主题的题目
    async fn list_subject_questions_by_topic(
        &self,
        subject_id: i64,
        topic: &str,
    ) -> Result<Vec<Question>>;
    // 删除指定课程下的题目，返回删除数量
    async fn delete_questions_by_subjects(&self, subject_ids: &[i64]) -> Result<u64>;

    /// 作业管理方法
    // 创建作业及其题目关联
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 在一个事务中创建自适应作业、题目关联和接收人；去重键冲突时返回 None
    async fn create_adaptive_assignment(
        &self,
        assignment: NewAdaptiveAssignment,
    ) -> Result<Option<Assignment>>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出课程作业（按截止时间升序）
    async fn list_assignments_by_subject(&self, subject_id: i64) -> Result<Vec<Assignment>>;
    // 列出教师布置的作业（按截止时间升序）
    async fn list_assignments_by_creator(&self, teacher_id: i64) -> Result<Vec<Assignment>>;
    // 列出学生可见且未截止的作业，可按课程筛选
    async fn list_open_assignments_for_student(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Assignment>>;
    // 列出作业关联的题目（按关联顺序）
    async fn list_assignment_questions(&self, assignment_id: i64) -> Result<Vec<Question>>;
    async fn is_assignment_recipient(&self, assignment_id: i64, student_id: i64) -> Result<bool>;
    // 学生是否已有该去重键的自适应作业
    async fn has_adaptive_recipient(&self, student_id: i64, adaptive_key: &str) -> Result<bool>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 创建提交，重复时返回 AlreadySubmitted
    async fn create_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        answers: &str,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 写入评分结果
    async fn grade_submission(
        &self,
        submission_id: i64,
        score: Option<i32>,
        feedback: &str,
        graded_at: DateTime<Utc>,
    ) -> Result<Option<Submission>>;
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;
    async fn count_submissions_by_assignment(&self, assignment_id: i64) -> Result<u64>;
    // 列出教师作业收到的提交（最新在前）
    async fn list_submissions_by_creator(&self, teacher_id: i64) -> Result<Vec<Submission>>;
    // 列出课程的提交（最新在前）
    async fn list_submissions_by_subject(&self, subject_id: i64) -> Result<Vec<Submission>>;
    // 列出学生的提交，可按课程筛选（最新在前）
    async fn list_submissions_by_student(
        &self,
        student_id: i64,
        subject_id: Option<i64>,
    ) -> Result<Vec<Submission>>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async(config).await?;
    Ok(Arc::new(storage))
}
