pub mod access;
pub mod assignments;
pub mod dashboard;
pub mod enrollments;
pub mod questions;
pub mod recommender;
pub mod subjects;
pub mod submissions;

#[cfg(test)]
pub(crate) mod test_support;

pub use assignments::AssignmentService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use questions::QuestionService;
pub use recommender::AdaptiveRecommender;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
