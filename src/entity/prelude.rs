//! 预导入模块，方便使用

pub use super::assignment_questions::{
    ActiveModel as AssignmentQuestionActiveModel, Entity as AssignmentQuestions,
    Model as AssignmentQuestionModel,
};
pub use super::assignment_recipients::{
    ActiveModel as AssignmentRecipientActiveModel, Entity as AssignmentRecipients,
    Model as AssignmentRecipientModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
