mod answers;
mod question;
mod report;
mod subject;

pub use answers::{AnswerBook, SubmissionPayload};
pub use question::{
    OptionLabel, Question, QuestionError, QuestionOption, QuestionPosition,
};
pub use report::Report;
pub use subject::{Subject, SubjectError};
