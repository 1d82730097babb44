use thiserror::Error;

use crate::model::{QuestionError, SubjectError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
