//! Shared error types for the services crate.

use thiserror::Error;

use providers::{ProviderError, SubmissionError};

/// Errors emitted by the session engine and its runner.
///
/// Intent rejections are not errors; they come back as
/// [`Outcome::Rejected`](crate::sessions::Outcome) and leave state untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no subjects available for session")]
    NoSubjects,

    #[error("no outstanding question fetch to retry")]
    NothingToRetry,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
