#![forbid(unsafe_code)]

pub mod provider;
pub mod sample;

pub use provider::{
    InMemoryProvider, ProviderError, QuestionProvider, RecordingSink, ResultSink,
    SubmissionError,
};
