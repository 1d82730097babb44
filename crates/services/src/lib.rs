#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sections;
pub mod sessions;

pub use quiz_core::Clock;

pub use config::SessionConfig;
pub use error::SessionError;
pub use sections::SectionPlan;
pub use sessions::{
    Effect, Intent, Mode, Outcome, QuizSession, RejectReason, SessionRunner, SessionView,
};
