mod intent;
mod machine;
mod runner;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use intent::{Effect, Intent, Outcome, RejectReason};
pub use machine::QuizSession;
pub use runner::SessionRunner;
pub use view::{Mode, SessionView};
