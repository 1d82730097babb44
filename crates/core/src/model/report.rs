use serde::{Deserialize, Serialize};

/// Opaque result payload returned by the result sink after submission.
///
/// The session engine forwards it downstream without interpreting it; the
/// original scoring side renders it as markdown text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    body: String,
}

impl Report {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl From<String> for Report {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}
