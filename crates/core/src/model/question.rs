use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question needs at least two options, got {got}")]
    TooFewOptions { got: usize },

    #[error("duplicate option label: {0}")]
    DuplicateLabel(String),

    #[error("option label is empty")]
    EmptyLabel,

    #[error("question positions are 1-based; 0 is not a position")]
    ZeroPosition,
}

/// Short identifier for one answer choice, e.g. "a".
///
/// Labels are stored and compared exactly as the provider supplied them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionLabel(String);

impl OptionLabel {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyLabel` for blank input.
    pub fn new(label: impl Into<String>) -> Result<Self, QuestionError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(QuestionError::EmptyLabel);
        }
        Ok(Self(label))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionLabel({})", self.0)
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One labelled answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    label: OptionLabel,
    text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(label: OptionLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &OptionLabel {
        &self.label
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A multiple-choice question with an ordered set of labelled options.
///
/// A question is identified by its 1-based position within its subject's
/// list, not by an id of its own. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: Vec<QuestionOption>,
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::TooFewOptions` for fewer than two options, and
    /// `QuestionError::DuplicateLabel` when two options share a label.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<QuestionOption>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { got: options.len() });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.label == option.label) {
                return Err(QuestionError::DuplicateLabel(
                    option.label.value().to_owned(),
                ));
            }
        }
        Ok(Self { prompt, options })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }
}

/// 1-based position of a question within its subject's list.
///
/// Rendered as `Q<n>` in the submission payload, matching the key format the
/// scoring side expects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionPosition(u32);

impl QuestionPosition {
    /// # Errors
    ///
    /// Returns `QuestionError::ZeroPosition` for 0.
    pub fn new(position: u32) -> Result<Self, QuestionError> {
        if position == 0 {
            return Err(QuestionError::ZeroPosition);
        }
        Ok(Self(position))
    }

    /// Position for a 0-based index into a question list.
    ///
    /// Saturates at `u32::MAX` for absurdly long lists.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        let position = u32::try_from(index).unwrap_or(u32::MAX - 1).saturating_add(1);
        Self(position)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Submission key, e.g. `Q1`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("Q{}", self.0)
    }
}

impl fmt::Debug for QuestionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionPosition({})", self.0)
    }
}

impl fmt::Display for QuestionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> OptionLabel {
        OptionLabel::new(s).unwrap()
    }

    fn two_options() -> Vec<QuestionOption> {
        vec![
            QuestionOption::new(label("a"), "first"),
            QuestionOption::new(label("b"), "second"),
        ]
    }

    #[test]
    fn question_keeps_option_order() {
        let question = Question::new("Pick one", two_options()).unwrap();
        let labels: Vec<_> = question
            .options()
            .iter()
            .map(|o| o.label().value().to_owned())
            .collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = Question::new("  ", two_options()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn single_option_is_rejected() {
        let options = vec![QuestionOption::new(label("a"), "only")];
        let err = Question::new("Pick one", options).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { got: 1 });
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let options = vec![
            QuestionOption::new(label("a"), "first"),
            QuestionOption::new(label("a"), "second"),
        ];
        let err = Question::new("Pick one", options).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateLabel("a".into()));
    }

    #[test]
    fn position_is_one_based() {
        assert_eq!(QuestionPosition::new(0), Err(QuestionError::ZeroPosition));
        assert_eq!(QuestionPosition::from_index(0).value(), 1);
        assert_eq!(QuestionPosition::from_index(4).key(), "Q5");
    }
}
