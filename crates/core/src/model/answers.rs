use std::collections::BTreeMap;

use super::question::{OptionLabel, QuestionPosition};
use super::subject::Subject;

/// Wire shape of a full answer snapshot: subject name, then `Q<n>`, then the
/// chosen option label.
pub type SubmissionPayload = BTreeMap<String, BTreeMap<String, String>>;

/// Accumulated record of every selection made during a session.
///
/// Keys grow monotonically: a later selection for the same (subject,
/// position) overwrites the label, never removes the entry. The book is
/// cleared only by dropping the session that owns it.
///
/// Labels are recorded as given; checking them against the option set is the
/// provider's trust boundary, not ours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBook {
    entries: BTreeMap<Subject, BTreeMap<QuestionPosition, OptionLabel>>,
}

impl AnswerBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the chosen label for (subject, position), overwriting any
    /// previous choice. Idempotent for repeated identical calls.
    pub fn record(&mut self, subject: Subject, position: QuestionPosition, label: OptionLabel) {
        self.entries.entry(subject).or_default().insert(position, label);
    }

    #[must_use]
    pub fn get(&self, subject: &Subject, position: QuestionPosition) -> Option<&OptionLabel> {
        self.entries.get(subject).and_then(|by_pos| by_pos.get(&position))
    }

    /// Total number of recorded answers across all subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// Number of answers recorded for one subject.
    #[must_use]
    pub fn answered_in(&self, subject: &Subject) -> usize {
        self.entries.get(subject).map_or(0, BTreeMap::len)
    }

    /// Snapshot the whole book in the shape the result sink expects.
    #[must_use]
    pub fn to_submission_payload(&self) -> SubmissionPayload {
        self.entries
            .iter()
            .map(|(subject, by_pos)| {
                let answers = by_pos
                    .iter()
                    .map(|(pos, label)| (pos.key(), label.value().to_owned()))
                    .collect();
                (subject.name().to_owned(), answers)
            })
            .collect()
    }
}
