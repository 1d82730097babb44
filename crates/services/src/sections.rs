use std::collections::HashSet;

use quiz_core::model::Subject;

/// Derived classification of the ordered subject list into timed ("core")
/// and untimed groups.
///
/// Pure and immutable: built once when the subject list is first obtained.
/// A subject is core iff its name appears in the configured core set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPlan {
    subjects: Vec<Subject>,
    core: HashSet<Subject>,
}

impl SectionPlan {
    #[must_use]
    pub fn new(subjects: Vec<Subject>, core_set: &[Subject]) -> Self {
        let core = subjects
            .iter()
            .filter(|subject| core_set.contains(subject))
            .cloned()
            .collect();
        Self { subjects, core }
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    #[must_use]
    pub fn subject_at(&self, index: usize) -> Option<&Subject> {
        self.subjects.get(index)
    }

    #[must_use]
    pub fn position(&self, subject: &Subject) -> Option<usize> {
        self.subjects.iter().position(|s| s == subject)
    }

    #[must_use]
    pub fn is_core(&self, subject: &Subject) -> bool {
        self.core.contains(subject)
    }

    /// The subject that follows `current` in section order, if any.
    #[must_use]
    pub fn next_subject(&self, current: &Subject) -> Option<&Subject> {
        let index = self.position(current)?;
        self.subjects.get(index + 1)
    }

    /// The first untimed subject in section order, if any.
    #[must_use]
    pub fn first_non_core_subject(&self) -> Option<&Subject> {
        self.first_non_core_index().map(|i| &self.subjects[i])
    }

    #[must_use]
    pub fn first_non_core_index(&self) -> Option<usize> {
        self.subjects.iter().position(|s| !self.is_core(s))
    }

    /// True iff moving from `a` to `b` leaves the timed block: `a` is core
    /// and `b` is not.
    #[must_use]
    pub fn is_core_to_non_core_boundary(&self, a: &Subject, b: &Subject) -> bool {
        self.is_core(a) && !self.is_core(b)
    }
}
