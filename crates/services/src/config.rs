use quiz_core::model::Subject;

/// Static session configuration: which subjects are timed, and the shared
/// time budget for that timed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub core_subjects: Vec<Subject>,
    pub time_budget_secs: u32,
}

impl Default for SessionConfig {
    /// Mirrors the original assessment: the three academic subjects share a
    /// 30 minute budget.
    fn default() -> Self {
        let core_subjects = ["Physics", "Chemistry", "Mathematics"]
            .into_iter()
            .map(|name| Subject::new(name).expect("default subject name is non-empty"))
            .collect();
        Self {
            core_subjects,
            time_budget_secs: 30 * 60,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new(core_subjects: Vec<Subject>, time_budget_secs: u32) -> Self {
        Self {
            core_subjects,
            time_budget_secs,
        }
    }
}
