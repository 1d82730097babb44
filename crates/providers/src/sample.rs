//! Bundled question bank for the demo binary and smoke tests.
//!
//! A trimmed copy of the original assessment: three timed academic subjects
//! followed by two untimed reflection subjects. Correct answers are not part
//! of the bank; scoring happens on the result-sink side.

use quiz_core::model::{OptionLabel, Question, QuestionOption, Subject};

use crate::provider::{InMemoryProvider, RecordingSink};

/// Subjects placed under the countdown timer, in section order.
pub const CORE_SUBJECTS: [&str; 3] = ["Physics", "Chemistry", "Mathematics"];

/// Untimed subjects following the timed block.
pub const NON_CORE_SUBJECTS: [&str; 2] = ["Well-being Assessment", "Time Management"];

/// Default time budget for the timed block: 30 minutes.
pub const TIME_BUDGET_SECS: u32 = 30 * 60;

fn question(prompt: &str, options: &[(&str, &str)]) -> Question {
    let options = options
        .iter()
        .map(|(label, text)| {
            let label = OptionLabel::new(*label).expect("sample label is non-empty");
            QuestionOption::new(label, *text)
        })
        .collect();
    Question::new(prompt, options).expect("sample question is well-formed")
}

fn subject(name: &str) -> Subject {
    Subject::new(name).expect("sample subject is non-empty")
}

fn physics() -> Vec<Question> {
    vec![
        question(
            "A particle moves in a circular path of radius r with uniform speed v. \
             The magnitude of its acceleration is:",
            &[("a", "v/r"), ("b", "v²/r"), ("c", "v/r²"), ("d", "v²/r²")],
        ),
        question(
            "The SI unit of electric current is:",
            &[("a", "Volt"), ("b", "Watt"), ("c", "Ampere"), ("d", "Ohm")],
        ),
        question(
            "A body of mass 2 kg is moving with a velocity of 3 m/s. Its kinetic energy is:",
            &[("a", "6 J"), ("b", "9 J"), ("c", "12 J"), ("d", "18 J")],
        ),
    ]
}

fn chemistry() -> Vec<Question> {
    vec![
        question(
            "Which of the following is a noble gas?",
            &[("a", "Nitrogen"), ("b", "Helium"), ("c", "Chlorine"), ("d", "Oxygen")],
        ),
        question(
            "The atomic number of Carbon is:",
            &[("a", "4"), ("b", "6"), ("c", "8"), ("d", "10")],
        ),
        question(
            "The pH of a neutral solution at 25°C is:",
            &[("a", "0"), ("b", "7"), ("c", "14"), ("d", "1")],
        ),
    ]
}

fn mathematics() -> Vec<Question> {
    vec![
        question(
            "The derivative of x² with respect to x is:",
            &[("a", "x"), ("b", "2x"), ("c", "x²"), ("d", "2x²")],
        ),
        question(
            "The probability of getting a head when tossing a fair coin is:",
            &[("a", "0.25"), ("b", "0.5"), ("c", "0.75"), ("d", "1")],
        ),
        question(
            "The number of ways to arrange 5 different books on a shelf is:",
            &[("a", "5"), ("b", "25"), ("c", "120"), ("d", "625")],
        ),
    ]
}

fn well_being() -> Vec<Question> {
    vec![
        question(
            "How would you rate your current stress level?",
            &[("a", "Very High"), ("b", "High"), ("c", "Moderate"), ("d", "Low")],
        ),
        question(
            "How many hours of sleep do you get on average?",
            &[
                ("a", "Less than 4 hours"),
                ("b", "4-6 hours"),
                ("c", "6-8 hours"),
                ("d", "More than 8 hours"),
            ],
        ),
    ]
}

fn time_management() -> Vec<Question> {
    vec![
        question(
            "How do you typically plan your study schedule?",
            &[
                ("a", "No planning"),
                ("b", "Basic daily list"),
                ("c", "Weekly schedule"),
                ("d", "Detailed monthly planner"),
            ],
        ),
        question(
            "How do you handle study breaks?",
            &[
                ("a", "No breaks"),
                ("b", "Random breaks"),
                ("c", "Fixed time breaks"),
                ("d", "Pomodoro technique"),
            ],
        ),
    ]
}

/// The full bundled bank in section order.
#[must_use]
pub fn provider() -> InMemoryProvider {
    InMemoryProvider::new()
        .with_subject(subject("Physics"), physics())
        .with_subject(subject("Chemistry"), chemistry())
        .with_subject(subject("Mathematics"), mathematics())
        .with_subject(subject("Well-being Assessment"), well_being())
        .with_subject(subject("Time Management"), time_management())
}

/// The configured core set as subjects.
#[must_use]
pub fn core_subjects() -> Vec<Subject> {
    CORE_SUBJECTS.iter().map(|name| subject(name)).collect()
}

/// A sink whose canned report mirrors the original's markdown analysis shape.
#[must_use]
pub fn sink() -> RecordingSink {
    RecordingSink::new("## Performance Analysis\n\nAnswers received; analysis pending.")
}
