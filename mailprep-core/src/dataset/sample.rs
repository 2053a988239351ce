//! Deterministic fallback dataset used when no CSV file exists.

use mailprep_types::{EmailRecord, Label};

/// Number of records in the synthesized dataset.
pub const SAMPLE_SIZE: usize = 100;

const SUBJECTS: [&str; 10] = [
    "Great Offer!",
    "Meeting Tomorrow",
    "URGENT: Claim Prize",
    "Hi there",
    "FREE MONEY NOW",
    "Project Update",
    "Click here NOW",
    "Team Sync",
    "You Won!",
    "Budget Report",
];

const BODIES: [&str; 10] = [
    "Buy now and save 50%! Limited time offer",
    "Hi, let's meet at 2pm tomorrow to discuss the project",
    "You have won $1000! Click here to claim your prize",
    "How are you doing? Just checking in",
    "Get free money instantly! No catch!",
    "Here is the Q3 budget update for review",
    "Act now! This offer expires in 1 hour!",
    "Can we sync up at 3pm? Agenda: project timeline",
    "CONGRATULATIONS! You are selected for $500000 prize",
    "Please review attached budget for next quarter",
];

/// Labels alternate in lockstep with the templates: even slots are spam.
const LABELS: [Label; 10] = [
    Label::Spam,
    Label::Ham,
    Label::Spam,
    Label::Ham,
    Label::Spam,
    Label::Ham,
    Label::Spam,
    Label::Ham,
    Label::Spam,
    Label::Ham,
];

/// Builds the 100-record sample: templates repeat cyclically, ids run 1..=100.
pub fn sample_records() -> Vec<EmailRecord> {
    (0..SAMPLE_SIZE)
        .map(|i| {
            let slot = i % SUBJECTS.len();
            EmailRecord::new(i as u64 + 1, SUBJECTS[slot], BODIES[slot], LABELS[slot])
        })
        .collect()
}
