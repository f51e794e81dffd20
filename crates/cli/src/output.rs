//! Terminal rendering of statuses, tests, memberships and results

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use quizgate_core::quiz::ParsedQuestion;
use quizgate_core::{PremiumMembership, QuestionType, QuizResult, Subject, Test, TrialStatus};

/// Status as printed by `quizgate status --json`.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub status: TrialStatus,
    pub has_access: bool,
    pub device_id: Option<&'a str>,
}

pub fn status_badge(status: TrialStatus) -> String {
    let text = status.banner().unwrap_or("Checking access...");
    match status {
        TrialStatus::Premium => text.cyan().bold().to_string(),
        TrialStatus::Active => text.green().bold().to_string(),
        TrialStatus::Expired => text.red().bold().to_string(),
        TrialStatus::Loading => text.dimmed().to_string(),
    }
}

pub fn format_test_row(test: &Test) -> String {
    let mut line = format!(
        "  {:>4}  {}  ({} questions)",
        test.id,
        test.title.bold(),
        test.question_count
    );
    if let Some(description) = test.description.as_deref() {
        line.push_str(&format!("\n        {}", description.dimmed()));
    }
    line
}

pub fn format_membership_row(membership: &PremiumMembership, now: DateTime<Utc>) -> String {
    let state = if membership.is_expired_at(now) {
        "Expired".red().to_string()
    } else {
        "Active".green().to_string()
    };
    format!(
        "  {:>4}  {:<20} {:<36} {}  expires {}",
        membership.id,
        membership.name,
        membership.device_id,
        state,
        membership.expires_at.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Per-subject `(subject, mcq, integer)` counts in paper order.
pub fn subject_breakdown(questions: &[ParsedQuestion]) -> Vec<(Subject, usize, usize)> {
    [Subject::Physics, Subject::Chemistry, Subject::Maths]
        .into_iter()
        .map(|subject| {
            let of_subject = questions.iter().filter(|q| q.subject == subject);
            let (mcq, integer) = of_subject.fold((0, 0), |(m, i), q| match q.kind {
                QuestionType::Mcq => (m + 1, i),
                QuestionType::Integer => (m, i + 1),
            });
            (subject, mcq, integer)
        })
        .filter(|(_, mcq, integer)| mcq + integer > 0)
        .collect()
}

pub fn format_parsed_question(q: &ParsedQuestion) -> String {
    format!(
        "  {:>3}  {:<9} {:<7} {:<6} {}",
        q.number,
        q.subject.to_string(),
        q.kind.to_string(),
        q.correct,
        q.image.dimmed()
    )
}

pub fn format_result(result: &QuizResult) -> String {
    let percent = if result.total == 0 {
        0.0
    } else {
        result.score as f64 * 100.0 / result.total as f64
    };
    let mut out = format!(
        "  Score: {}/{} ({:.0}%)\n",
        result.score.to_string().bold(),
        result.total,
        percent
    );
    for outcome in result.outcomes.iter().filter(|o| !o.is_correct) {
        out.push_str(&format!(
            "  {:>3}  your answer: {:<6} correct: {}\n",
            outcome.number,
            outcome.given.as_deref().unwrap_or("-"),
            outcome.correct.green()
        ));
    }
    out
}
