//! Take a test interactively in the terminal

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

use quizgate_core::{QuestionType, QuizResult, QuizSession, RowId};

use crate::commands::gate::require_access;
use crate::output::format_result;
use crate::progress::Step;
use crate::App;

pub fn run(app: &App, test_id: RowId) -> Result<()> {
    require_access(&app.entitlements())?;

    let catalog = app.catalog();
    let (test, questions) = Step::run("Loading test", || {
        let test = catalog.test(test_id)?;
        let questions = catalog.questions_for_test(test_id)?;
        Ok::<_, quizgate_core::ContentError>((test, questions))
    })
    .with_context(|| format!("could not load test {test_id}"))?;

    let mut session = QuizSession::new(test, questions)?;
    println!();
    println!("  {}", session.test().title.bold());
    println!(
        "  {}",
        "Type an answer, `n`/`p` to move, `s` to submit, `q` to quit.".dimmed()
    );

    let stdin = io::stdin();
    let result = run_session(&mut session, stdin.lock(), io::stdout())?;
    match result {
        Some(result) => print!("\n{}", format_result(&result)),
        None => println!("  {}", "Quit without submitting.".dimmed()),
    }
    Ok(())
}

/// Drives `session` from line-oriented `input`. Returns `None` when the user
/// quits or the input ends before submitting.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    mut out: W,
) -> Result<Option<QuizResult>> {
    loop {
        print_question(session, &mut out)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim() {
            "" => {}
            "q" | "Q" => return Ok(None),
            "s" | "S" => return Ok(Some(session.submit())),
            "n" | "N" => {
                if !session.next() {
                    writeln!(out, "  Last question. Press `s` to submit.")?;
                }
            }
            "p" | "P" => {
                session.prev();
            }
            answer => match normalize_answer(session.current().kind, answer) {
                Some(answer) => {
                    session.answer(&answer);
                    if !session.next() {
                        writeln!(out, "  Last question. Press `s` to submit.")?;
                    }
                }
                None => writeln!(out, "  {}", invalid_hint(session.current().kind))?,
            },
        }
    }
}

/// Upper-cases an option letter; integer answers must parse as integers.
pub fn normalize_answer(kind: QuestionType, raw: &str) -> Option<String> {
    let raw = raw.trim();
    match kind {
        QuestionType::Mcq => {
            let upper = raw.to_ascii_uppercase();
            matches!(upper.as_str(), "A" | "B" | "C" | "D").then_some(upper)
        }
        QuestionType::Integer => raw.parse::<i64>().ok().map(|_| raw.to_string()),
    }
}

fn invalid_hint(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Mcq => "Answer with A, B, C or D.",
        QuestionType::Integer => "Answer with a whole number.",
    }
}

fn print_question<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let q = session.current();
    writeln!(out)?;
    writeln!(
        out,
        "  Question {}/{}  [{} · {}]",
        session.position() + 1,
        session.len(),
        q.subject,
        q.kind
    )?;
    writeln!(out, "  {}", q.image)?;
    if !q.options.is_empty() {
        writeln!(out, "  Options: {}", q.options.join("  "))?;
    }
    if let Some(given) = session.answer_for(q.id) {
        writeln!(out, "  Your answer: {given}")?;
    }
    write!(out, "  > ")?;
    out.flush()?;
    Ok(())
}
