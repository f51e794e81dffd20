//! Parse a quiz file locally and preview the staged questions

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use quizgate_core::{ParsedQuestion, QuizFormat, QuizParser};

use crate::output::{format_parsed_question, subject_breakdown};

/// Reads and parses `path`; `.js` files are always read as the script
/// format. Shared with `admin upload`.
pub fn parse_file(parser: &QuizParser, path: &Path) -> Result<Vec<ParsedQuestion>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let questions = parser
        .parse_as(QuizFormat::for_file(path, &text), &text)
        .with_context(|| format!("{}: could not parse quiz file", path.display()))?;
    Ok(questions)
}

pub fn run(parser: &QuizParser, path: &Path, json: bool) -> Result<()> {
    let questions = parse_file(parser, path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    print_preview(&questions);
    Ok(())
}

pub fn print_preview(questions: &[ParsedQuestion]) {
    println!(
        "  {} {} questions",
        "Parsed".green().bold(),
        questions.len()
    );
    for (subject, mcq, integer) in subject_breakdown(questions) {
        println!("    {:<9} {:>2} mcq, {:>2} integer", subject.to_string(), mcq, integer);
    }
    println!();
    for q in questions {
        println!("{}", format_parsed_question(q));
    }
}
