//! Quiz file parsing
//!
//! Two input formats produce the same ordered question list:
//! - the array-literal script format (`rawIds` / `correctAnswers`), see [`script`]
//! - a line-oriented `<id> <answer>` format, see [`lines`]
//!
//! Per-question metadata is positional and fixed: 25 questions per subject
//! (Physics, Chemistry, Maths), of which the first 20 are multiple choice and
//! the last 5 take an integer answer.

pub mod lines;
pub mod script;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

use crate::models::{NewQuestion, QuestionType, RowId, Subject};

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://static.pw.live/5b09189f7285894d9130ccd0";

pub const QUESTIONS_PER_SUBJECT: usize = 25;
pub const MCQ_PER_SUBJECT: usize = 20;
pub const MCQ_OPTIONS: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid file format: missing rawIds or correctAnswers")]
    MissingArrays,
    #[error("length mismatch: {ids} rawIds but {answers} correctAnswers")]
    LengthMismatch { ids: usize, answers: usize },
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("quiz file contains no questions")]
    Empty,
}

impl FormatError {
    pub(crate) fn syntax_at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = position(text, offset);
        FormatError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

/// A question staged from an uploaded file, before it has a test to belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    /// 1-based position
    pub number: u32,
    /// Identifier as it appeared in the file
    pub source_id: String,
    pub image: String,
    pub options: Vec<String>,
    pub correct: String,
    pub subject: Subject,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

impl ParsedQuestion {
    pub fn to_new_question(&self, test_id: RowId) -> NewQuestion {
        NewQuestion {
            test_id,
            question_id: self.number,
            image: self.image.clone(),
            options: self.options.clone(),
            correct: self.correct.clone(),
            subject: self.subject,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFormat {
    ArrayLiteral,
    Lines,
}

static SCRIPT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:const|let|var|export)\s|\[").unwrap());

impl QuizFormat {
    /// Anything that looks like script source (an array name, a variable
    /// declaration or a `[`) is the script format, so a script with the wrong
    /// array names reports [`FormatError::MissingArrays`].
    pub fn detect(text: &str) -> Self {
        if text.contains(script::IDS_ARRAY)
            || text.contains(script::ANSWERS_ARRAY)
            || SCRIPT_MARKER_RE.is_match(text)
        {
            QuizFormat::ArrayLiteral
        } else {
            QuizFormat::Lines
        }
    }

    /// `.js` files are always the script format; anything else is detected.
    pub fn for_file(path: &Path, text: &str) -> Self {
        let is_script = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("js"));
        if is_script {
            QuizFormat::ArrayLiteral
        } else {
            Self::detect(text)
        }
    }
}

/// Parses quiz files into staged questions.
#[derive(Debug, Clone)]
pub struct QuizParser {
    image_base_url: String,
}

impl Default for QuizParser {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl QuizParser {
    pub fn new(image_base_url: &str) -> Self {
        Self {
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Parses either format, chosen by [`QuizFormat::detect`].
    pub fn parse(&self, text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
        self.parse_as(QuizFormat::detect(text), text)
    }

    pub fn parse_as(&self, format: QuizFormat, text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
        match format {
            QuizFormat::ArrayLiteral => self.parse_script(text),
            QuizFormat::Lines => self.parse_lines(text),
        }
    }

    pub fn parse_script(&self, text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
        let (ids, answers) = script::extract_arrays(text)?;
        self.build(&ids, &answers)
    }

    pub fn parse_lines(&self, text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
        let pairs = lines::parse_pairs(text)?;
        let (ids, answers): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
        self.build(&ids, &answers)
    }

    /// Zips ids with answers and assigns positional metadata. Fails without
    /// partial output when the lengths differ.
    pub fn build(&self, ids: &[String], answers: &[String]) -> Result<Vec<ParsedQuestion>, FormatError> {
        if ids.len() != answers.len() {
            return Err(FormatError::LengthMismatch {
                ids: ids.len(),
                answers: answers.len(),
            });
        }

        Ok(ids
            .iter()
            .zip(answers)
            .enumerate()
            .map(|(index, (id, correct))| {
                let kind = question_type_for(index);
                ParsedQuestion {
                    number: (index + 1) as u32,
                    source_id: id.clone(),
                    image: format!("{}/{}.png", self.image_base_url, id),
                    options: match kind {
                        QuestionType::Mcq => MCQ_OPTIONS.iter().map(|o| o.to_string()).collect(),
                        QuestionType::Integer => Vec::new(),
                    },
                    correct: correct.clone(),
                    subject: subject_for(index),
                    kind,
                }
            })
            .collect())
    }
}

/// Parses the array-literal format with the default image location.
pub fn parse_quiz_file(text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
    QuizParser::default().parse_script(text)
}

/// Parses either format with the default image location.
pub fn parse_quiz(text: &str) -> Result<Vec<ParsedQuestion>, FormatError> {
    QuizParser::default().parse(text)
}

/// Subject bucket for a 0-based position.
pub fn subject_for(index: usize) -> Subject {
    if index < QUESTIONS_PER_SUBJECT {
        Subject::Physics
    } else if index < 2 * QUESTIONS_PER_SUBJECT {
        Subject::Chemistry
    } else {
        Subject::Maths
    }
}

/// Question type for a 0-based position.
pub fn question_type_for(index: usize) -> QuestionType {
    if index % QUESTIONS_PER_SUBJECT >= MCQ_PER_SUBJECT {
        QuestionType::Integer
    } else {
        QuestionType::Mcq
    }
}

/// 1-based (line, column) of a byte offset; columns count chars.
pub(crate) fn position(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
