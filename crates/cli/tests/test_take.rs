use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quizgate_cli::commands::take::{normalize_answer, run_session};
use quizgate_core::{Question, QuestionType, QuizSession, Subject, Test};

fn session() -> QuizSession {
    let test = Test {
        id: 1,
        title: "Mock".to_string(),
        description: None,
        question_count: 2,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    };
    let questions = vec![
        Question {
            id: 11,
            test_id: 1,
            question_id: 1,
            image: "https://img.example/a1.png".to_string(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: "B".to_string(),
            subject: Subject::Physics,
            kind: QuestionType::Mcq,
        },
        Question {
            id: 12,
            test_id: 1,
            question_id: 2,
            image: "https://img.example/a2.png".to_string(),
            options: Vec::new(),
            correct: "42".to_string(),
            subject: Subject::Physics,
            kind: QuestionType::Integer,
        },
    ];
    QuizSession::new(test, questions).unwrap()
}

#[test]
fn answers_then_submit() {
    let mut session = session();
    let mut out = Vec::new();

    let result = run_session(&mut session, Cursor::new("b\n42\ns\n"), &mut out)
        .unwrap()
        .unwrap();

    assert_eq!((result.score, result.total), (2, 2));
    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("Question 1/2"));
    assert!(transcript.contains("Question 2/2"));
    assert!(transcript.contains("Last question"));
}

#[test]
fn invalid_answer_is_rejected() {
    let mut session = session();
    let mut out = Vec::new();

    let result = run_session(&mut session, Cursor::new("E\nA\nseven\n7\ns\n"), &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(result.score, 0);
    assert_eq!(result.outcomes[0].given.as_deref(), Some("A"));
    assert_eq!(result.outcomes[1].given.as_deref(), Some("7"));
    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("Answer with A, B, C or D."));
    assert!(transcript.contains("Answer with a whole number."));
}

#[test]
fn navigation_and_changed_answer() {
    let mut session = session();
    let mut out = Vec::new();

    let result = run_session(&mut session, Cursor::new("A\np\nB\n42\ns\n"), &mut out)
        .unwrap()
        .unwrap();

    assert_eq!(result.score, 2);
    assert!(String::from_utf8(out).unwrap().contains("Your answer: A"));
}

#[test]
fn quit_or_end_of_input_returns_none() {
    let mut session = session();
    assert!(run_session(&mut session, Cursor::new("B\nq\n"), std::io::sink())
        .unwrap()
        .is_none());
    assert!(run_session(&mut session, Cursor::new("B\n"), std::io::sink())
        .unwrap()
        .is_none());
}

#[test]
fn normalize_answer_rules() {
    assert_eq!(normalize_answer(QuestionType::Mcq, " c ").as_deref(), Some("C"));
    assert_eq!(normalize_answer(QuestionType::Mcq, "E"), None);
    assert_eq!(normalize_answer(QuestionType::Integer, "-3").as_deref(), Some("-3"));
    assert_eq!(normalize_answer(QuestionType::Integer, "3.5"), None);
}
