//! Which section rows to select for a requested class.
//!
//! Courses either list lecture sections only (`A`, `B`, `C`) or lectures
//! with subordinate quiz/lab sections (`A`, `AA`, `AB`, `B`, `BA`). In the
//! second layout a quiz belongs to the lecture whose code it starts with.

use thiserror::Error;

use super::driver::SectionRow;

#[cfg(test)]
#[path = "sections_tests.rs"]
mod tests;

/// Why no sections could be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No sections found on page")]
    NoSections,

    #[error("Lecture {0} not found")]
    LectureNotFound(String),

    #[error("No open lectures available")]
    NoOpenLecture,

    #[error("Quiz section {quiz} not found under lecture {lecture}")]
    QuizNotFound { lecture: String, quiz: String },

    #[error("No open quiz sections available under lecture {0}")]
    NoOpenQuiz(String),

    #[error("Section {0} is closed/full")]
    Closed(String),
}

impl SelectionError {
    /// Section the failure refers to, for status reporting.
    pub fn section(&self) -> Option<String> {
        match self {
            SelectionError::NoSections | SelectionError::NoOpenLecture => None,
            SelectionError::LectureNotFound(code)
            | SelectionError::NoOpenQuiz(code)
            | SelectionError::Closed(code) => Some(code.clone()),
            SelectionError::QuizNotFound { lecture, quiz } => Some(format!("{} {}", lecture, quiz)),
        }
    }
}

/// Sections to select, lecture first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChoice {
    pub lecture: String,
    pub quiz: Option<String>,
}

impl SectionChoice {
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.lecture.as_str()).chain(self.quiz.as_deref())
    }
}

/// Whether the codes mix single-letter lectures with multi-letter quizzes.
pub fn detect_quiz_sections<S: AsRef<str>>(codes: &[S]) -> bool {
    let has_single = codes.iter().any(|c| is_lecture_code(c.as_ref()));
    let has_multi = codes.iter().any(|c| c.as_ref().trim().chars().count() > 1);
    has_single && has_multi
}

fn is_lecture_code(code: &str) -> bool {
    code.trim().chars().count() == 1
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Choose the rows to select for a requested lecture and quiz.
///
/// Absent requests pick the first open row. Every chosen row must be open.
pub fn select_sections(
    rows: &[SectionRow],
    lecture: Option<&str>,
    quiz: Option<&str>,
) -> Result<SectionChoice, SelectionError> {
    let rows: Vec<(String, &SectionRow)> = rows
        .iter()
        .map(|row| (row.normalized_code(), row))
        .filter(|(code, _)| !code.is_empty())
        .collect();
    if rows.is_empty() {
        return Err(SelectionError::NoSections);
    }

    let codes: Vec<&str> = rows.iter().map(|(code, _)| code.as_str()).collect();
    let lecture = lecture.map(normalize);
    let quiz = quiz.map(normalize);

    if !detect_quiz_sections(&codes) {
        let (code, row) = pick(&rows, lecture.as_deref(), |_| true)
            .ok_or_else(|| missing_lecture(lecture.as_deref()))?;
        ensure_open(code, row)?;
        return Ok(SectionChoice {
            lecture: code.to_string(),
            quiz: None,
        });
    }

    let (lecture_code, lecture_row) = pick(&rows, lecture.as_deref(), is_lecture_code)
        .ok_or_else(|| missing_lecture(lecture.as_deref()))?;

    let quiz_rows: Vec<(String, &SectionRow)> = rows
        .iter()
        .filter(|(code, _)| code.starts_with(lecture_code) && !is_lecture_code(code))
        .cloned()
        .collect();

    if quiz_rows.is_empty() {
        ensure_open(lecture_code, lecture_row)?;
        return Ok(SectionChoice {
            lecture: lecture_code.to_string(),
            quiz: None,
        });
    }

    let (quiz_code, quiz_row) =
        pick(&quiz_rows, quiz.as_deref(), |_| true).ok_or_else(|| match &quiz {
            Some(q) => SelectionError::QuizNotFound {
                lecture: lecture_code.to_string(),
                quiz: q.clone(),
            },
            None => SelectionError::NoOpenQuiz(lecture_code.to_string()),
        })?;

    ensure_open(lecture_code, lecture_row)?;
    ensure_open(quiz_code, quiz_row)?;

    Ok(SectionChoice {
        lecture: lecture_code.to_string(),
        quiz: Some(quiz_code.to_string()),
    })
}

/// The requested row, or the first open row when nothing was requested.
fn pick<'a>(
    rows: &'a [(String, &'a SectionRow)],
    requested: Option<&str>,
    eligible: impl Fn(&str) -> bool,
) -> Option<(&'a str, &'a SectionRow)> {
    rows.iter()
        .filter(|(code, _)| eligible(code.as_str()))
        .find(|(code, row)| match requested {
            Some(wanted) => code == wanted,
            None => row.is_open(),
        })
        .map(|(code, row)| (code.as_str(), *row))
}

fn missing_lecture(requested: Option<&str>) -> SelectionError {
    match requested {
        Some(code) => SelectionError::LectureNotFound(code.to_string()),
        None => SelectionError::NoOpenLecture,
    }
}

fn ensure_open(code: &str, row: &SectionRow) -> Result<(), SelectionError> {
    if row.is_open() {
        Ok(())
    } else {
        Err(SelectionError::Closed(code.to_string()))
    }
}
