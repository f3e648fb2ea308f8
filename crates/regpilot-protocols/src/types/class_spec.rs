//! Class-specification strings such as `"CSE 373 A AA"`.
//!
//! A spec is a course identifier optionally followed by a lecture section
//! code and a quiz/lab section code. Course identifiers may contain spaces
//! (`"COMP SCI 400"`), so section codes are taken from the end.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
#[path = "class_spec_tests.rs"]
mod tests;

/// Most trailing tokens that can be section codes (lecture, quiz).
const MAX_SECTION_TOKENS: usize = 2;

/// Fewest tokens a course identifier is made of (`CSE373`).
const MIN_COURSE_TOKENS: usize = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassSpecError {
    #[error("Class specification is empty")]
    Empty,
}

/// A parsed class specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub course: String,
    pub lecture: Option<String>,
    pub quiz: Option<String>,
}

impl ClassSpec {
    /// Parse a spec; input is upper-cased and whitespace-normalised.
    pub fn parse(input: &str) -> Result<Self, ClassSpecError> {
        let upper = input.trim().to_uppercase();
        let mut tokens: Vec<&str> = upper.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ClassSpecError::Empty);
        }

        let mut sections = Vec::with_capacity(MAX_SECTION_TOKENS);
        // Section codes only follow a course number.
        let has_number = tokens.iter().any(|token| token.chars().any(|c| c.is_ascii_digit()));
        while has_number && sections.len() < MAX_SECTION_TOKENS && tokens.len() > MIN_COURSE_TOKENS {
            match tokens.last() {
                Some(token) if is_section_code(token) => {
                    sections.push(token.to_string());
                    tokens.pop();
                }
                _ => break,
            }
        }
        sections.reverse();

        let mut sections = sections.into_iter();
        Ok(Self {
            course: tokens.join(" "),
            lecture: sections.next(),
            quiz: sections.next(),
        })
    }

    /// The spec rendered back in its canonical form.
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl FromStr for ClassSpec {
    type Err = ClassSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.course)?;
        if let Some(lecture) = &self.lecture {
            write!(f, " {}", lecture)?;
        }
        if let Some(quiz) = &self.quiz {
            write!(f, " {}", quiz)?;
        }
        Ok(())
    }
}

/// Section codes are short and purely alphabetic (`A`, `AB`).
pub fn is_section_code(token: &str) -> bool {
    !token.is_empty() && token.len() <= 3 && token.chars().all(|c| c.is_ascii_alphabetic())
}
