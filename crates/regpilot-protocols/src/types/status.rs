//! Human-visible progress records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome level of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Error,
    Warning,
}

impl StatusLevel {
    /// Single-character marker used when rendering the status log.
    pub fn symbol(self) -> &'static str {
        match self {
            StatusLevel::Success => "✓",
            StatusLevel::Error => "✗",
            StatusLevel::Warning => "⚠",
        }
    }
}

/// Progress record sent from page automation to the user-facing side.
///
/// The coordinator never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub course: String,
    #[serde(default)]
    pub section: Option<String>,
    pub message: String,
    pub level: StatusLevel,
}

impl StatusUpdate {
    pub fn success(
        course: impl Into<String>,
        section: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(StatusLevel::Success, course, section, message)
    }

    pub fn error(
        course: impl Into<String>,
        section: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(StatusLevel::Error, course, section, message)
    }

    pub fn warning(
        course: impl Into<String>,
        section: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(StatusLevel::Warning, course, section, message)
    }

    fn new(
        level: StatusLevel,
        course: impl Into<String>,
        section: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            course: course.into(),
            section,
            message: message.into(),
            level,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == StatusLevel::Success
    }
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.symbol(), self.course)?;
        if let Some(section) = &self.section {
            write!(f, " (Section {})", section)?;
        }
        write!(f, ": {}", self.message)
    }
}
