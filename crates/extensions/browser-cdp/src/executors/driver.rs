//! The page operations executors are written against.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ExecutorError;
use super::scripts;
use crate::cdp::PageSession;

/// An element executors look for, independent of how it is found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Link selecting a term on the plan page.
    TermLink { fragment: String, label: String },
    /// "Take me to Register.UW" style link pointing at the registration host.
    RegisterLink { host: String },
    /// "Import from MyPlan" button on the registration page.
    ImportButton,
    /// "Update Schedule" submit button on the registration page.
    UpdateScheduleButton,
    SearchInput,
    SearchButton,
    /// Course link in the search results table.
    CourseLink { course: String },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::TermLink { label, .. } => write!(f, "{} term link", label),
            Locator::RegisterLink { host } => write!(f, "link to {}", host),
            Locator::ImportButton => write!(f, "Import from MyPlan button"),
            Locator::UpdateScheduleButton => write!(f, "Update Schedule button"),
            Locator::SearchInput => write!(f, "course search input"),
            Locator::SearchButton => write!(f, "course search button"),
            Locator::CourseLink { course } => write!(f, "{} in search results", course),
        }
    }
}

/// One row of a course's section table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRow {
    pub code: String,
    pub status: String,
}

impl SectionRow {
    pub fn new(code: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: status.into(),
        }
    }

    /// Normalised section code.
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_uppercase()
    }

    pub fn is_open(&self) -> bool {
        self.status.to_lowercase().contains("open")
    }
}

/// A live page executors can act on.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Click the element if present. Returns whether it was found.
    async fn click(&self, locator: &Locator) -> Result<bool, ExecutorError>;

    /// Type `value` into the element if present. Returns whether it was found.
    async fn fill(&self, locator: &Locator, value: &str) -> Result<bool, ExecutorError>;

    /// Section rows of the tables whose id starts with `table_prefix`.
    async fn section_rows(&self, table_prefix: &str) -> Result<Vec<SectionRow>, ExecutorError>;

    /// Click the Select button of section `code`. Returns whether it was found.
    async fn select_section(&self, table_prefix: &str, code: &str) -> Result<bool, ExecutorError>;

    /// Go one step back in the tab's history.
    async fn go_back(&self) -> Result<(), ExecutorError>;
}

#[async_trait]
impl PageDriver for PageSession {
    async fn click(&self, locator: &Locator) -> Result<bool, ExecutorError> {
        let found = self.evaluate(&scripts::click(locator)).await?;
        Ok(found.as_bool().unwrap_or(false))
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<bool, ExecutorError> {
        let found = self.evaluate(&scripts::fill(locator, value)).await?;
        Ok(found.as_bool().unwrap_or(false))
    }

    async fn section_rows(&self, table_prefix: &str) -> Result<Vec<SectionRow>, ExecutorError> {
        let rows = self.evaluate(&scripts::section_rows(table_prefix)).await?;
        if rows.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(rows)?)
    }

    async fn select_section(&self, table_prefix: &str, code: &str) -> Result<bool, ExecutorError> {
        let found = self
            .evaluate(&scripts::select_section(table_prefix, code))
            .await?;
        Ok(found.as_bool().unwrap_or(false))
    }

    async fn go_back(&self) -> Result<(), ExecutorError> {
        PageSession::go_back(self).await?;
        Ok(())
    }
}
