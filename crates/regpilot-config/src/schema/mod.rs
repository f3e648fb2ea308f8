//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_infra;

pub use schema_infra::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sites: SitesConfig,

    #[serde(default)]
    pub term: TermConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub automation: AutomationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosts and entry URLs of the planning and registration sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "default_planning_host")]
    pub planning_host: String,

    #[serde(default = "default_registration_host")]
    pub registration_host: String,

    /// Entry page of the planning site (registration workflows start here).
    #[serde(default = "default_plan_url")]
    pub plan_url: String,

    /// Course search page (class-adding workflows start here).
    #[serde(default = "default_course_search_url")]
    pub course_search_url: String,

    #[serde(default = "default_course_search_path")]
    pub course_search_path: String,
}

fn default_planning_host() -> String {
    "myplan.uw.edu".to_string()
}

fn default_registration_host() -> String {
    "register.uw.edu".to_string()
}

fn default_plan_url() -> String {
    "https://myplan.uw.edu/plan/".to_string()
}

fn default_course_search_url() -> String {
    "https://myplan.uw.edu/course/#/courses".to_string()
}

fn default_course_search_path() -> String {
    "/course/".to_string()
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            planning_host: default_planning_host(),
            registration_host: default_registration_host(),
            plan_url: default_plan_url(),
            course_search_url: default_course_search_url(),
            course_search_path: default_course_search_path(),
        }
    }
}

/// The academic term being registered for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermConfig {
    /// Plan page fragment identifying the term, e.g. `/wi26`.
    #[serde(default = "default_term_fragment")]
    pub fragment: String,

    /// Human readable term name, matched against link text.
    #[serde(default = "default_term_label")]
    pub label: String,

    /// Id prefix of the section tables on a course page.
    #[serde(default = "default_section_table_prefix")]
    pub section_table_prefix: String,
}

fn default_term_fragment() -> String {
    "/wi26".to_string()
}

fn default_term_label() -> String {
    "Winter 2026".to_string()
}

fn default_section_table_prefix() -> String {
    "winter-".to_string()
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            fragment: default_term_fragment(),
            label: default_term_label(),
            section_table_prefix: default_section_table_prefix(),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
