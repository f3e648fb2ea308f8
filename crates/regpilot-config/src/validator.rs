//! Configuration validation.
//!
//! Errors stop the CLI before it touches the browser; warnings are logged.

use std::fmt;

use url::Url;

use crate::error::ConfigError;
use crate::schema::Config;

/// Polling budgets above this are probably a typo.
const MAX_REASONABLE_POLLING_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in a config, keyed by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.of(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.of(Severity::Warning)
    }

    fn of(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.push(Severity::Error, path, message.into());
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.push(Severity::Warning, path, message.into());
    }

    fn push(&mut self, severity: Severity, path: &str, message: String) {
        self.findings.push(Finding {
            severity,
            path: path.to_string(),
            message,
        });
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::default();
        Self::check_sites(config, &mut report);
        Self::check_term(config, &mut report);
        Self::check_browser(config, &mut report);
        Self::check_automation(config, &mut report);
        report
    }

    /// Validate, failing on the first error.
    pub fn ensure_valid(config: &Config) -> Result<ValidationReport, ConfigError> {
        let report = Self::validate(config);
        if let Some(first) = report.errors().next() {
            return Err(ConfigError::InvalidValue {
                field: first.path.clone(),
                message: first.message.clone(),
            });
        }
        Ok(report)
    }

    fn check_sites(config: &Config, report: &mut ValidationReport) {
        let sites = &config.sites;

        for (path, host) in [
            ("sites.planning_host", &sites.planning_host),
            ("sites.registration_host", &sites.registration_host),
        ] {
            if host.trim().is_empty() {
                report.error(path, "Host cannot be empty");
            }
        }

        // Both entry URLs must land on the planning site, or the first
        // navigation never matches a transition.
        for (path, raw) in [
            ("sites.plan_url", &sites.plan_url),
            ("sites.course_search_url", &sites.course_search_url),
        ] {
            match Url::parse(raw) {
                Ok(url) => {
                    let host = url.host_str().unwrap_or_default();
                    if !sites.planning_host.is_empty() && !host.eq_ignore_ascii_case(&sites.planning_host) {
                        report.error(
                            path,
                            format!("URL host '{}' is not the planning host '{}'", host, sites.planning_host),
                        );
                    }
                }
                Err(e) => report.error(path, format!("Invalid URL: {}", e)),
            }
        }

        if !sites.course_search_path.starts_with('/') {
            report.error("sites.course_search_path", "Path must start with '/'");
        }
    }

    fn check_term(config: &Config, report: &mut ValidationReport) {
        if !config.term.fragment.starts_with('/') {
            report.error("term.fragment", "Fragment must start with '/' (e.g. \"/wi26\")");
        }
        if config.term.section_table_prefix.is_empty() {
            report.warn(
                "term.section_table_prefix",
                "Empty prefix matches section tables of every term",
            );
        }
    }

    fn check_browser(config: &Config, report: &mut ValidationReport) {
        if config.browser.debug_port == 0 {
            report.error("browser.debug_port", "Port cannot be 0");
        }
    }

    fn check_automation(config: &Config, report: &mut ValidationReport) {
        let automation = &config.automation;
        if automation.retry_attempts == 0 {
            report.error(
                "automation.retry_attempts",
                "Elements would be looked up only once; use at least 1",
            );
        }
        let budget = automation.polling_budget_ms();
        if budget > MAX_REASONABLE_POLLING_MS {
            report.warn(
                "automation",
                format!("Polling for one element may take {}s", budget / 1000),
            );
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
