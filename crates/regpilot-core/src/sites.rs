//! The sites a workflow moves between, and URL locations matched against
//! them.

use url::Url;

use regpilot_protocols::Mode;

use crate::error::CoordinatorError;

const DEFAULT_PLANNING_HOST: &str = "myplan.uw.edu";
const DEFAULT_REGISTRATION_HOST: &str = "register.uw.edu";
const DEFAULT_PLAN_URL: &str = "https://myplan.uw.edu/plan/";
const DEFAULT_COURSE_SEARCH_URL: &str = "https://myplan.uw.edu/course/#/courses";
const DEFAULT_COURSE_SEARCH_PATH: &str = "/course/";
const DEFAULT_TERM_FRAGMENT: &str = "/wi26";

/// Hosts, paths and entry URLs of the planning and registration sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMap {
    pub planning_host: String,
    pub registration_host: String,
    /// Planning site landing page (registration workflow entry point).
    pub plan_url: String,
    /// Course search page (class workflows entry point).
    pub course_search_url: String,
    /// Path prefix that identifies the course search page.
    pub course_search_path: String,
    /// Hash fragment (without `#`) of the target term's plan page.
    pub term_fragment: String,
}

impl Default for SiteMap {
    fn default() -> Self {
        Self {
            planning_host: DEFAULT_PLANNING_HOST.to_string(),
            registration_host: DEFAULT_REGISTRATION_HOST.to_string(),
            plan_url: DEFAULT_PLAN_URL.to_string(),
            course_search_url: DEFAULT_COURSE_SEARCH_URL.to_string(),
            course_search_path: DEFAULT_COURSE_SEARCH_PATH.to_string(),
            term_fragment: DEFAULT_TERM_FRAGMENT.to_string(),
        }
    }
}

impl SiteMap {
    /// URL a new tab is opened at for `mode`.
    pub fn initial_target(&self, mode: Mode) -> &str {
        match mode {
            Mode::Registration => &self.plan_url,
            Mode::AddClasses | Mode::AddClassesAndRegister => &self.course_search_url,
        }
    }

    /// Plan page of the target term.
    pub fn term_plan_url(&self) -> String {
        let base = self.plan_url.split('#').next().unwrap_or(&self.plan_url);
        format!("{}#{}", base, self.term_fragment)
    }

    pub fn is_planning(&self, location: &Location) -> bool {
        location.host_is(&self.planning_host)
    }

    pub fn is_registration(&self, location: &Location) -> bool {
        location.host_is(&self.registration_host)
    }

    pub fn is_course_search(&self, location: &Location) -> bool {
        self.is_planning(location) && location.path.starts_with(&self.course_search_path)
    }

    pub fn is_term_plan(&self, location: &Location) -> bool {
        if !self.is_planning(location) {
            return false;
        }
        match location.fragment.as_deref() {
            Some(fragment) => {
                fragment == self.term_fragment
                    || fragment
                        .strip_prefix(self.term_fragment.as_str())
                        .is_some_and(|rest| rest.starts_with('?') || rest.starts_with('/'))
            }
            None => false,
        }
    }
}

/// The parts of a URL that transitions are matched on.
///
/// Query strings are dropped: they vary per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub host: Option<String>,
    pub path: String,
    pub fragment: Option<String>,
}

impl Location {
    pub fn parse(raw: &str) -> Result<Self, CoordinatorError> {
        let url = Url::parse(raw).map_err(|e| CoordinatorError::NavigationParse {
            url: raw.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            host: url.host_str().map(|h| h.to_ascii_lowercase()),
            path: url.path().to_string(),
            fragment: url.fragment().map(str::to_string),
        })
    }

    fn host_is(&self, host: &str) -> bool {
        self.host
            .as_deref()
            .is_some_and(|h| h.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
#[path = "sites_tests.rs"]
mod tests;
