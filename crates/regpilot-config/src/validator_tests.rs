use super::*;

fn error_paths(report: &ValidationReport) -> Vec<&str> {
    report.errors().map(|f| f.path.as_str()).collect()
}

#[test]
fn test_default_config_is_clean() {
    let report = ConfigValidator::validate(&Config::default());
    assert!(report.is_valid());
    assert_eq!(report.warnings().count(), 0);
}

#[test]
fn test_zero_port_and_attempts() {
    let mut config = Config::default();
    config.browser.debug_port = 0;
    config.automation.retry_attempts = 0;

    let report = ConfigValidator::validate(&config);
    assert!(!report.is_valid());
    assert_eq!(
        error_paths(&report),
        vec!["browser.debug_port", "automation.retry_attempts"]
    );
}

#[test]
fn test_blank_host() {
    let mut config = Config::default();
    config.sites.registration_host = "  ".to_string();

    let report = ConfigValidator::validate(&config);
    assert_eq!(error_paths(&report), vec!["sites.registration_host"]);
}

#[test]
fn test_unparseable_url() {
    let mut config = Config::default();
    config.sites.plan_url = "not a url".to_string();

    let report = ConfigValidator::validate(&config);
    let finding = report.errors().find(|f| f.path == "sites.plan_url").unwrap();
    assert!(finding.message.starts_with("Invalid URL"));
}

#[test]
fn test_entry_url_on_registration_host() {
    let mut config = Config::default();
    config.sites.course_search_url = "https://register.uw.edu/course/".to_string();

    let report = ConfigValidator::validate(&config);
    assert_eq!(error_paths(&report), vec!["sites.course_search_url"]);
}

#[test]
fn test_host_comparison_ignores_case() {
    let mut config = Config::default();
    config.sites.planning_host = "MyPlan.UW.edu".to_string();
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_term_fragment_needs_slash() {
    let mut config = Config::default();
    config.term.fragment = "wi26".to_string();

    let report = ConfigValidator::validate(&config);
    assert_eq!(error_paths(&report), vec!["term.fragment"]);
}

#[test]
fn test_long_polling_budget_warns() {
    let mut config = Config::default();
    config.automation.retry_attempts = 1000;
    config.automation.retry_delay_ms = 1000;

    let report = ConfigValidator::validate(&config);
    assert!(report.is_valid());
    let warning = report.warnings().next().unwrap();
    assert_eq!(warning.path, "automation");
    assert_eq!(warning.to_string(), "automation: Polling for one element may take 1000s");
}

#[test]
fn test_ensure_valid_reports_first_error() {
    let mut config = Config::default();
    config.browser.debug_port = 0;

    let err = ConfigValidator::ensure_valid(&config).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value for browser.debug_port: Port cannot be 0");
}

#[test]
fn test_ensure_valid_passes_warnings_through() {
    let mut config = Config::default();
    config.term.section_table_prefix.clear();

    let report = ConfigValidator::ensure_valid(&config).unwrap();
    assert_eq!(report.warnings().count(), 1);
}
