//! JavaScript run in the page for each [`Locator`] and table query.
//!
//! Every expression is self-contained and returns plain JSON so it can be
//! evaluated with `returnByValue`. Values from Rust are embedded as JSON
//! string literals.

use serde_json::Value;

use super::driver::Locator;

/// Quote `s` as a JavaScript string literal.
fn js_str(s: &str) -> String {
    Value::from(s).to_string()
}

/// Expression evaluating to the element or `null`.
pub fn resolve(locator: &Locator) -> String {
    match locator {
        Locator::TermLink { fragment, label } => {
            let words: Vec<String> = label
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .collect();
            format!(
                r#"(document.querySelector({selector}) ||
  Array.from(document.querySelectorAll("a")).find((a) => {{
    const text = (a.textContent || "").toLowerCase();
    return {words}.every((w) => text.includes(w));
  }}) || null)"#,
                selector = js_str(&format!("a[href='#{}']", fragment)),
                words = Value::from(words),
            )
        }
        Locator::RegisterLink { host } => {
            let short = host.rsplit_once('.').map_or(host.as_str(), |(head, _)| head);
            format!(
                r#"(document.querySelector("a[aria-label='Take me to Register.UW']") ||
  document.querySelector({href}) ||
  Array.from(document.querySelectorAll("a")).find((a) => {{
    const label = (a.getAttribute("aria-label") || a.textContent || "").toLowerCase();
    return label.includes({short});
  }}) || null)"#,
                href = js_str(&format!("a[href*='{}/register']", host)),
                short = js_str(&short.to_lowercase()),
            )
        }
        Locator::ImportButton => r#"(document.querySelector("button#import-myplan") ||
  document.querySelector("button[aria-label='Import from MyPlan to add to cart']") ||
  Array.from(document.querySelectorAll("button")).find((b) => {
    const text = (b.textContent || "").toLowerCase();
    return text.includes("import") && text.includes("myplan");
  }) || null)"#
            .to_string(),
        Locator::UpdateScheduleButton => r#"(document.querySelector("button#submit-registration") ||
  Array.from(document.querySelectorAll("button")).find((b) => {
    const text = (b.textContent || "").toLowerCase();
    return text.includes("update") && text.includes("schedule");
  }) || null)"#
            .to_string(),
        Locator::SearchInput => r#"(document.querySelector("input#search-query") ||
  document.querySelector("input[name='searchQuery']") || null)"#
            .to_string(),
        Locator::SearchButton => {
            r#"(document.querySelector("button[type='submit'].btn.btn-primary") || null)"#.to_string()
        }
        Locator::CourseLink { course } => format!(
            r#"((() => {{
  const wanted = {course}.replace(/\s+/g, " ").trim().toUpperCase();
  const compact = wanted.replace(/\s+/g, "");
  return Array.from(document.querySelectorAll("tbody tr th a")).find((a) => {{
    const code = (a.textContent || "").trim().toUpperCase();
    return code.replace(/\s+/g, " ") === wanted || code.replace(/\s+/g, "") === compact;
  }}) || null;
}})())"#,
            course = js_str(course),
        ),
    }
}

/// Click the element; evaluates to whether it was found.
pub fn click(locator: &Locator) -> String {
    // Links that open a new tab would leave the workflow's tab behind.
    let same_tab = match locator {
        Locator::RegisterLink { .. } => r#"if (el.target === "_blank") { el.target = "_self"; }"#,
        _ => "",
    };
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} {} el.click(); return true; }})()",
        resolve(locator),
        same_tab,
    )
}

/// Set the element's value and fire the events frameworks listen for.
pub fn fill(locator: &Locator, value: &str) -> String {
    format!(
        r#"(() => {{
  const el = {el};
  if (!el) {{ return false; }}
  el.value = {value};
  el.dispatchEvent(new Event("input", {{ bubbles: true }}));
  el.dispatchEvent(new Event("change", {{ bubbles: true }}));
  return true;
}})()"#,
        el = resolve(locator),
        value = js_str(value),
    )
}

fn rows_expr(table_prefix: &str) -> String {
    format!(
        r#"Array.from(document.querySelectorAll({selector})).filter((row) => row.querySelector("td:nth-child(2)"))"#,
        selector = js_str(&format!("tbody[id^='{}'] tr", table_prefix)),
    )
}

const ROW_CODE: &str = r#"((row) => { const c = row.querySelector("td:nth-child(2) .fw-bold.code"); return c ? c.textContent.trim() : ""; })"#;

/// Evaluates to `[{code, status}]` for every section row.
pub fn section_rows(table_prefix: &str) -> String {
    format!(
        r#"(() => {{
  const code = {code};
  return {rows}.map((row) => {{
    const status = row.querySelector("td:nth-child(7)");
    return {{ code: code(row), status: status ? status.textContent.trim() : "" }};
  }}).filter((r) => r.code !== "");
}})()"#,
        code = ROW_CODE,
        rows = rows_expr(table_prefix),
    )
}

/// Click the Select button in the row of section `code`.
pub fn select_section(table_prefix: &str, code: &str) -> String {
    format!(
        r#"(() => {{
  const code = {code_fn};
  const wanted = {wanted}.trim().toUpperCase();
  const row = {rows}.find((r) => code(r).toUpperCase() === wanted);
  const button = row ? row.querySelector("td:last-child button[title*='Select']") : null;
  if (!button) {{ return false; }}
  button.click();
  return true;
}})()"#,
        code_fn = ROW_CODE,
        wanted = js_str(code),
        rows = rows_expr(table_prefix),
    )
}
