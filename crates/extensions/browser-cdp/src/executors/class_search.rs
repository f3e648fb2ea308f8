//! Search for each requested class and select its sections.

use async_trait::async_trait;
use regpilot_protocols::{ClassSpec, ExecutorKind, StatusUpdate};
use tracing::{info, warn};

use super::sections::select_sections;
use super::{ExecutorContext, ExecutorError, Locator, PageExecutor, Pause};

/// Runs on the course search page. Failures of one class are reported and
/// the next class is tried; only a page error ends the run early.
pub struct ClassSearch;

/// How one class ended. Failures were already reported.
enum ClassOutcome {
    Added,
    /// Failed on the search page.
    Skipped,
    /// Failed on the course page; the tab must go back.
    Abandoned,
}

#[async_trait]
impl PageExecutor for ClassSearch {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::ClassSearch
    }

    async fn execute(&self, mut ctx: ExecutorContext) -> Result<(), ExecutorError> {
        let classes = ctx.payload.classes.clone();
        let total = classes.len();

        for (index, raw) in classes.iter().enumerate() {
            let spec = match ClassSpec::parse(raw) {
                Ok(spec) => spec,
                Err(e) => {
                    ctx.report(StatusUpdate::error(raw.trim(), None, e.to_string()));
                    continue;
                }
            };
            info!(
                "Adding class {}/{} in tab {}: {}",
                index + 1,
                total,
                ctx.tab_id,
                spec.display_text()
            );

            match self.add_class(&ctx, &spec).await? {
                ClassOutcome::Added => {
                    ctx.pause(Pause::BeforeBack).await;
                    ctx.page.go_back().await?;
                }
                ClassOutcome::Abandoned => ctx.page.go_back().await?,
                ClassOutcome::Skipped => {}
            }
            ctx.pause(Pause::NextClass).await;
        }

        info!("Finished processing all classes in tab {}", ctx.tab_id);
        ctx.report(StatusUpdate::success(
            "All courses",
            None,
            "Finished processing all classes",
        ));
        if ctx.payload.signals_completion() {
            ctx.signal_completion();
        }
        Ok(())
    }
}

impl ClassSearch {
    async fn add_class(&self, ctx: &ExecutorContext, spec: &ClassSpec) -> Result<ClassOutcome, ExecutorError> {
        let course = spec.course.as_str();
        let label = Some(spec.display_text());

        if !ctx.fill_when_present(&Locator::SearchInput, course).await? {
            ctx.report(StatusUpdate::error(course, label, "Search input not found"));
            return Ok(ClassOutcome::Skipped);
        }
        ctx.pause(Pause::AfterFill).await;

        if !ctx.click_when_present(&Locator::SearchButton).await? {
            ctx.report(StatusUpdate::error(course, label, "Search button not found"));
            return Ok(ClassOutcome::Skipped);
        }
        ctx.pause(Pause::SearchResults).await;

        let link = Locator::CourseLink {
            course: course.to_string(),
        };
        if !ctx.click_when_present(&link).await? {
            ctx.report(StatusUpdate::error(
                course,
                label,
                "Course not found in search results",
            ));
            return Ok(ClassOutcome::Skipped);
        }
        ctx.pause(Pause::CoursePage).await;

        let Some(rows) = ctx.section_rows().await? else {
            ctx.report(StatusUpdate::error(course, None, "No sections found on page"));
            return Ok(ClassOutcome::Abandoned);
        };

        let choice = match select_sections(&rows, spec.lecture.as_deref(), spec.quiz.as_deref()) {
            Ok(choice) => choice,
            Err(e) => {
                warn!("No sections selected for {}: {}", course, e);
                ctx.report(StatusUpdate::error(course, e.section(), e.to_string()));
                return Ok(ClassOutcome::Abandoned);
            }
        };

        let prefix = ctx.settings.term.section_table_prefix.as_str();
        for (i, code) in choice.codes().enumerate() {
            if i > 0 {
                ctx.pause(Pause::BetweenSections).await;
            }
            if !ctx.page.select_section(prefix, code).await? {
                ctx.report(StatusUpdate::error(
                    course,
                    Some(code.to_string()),
                    "Select button not found",
                ));
                return Ok(ClassOutcome::Abandoned);
            }
            info!("Selected {} section {}", course, code);
            ctx.report(StatusUpdate::success(
                course,
                Some(code.to_string()),
                format!("Successfully added section {}", code),
            ));
        }

        Ok(ClassOutcome::Added)
    }
}
