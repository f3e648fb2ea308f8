//! Executors that move a tab from the planning site to registration.

use async_trait::async_trait;
use regpilot_protocols::{ExecutorKind, StatusUpdate};
use tracing::info;

use super::{ExecutorContext, ExecutorError, Locator, PageExecutor, Pause};

/// Course label used for status entries not tied to a class.
const REGISTRATION: &str = "Registration";

/// Click `locator` or report it missing.
async fn click_required(ctx: &ExecutorContext, locator: Locator) -> Result<(), ExecutorError> {
    if ctx.click_when_present(&locator).await? {
        info!("Clicked {} in tab {}", locator, ctx.tab_id);
        return Ok(());
    }
    ctx.report(StatusUpdate::warning(
        REGISTRATION,
        None,
        format!("Could not find the {}", locator),
    ));
    Err(ExecutorError::ElementNotFound(locator.to_string()))
}

fn register_link(ctx: &ExecutorContext) -> Locator {
    Locator::RegisterLink {
        host: ctx.settings.registration_host.clone(),
    }
}

/// Select the term on the plan page, then follow the registration link.
pub struct TermSelectHandoff;

#[async_trait]
impl PageExecutor for TermSelectHandoff {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::TermSelectHandoff
    }

    async fn execute(&self, ctx: ExecutorContext) -> Result<(), ExecutorError> {
        let term = &ctx.settings.term;
        click_required(
            &ctx,
            Locator::TermLink {
                fragment: term.fragment.clone(),
                label: term.label.clone(),
            },
        )
        .await?;
        ctx.pause(Pause::AfterTermClick).await;
        click_required(&ctx, register_link(&ctx)).await
    }
}

/// Follow the registration link from a page already showing the term.
pub struct RegisterHandoff;

#[async_trait]
impl PageExecutor for RegisterHandoff {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::RegisterHandoff
    }

    async fn execute(&self, ctx: ExecutorContext) -> Result<(), ExecutorError> {
        click_required(&ctx, register_link(&ctx)).await
    }
}

/// Import the planned cart on the registration page and submit it.
pub struct ImportAndSubmit;

#[async_trait]
impl PageExecutor for ImportAndSubmit {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::ImportAndSubmit
    }

    async fn execute(&self, ctx: ExecutorContext) -> Result<(), ExecutorError> {
        click_required(&ctx, Locator::ImportButton).await?;
        ctx.pause(Pause::BeforeSubmit).await;
        click_required(&ctx, Locator::UpdateScheduleButton).await?;
        ctx.report(StatusUpdate::success(
            REGISTRATION,
            None,
            "Submitted registration (Update Schedule)",
        ));
        Ok(())
    }
}
