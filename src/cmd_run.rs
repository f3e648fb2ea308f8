//! `run` subcommand: open a tab and drive a workflow to its end.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use regpilot_browser_cdp::{
    BrowserManager, BrowserManagerConfig, CdpTabHost, ExecutorSettings, RetryPolicy, TermTarget,
};
use regpilot_config::{Config, ConfigLoader};
use regpilot_core::{Coordinator, EventLoop, EventLoopConfig, SiteMap, StartRequest};
use regpilot_protocols::{Mode, StatusUpdate, TabHost};

use crate::store::Store;

/// Run one workflow until every tab it opened has finished.
pub(crate) async fn handle_run_command(
    mode: Mode,
    config: &Config,
    store: Arc<Store>,
) -> Result<(), Box<dyn std::error::Error>> {
    let classes = if mode.carries_classes() {
        let classes = store.classes().await?;
        if classes.is_empty() {
            return Err("No classes saved. Add some with `regpilot classes add`.".into());
        }
        classes
    } else {
        Vec::new()
    };
    store.clear_statuses().await?;

    info!("Starting {} workflow with {} classes", mode, classes.len());

    let manager = BrowserManager::new(browser_config(config));
    let client = manager.connect().await?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_statuses(status_rx, Arc::clone(&store)));

    let host = Arc::new(CdpTabHost::new(client, events_tx, status_tx, executor_settings(config)).await?);
    let coordinator = Coordinator::new(Arc::clone(&host) as Arc<dyn TabHost>, site_map(config));
    let (event_loop, handle) = EventLoop::new(
        coordinator,
        events_rx,
        EventLoopConfig { exit_when_idle: true },
    );
    let mut loop_task = tokio::spawn(event_loop.run());

    let result: Result<(), Box<dyn std::error::Error>> = match handle.start(StartRequest::new(mode, classes)).await {
        Ok(tab) => {
            info!("Workflow running in tab {}", tab.tab_id);
            tokio::select! {
                joined = &mut loop_task => joined.map(drop).map_err(Into::into),
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, stopping workflow");
                    handle.shutdown().await;
                    (&mut loop_task).await.map(drop).map_err(Into::into)
                }
            }
        }
        Err(e) => {
            error!("Failed to start workflow: {}", e);
            handle.shutdown().await;
            if let Err(join) = loop_task.await {
                warn!("Event loop task failed: {}", join);
            }
            Err(e.into())
        }
    };

    host.wait_for_executors().await;
    // The host owns the last status sender; dropping it ends the writer.
    drop(host);
    if let Err(e) = writer.await {
        warn!("Status writer failed: {}", e);
    }
    manager.close().await;

    result
}

/// Print each status update and append it to the store.
async fn write_statuses(mut rx: mpsc::UnboundedReceiver<StatusUpdate>, store: Arc<Store>) {
    while let Some(update) = rx.recv().await {
        println!("{}", update);
        if let Err(e) = store.append_status(update).await {
            warn!("Failed to save status update: {}", e);
        }
    }
}

fn browser_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        profile_dir: Some(ConfigLoader::expand_path(&config.browser.profile_dir)),
        headless: config.browser.headless,
    }
}

fn executor_settings(config: &Config) -> ExecutorSettings {
    ExecutorSettings {
        retry: RetryPolicy::new(
            config.automation.retry_attempts,
            Duration::from_millis(config.automation.retry_delay_ms),
        ),
        step_delay: Duration::from_millis(config.automation.step_delay_ms),
        term: TermTarget {
            fragment: config.term.fragment.clone(),
            label: config.term.label.clone(),
            section_table_prefix: config.term.section_table_prefix.clone(),
        },
        registration_host: config.sites.registration_host.clone(),
    }
}

fn site_map(config: &Config) -> SiteMap {
    SiteMap {
        planning_host: config.sites.planning_host.clone(),
        registration_host: config.sites.registration_host.clone(),
        plan_url: config.sites.plan_url.clone(),
        course_search_url: config.sites.course_search_url.clone(),
        course_search_path: config.sites.course_search_path.clone(),
        term_fragment: config.term.fragment.clone(),
    }
}
