//! Channel-driven event loop around the coordinator.
//!
//! Host events and control commands arrive on separate channels and are
//! handled strictly one at a time. Handlers never block on page readiness;
//! the host runs page automation in its own tasks.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use regpilot_protocols::{HostEvent, Mode, TabHandle};

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;

/// Command channel capacity.
const COMMAND_BUFFER: usize = 16;

/// Request to start a workflow in a new tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub mode: Mode,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Overrides the mode's default entry URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_target: Option<String>,
}

impl StartRequest {
    pub fn new(mode: Mode, classes: Vec<String>) -> Self {
        Self {
            mode,
            classes,
            initial_target: None,
        }
    }

    pub fn with_target(mut self, url: impl Into<String>) -> Self {
        self.initial_target = Some(url.into());
        self
    }
}

/// Control messages for the event loop.
#[derive(Debug)]
pub enum Command {
    Start {
        request: StartRequest,
        reply: oneshot::Sender<Result<TabHandle, CoordinatorError>>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Default)]
pub struct EventLoopConfig {
    /// Return from [`EventLoop::run`] once at least one workflow was
    /// started and the registry is empty again.
    pub exit_when_idle: bool,
}

/// Cloneable handle for sending commands to a running [`EventLoop`].
#[derive(Debug, Clone)]
pub struct LoopHandle {
    tx: mpsc::Sender<Command>,
}

impl LoopHandle {
    /// Start a workflow and wait for the tab to be opened.
    pub async fn start(&self, request: StartRequest) -> Result<TabHandle, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Start { request, reply })
            .await
            .map_err(|_| CoordinatorError::LoopClosed)?;
        rx.await.map_err(|_| CoordinatorError::LoopClosed)?
    }

    /// Ask the loop to stop after the event it is handling.
    pub async fn shutdown(&self) {
        if self.tx.send(Command::Shutdown).await.is_err() {
            debug!("Event loop already stopped");
        }
    }
}

/// Single consumer of host events and commands.
pub struct EventLoop {
    coordinator: Coordinator,
    events: mpsc::UnboundedReceiver<HostEvent>,
    commands: mpsc::Receiver<Command>,
    config: EventLoopConfig,
    started: bool,
}

impl EventLoop {
    pub fn new(
        coordinator: Coordinator,
        events: mpsc::UnboundedReceiver<HostEvent>,
        config: EventLoopConfig,
    ) -> (Self, LoopHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let event_loop = Self {
            coordinator,
            events,
            commands,
            config,
            started: false,
        };
        (event_loop, LoopHandle { tx })
    }

    /// Run until shutdown, until the host event channel closes, or (with
    /// `exit_when_idle`) until every started workflow has ended.
    ///
    /// Returns the coordinator so callers can inspect the final registry.
    pub async fn run(mut self) -> Coordinator {
        info!("Workflow event loop started");
        let mut commands_open = true;

        loop {
            tokio::select! {
                command = self.commands.recv(), if commands_open => match command {
                    Some(Command::Start { request, reply }) => {
                        let result = self.start(request).await;
                        if reply.send(result).is_err() {
                            debug!("Start requester went away before the reply");
                        }
                    }
                    Some(Command::Shutdown) => {
                        info!("Event loop shutdown requested");
                        break;
                    }
                    None => commands_open = false,
                },
                event = self.events.recv() => match event {
                    Some(event) => {
                        let tab_id = event.tab_id().clone();
                        let outcome = self.coordinator.handle(event).await;
                        debug!("Tab {}: {:?}", tab_id, outcome);
                    }
                    None => {
                        warn!("Host event channel closed");
                        break;
                    }
                },
            }

            if self.config.exit_when_idle && self.started && self.coordinator.registry().is_empty() {
                info!("All workflows finished");
                break;
            }
        }

        self.coordinator
    }

    async fn start(&mut self, request: StartRequest) -> Result<TabHandle, CoordinatorError> {
        let target = match request.initial_target {
            Some(url) => url,
            None => self.coordinator.sites().initial_target(request.mode).to_string(),
        };
        let handle = self
            .coordinator
            .start_workflow(request.mode, &target, request.classes)
            .await?;
        self.started = true;
        Ok(handle)
    }
}
