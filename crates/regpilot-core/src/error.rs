//! Coordinator errors.

use thiserror::Error;

use regpilot_protocols::Mode;

use crate::stage::Stage;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The host refused to open a tab.
    #[error("Tab creation failed: {0}")]
    TabCreation(String),

    /// A navigation event carried a URL that could not be parsed.
    #[error("Unparseable navigation URL {url}: {message}")]
    NavigationParse { url: String, message: String },

    /// A class-adding workflow was requested without classes.
    #[error("Mode {0} needs at least one class")]
    EmptyClassList(Mode),

    /// A transition tried to move a stage backwards.
    #[error("Stage cannot move from {from} back to {to}")]
    BackwardTransition { from: Stage, to: Stage },

    /// The event loop is no longer accepting commands.
    #[error("Event loop closed")]
    LoopClosed,
}
