//! A modal busy dialog for egui applications.
//!
//! Build a [`BusyDialog`], attach a [`BusyTask`] (for example a
//! [`WorkerTask`]), call [`BusyDialog::start`] and render it every frame with
//! [`BusyDialog::show`]. The dialog polls the task on a fixed timer and hides
//! itself on the first tick that sees the task finished; the returned
//! [`Completion`] fires at the same moment. Read the task's result afterwards.

pub mod config;
pub mod logging;
pub mod style;
pub mod task;
pub mod ticker;
pub mod types;
pub mod ui;

pub use config::{BusyDialogConfig, ConfigError};
pub use task::{BusyTask, ProgressReporter, TaskError, WorkerTask};
pub use ticker::Ticker;
pub use types::{DialogPhase, IconFrames, ProgressMode, ProgressUpdate};
pub use ui::{
    BusyDialog, BusyDialogError, BusyState, Completion, CompletionError, FrameCounter, TickOutcome,
};
