//! Task handles observed by the busy dialog.
//!
//! The dialog never runs work itself: it polls a [`BusyTask`] from the UI
//! thread. [`WorkerTask`] is the stock implementation that runs a closure on
//! a background thread and reports progress over a channel.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::types::ProgressUpdate;

/// Minimal contract between the dialog and an asynchronous unit of work.
pub trait BusyTask {
    /// Launch the work. Called exactly once by the dialog.
    fn start(&mut self);

    fn is_finished(&self) -> bool;

    /// Current progress in 0..=100, where 0 means "unknown".
    fn progress_percent(&self) -> u8;

    /// A new status line for the dialog, if the task produced one since the
    /// last call.
    fn status_message(&self) -> Option<String> {
        None
    }
}

impl<T: BusyTask + ?Sized> BusyTask for Box<T> {
    fn start(&mut self) {
        (**self).start()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }

    fn progress_percent(&self) -> u8 {
        (**self).progress_percent()
    }

    fn status_message(&self) -> Option<String> {
        (**self).status_message()
    }
}

/// Errors returned when retrieving a worker result.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task `{0}` was never started")]
    NotStarted(String),
    #[error("task `{0}` is still running")]
    NotFinished(String),
    #[error("result of task `{0}` was already taken")]
    ResultTaken(String),
    #[error("task `{name}` failed: {error:#}")]
    Failed { name: String, error: anyhow::Error },
    #[error("task `{name}` panicked: {message}")]
    Panicked { name: String, message: String },
}

/// Handle given to the worker closure for reporting back to the UI.
#[derive(Clone)]
pub struct ProgressReporter {
    tx: mpsc::Sender<ProgressUpdate>,
    cancelled: Arc<AtomicBool>,
}

impl ProgressReporter {
    /// Report progress in percent; values above 100 are clamped.
    pub fn set_progress(&self, percent: u8) {
        let _ = self.tx.send(ProgressUpdate::Percent(percent.min(100)));
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let _ = self.tx.send(ProgressUpdate::Message(message.into()));
    }

    /// True once [`WorkerTask::cancel`] was called. Checking is up to the job.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

type Job<T> = Box<dyn FnOnce(&ProgressReporter) -> anyhow::Result<T> + Send + 'static>;

/// Runs a closure on a dedicated thread.
pub struct WorkerTask<T> {
    name: String,
    job: Option<Job<T>>,
    handle: Option<JoinHandle<anyhow::Result<T>>>,
    reporter: ProgressReporter,
    rx: mpsc::Receiver<ProgressUpdate>,
    progress: Cell<u8>,
    message: RefCell<Option<String>>,
    taken: bool,
}

impl<T: Send + 'static> WorkerTask<T> {
    pub fn new<F>(name: impl Into<String>, job: F) -> Self
    where
        F: FnOnce(&ProgressReporter) -> anyhow::Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        Self {
            name: name.into(),
            job: Some(Box::new(job)),
            handle: None,
            reporter: ProgressReporter {
                tx,
                cancelled: Arc::new(AtomicBool::new(false)),
            },
            rx,
            progress: Cell::new(0),
            message: RefCell::new(None),
            taken: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request cooperative cancellation. The job still has to finish on its
    /// own for the dialog to close.
    pub fn cancel(&self) {
        debug!(task = %self.name, "cancellation requested");
        self.reporter.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.reporter.is_cancelled()
    }

    /// Take the job's outcome. Only valid after the task finished.
    pub fn result(&mut self) -> Result<T, TaskError> {
        let Some(handle) = self.handle.take() else {
            return Err(if self.taken {
                TaskError::ResultTaken(self.name.clone())
            } else {
                TaskError::NotStarted(self.name.clone())
            });
        };
        if !handle.is_finished() {
            self.handle = Some(handle);
            return Err(TaskError::NotFinished(self.name.clone()));
        }
        self.taken = true;
        match handle.join() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(TaskError::Failed {
                name: self.name.clone(),
                error,
            }),
            Err(payload) => Err(TaskError::Panicked {
                name: self.name.clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    // pull pending updates from the worker (non-blocking)
    fn drain(&self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                ProgressUpdate::Percent(p) => self.progress.set(p),
                ProgressUpdate::Message(m) => *self.message.borrow_mut() = Some(m),
            }
        }
    }
}

impl<T: Send + 'static> BusyTask for WorkerTask<T> {
    fn start(&mut self) {
        let Some(job) = self.job.take() else {
            warn!(task = %self.name, "task already started");
            return;
        };
        let reporter = self.reporter.clone();
        let name = self.name.clone();
        debug!(task = %name, "spawning worker thread");
        self.handle = Some(thread::spawn(move || {
            let res = job(&reporter);
            if let Err(e) = &res {
                debug!(task = %name, error = %e, "worker returned an error");
            }
            res
        }));
    }

    fn is_finished(&self) -> bool {
        self.taken || self.handle.as_ref().is_some_and(|h| h.is_finished())
    }

    fn progress_percent(&self) -> u8 {
        self.drain();
        self.progress.get()
    }

    fn status_message(&self) -> Option<String> {
        self.drain();
        self.message.borrow_mut().take()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
