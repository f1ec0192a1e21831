//! Egui-based busy dialog.
//!
//! This module defines the dialog widget, wires the repeating [`Ticker`] to
//! the pure [`BusyState::tick`] transition and hands rendering to
//! `ui::render`.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use egui::ImageSource;
use tracing::{info, warn};

use crate::config::BusyDialogConfig;
use crate::task::BusyTask;
use crate::ticker::Ticker;
use crate::types::{DialogPhase, IconFrames, ProgressMode};

pub mod render;
pub mod state;

pub use state::{BusyState, FrameCounter, TickOutcome};

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BusyDialogError {
    /// `start` called before `attach_task`.
    #[error("no task attached to busy dialog")]
    NoTask,
    #[error("busy dialog was already started")]
    AlreadyStarted,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CompletionError {
    /// The dialog was dropped before its task was seen finishing.
    #[error("busy dialog dropped before the task finished")]
    Abandoned,
}

/// Fires once the dialog observes its task as finished and hides itself.
///
/// Returned by [`BusyDialog::start`]. The UI thread should poll
/// [`Completion::is_complete`]; the blocking waits are for other threads,
/// since the dialog only advances while its host keeps rendering frames.
#[derive(Debug)]
pub struct Completion {
    rx: mpsc::Receiver<()>,
    done: Cell<bool>,
}

impl Completion {
    fn new(rx: mpsc::Receiver<()>) -> Self {
        Self {
            rx,
            done: Cell::new(false),
        }
    }

    pub fn is_complete(&self) -> bool {
        if !self.done.get() && self.rx.try_recv().is_ok() {
            self.done.set(true);
        }
        self.done.get()
    }

    pub fn wait(&self) -> Result<(), CompletionError> {
        if self.done.get() {
            return Ok(());
        }
        self.rx.recv().map_err(|_| CompletionError::Abandoned)?;
        self.done.set(true);
        Ok(())
    }

    /// Returns `Ok(false)` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool, CompletionError> {
        if self.done.get() {
            return Ok(true);
        }
        match self.rx.recv_timeout(timeout) {
            Ok(()) => {
                self.done.set(true);
                Ok(true)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(false),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CompletionError::Abandoned),
        }
    }
}

/// Modal dialog showing a message, an optional animated icon and an optional
/// progress bar while a [`BusyTask`] runs. It hides itself on the first tick
/// that sees the task finished.
///
/// There is no timeout: a task that never finishes keeps the dialog up.
pub struct BusyDialog<T> {
    id: egui::Id,
    title: String,
    parent: egui::Context,
    frames: Option<IconFrames>,
    icon_override: Option<ImageSource<'static>>,
    state: BusyState,
    task: Option<T>,
    ticker: Option<Ticker>,
    done_tx: Option<mpsc::Sender<()>>,
    config: BusyDialogConfig,
}

impl<T: BusyTask> BusyDialog<T> {
    /// Build the dialog. Empty `frames` behave like no frames at all.
    pub fn new(
        parent: &egui::Context,
        title: impl Into<String>,
        progress_enabled: bool,
        frames: Option<IconFrames>,
    ) -> Self {
        let frames = frames.filter(|f| !f.is_empty());
        let frames_len = frames.as_ref().map_or(0, |f| f.len());
        let title = title.into();
        let serial = NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: egui::Id::new(("busy_dialog", serial)),
            title,
            parent: parent.clone(),
            frames,
            icon_override: None,
            state: BusyState::new(progress_enabled, frames_len, FrameCounter::new()),
            task: None,
            ticker: None,
            done_tx: None,
            config: BusyDialogConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BusyDialogConfig) -> Self {
        self.config = config;
        self
    }

    /// Drive the icon animation from `counter` instead of a private one.
    /// Dialogs holding the same counter advance one shared sequence. Ignored
    /// once the dialog has been started.
    pub fn with_frame_counter(mut self, counter: FrameCounter) -> Self {
        if self.state.phase != DialogPhase::Idle {
            warn!(title = %self.title, "frame counter swap after start ignored");
            return self;
        }
        self.state.set_counter(counter);
        self
    }

    /// Set the task to observe. Ignored once the dialog has been started.
    pub fn attach_task(&mut self, task: T) {
        if self.state.phase != DialogPhase::Idle {
            warn!(title = %self.title, "attach_task after start ignored");
            return;
        }
        self.task = Some(task);
    }

    /// Arm the timer, launch the task and show the dialog.
    pub fn start(&mut self) -> Result<Completion, BusyDialogError> {
        if self.state.phase != DialogPhase::Idle {
            warn!(title = %self.title, "start called twice");
            return Err(BusyDialogError::AlreadyStarted);
        }
        let Some(task) = self.task.as_mut() else {
            warn!(title = %self.title, "start called without a task");
            return Err(BusyDialogError::NoTask);
        };
        let period = self.config.tick_period();
        self.ticker = Some(Ticker::new(period, Instant::now()));
        task.start();
        let (tx, rx) = mpsc::channel();
        self.done_tx = Some(tx);
        self.state.begin();
        info!(title = %self.title, ?period, "busy dialog started");
        self.parent.request_repaint();
        Ok(Completion::new(rx))
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.state.message = text.into();
        self.parent.request_repaint();
    }

    /// Show `frame` until the next tick advances the animation.
    pub fn set_icon(&mut self, frame: ImageSource<'static>) {
        self.icon_override = Some(frame);
        self.parent.request_repaint();
    }

    /// 0 switches to indeterminate, 1..=100 shows that percentage. No-op when
    /// the dialog was built without a progress bar.
    pub fn set_progress(&mut self, value: u8) {
        self.state.set_progress(value);
        self.parent.request_repaint();
    }

    /// Evaluate one timer firing. [`BusyDialog::show`] calls this when the
    /// period elapses; hosts with their own clock may call it directly.
    pub fn tick(&mut self) -> TickOutcome {
        let frames_len = self.frames_len();
        let Some(task) = self.task.as_ref() else {
            return TickOutcome::Idle;
        };
        let outcome = self.state.tick(task, frames_len);
        match outcome {
            TickOutcome::Finished => {
                self.ticker = None;
                if let Some(tx) = self.done_tx.take() {
                    let _ = tx.send(());
                }
                info!(title = %self.title, ticks = self.state.ticks, "busy dialog finished");
            }
            TickOutcome::Running if frames_len > 0 => self.icon_override = None,
            _ => {}
        }
        if outcome != TickOutcome::Idle {
            self.parent.request_repaint();
        }
        outcome
    }

    /// Per-frame entry point: runs a due tick, draws the modal while visible
    /// and schedules the next repaint.
    pub fn show(&mut self, ctx: &egui::Context) -> DialogPhase {
        let now = Instant::now();
        if self.ticker.as_mut().is_some_and(|t| t.poll(now)) {
            self.tick();
        }
        if let Some(ticker) = &self.ticker {
            ctx.request_repaint_after(ticker.remaining(now));
        }
        if self.state.visible {
            let view = render::DialogView {
                id: self.id,
                title: &self.title,
                message: &self.state.message,
                icon: self.current_icon(),
                progress: self.state.progress_enabled.then_some(self.state.progress),
                config: &self.config,
            };
            render::show(ctx, &view);
        }
        self.state.phase
    }

    fn frames_len(&self) -> usize {
        self.frames.as_ref().map_or(0, |f| f.len())
    }

    /// Icon currently on screen: a manual override, else the animation frame.
    pub fn current_icon(&self) -> Option<ImageSource<'static>> {
        if let Some(icon) = &self.icon_override {
            return Some(icon.clone());
        }
        let frames = self.frames.as_ref()?;
        self.state.frame.and_then(|i| frames.get(i)).cloned()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Busy dialogs always block input to the parent window.
    pub fn is_modal(&self) -> bool {
        true
    }

    pub fn message(&self) -> &str {
        &self.state.message
    }

    pub fn phase(&self) -> DialogPhase {
        self.state.phase
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn is_timer_active(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn progress_enabled(&self) -> bool {
        self.state.progress_enabled
    }

    /// `None` when the dialog has no progress bar.
    pub fn progress(&self) -> Option<ProgressMode> {
        self.state.progress_enabled.then_some(self.state.progress)
    }

    pub fn displayed_frame(&self) -> Option<usize> {
        self.state.frame
    }

    pub fn frame_counter(&self) -> &FrameCounter {
        self.state.counter()
    }

    pub fn state(&self) -> &BusyState {
        &self.state
    }

    pub fn task(&self) -> Option<&T> {
        self.task.as_ref()
    }

    pub fn task_mut(&mut self) -> Option<&mut T> {
        self.task.as_mut()
    }

    /// Give the task back to the caller, typically to read its result.
    pub fn into_task(self) -> Option<T> {
        self.task
    }
}
