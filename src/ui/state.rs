//! Pure dialog state and the per-tick transition.
//!
//! Nothing here touches egui: [`BusyState::tick`] reads the task and updates
//! plain fields, the renderer in `ui::mod` draws whatever the state says.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use crate::task::BusyTask;
use crate::types::{DialogPhase, ProgressMode};

/// Animation frame counter. Each dialog gets its own unless a counter is
/// shared explicitly, in which case all holders advance the same sequence.
#[derive(Clone, Debug, Default)]
pub struct FrameCounter(Arc<AtomicUsize>);

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Another handle to the same counter.
    pub fn shared(&self) -> Self {
        self.clone()
    }

    pub fn value(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns the frame to display now and moves the counter on, wrapping at
    /// `len`. A zero `len` leaves the counter untouched and returns 0.
    pub fn advance(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let prev = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some((v % len + 1) % len))
            .unwrap_or_else(|v| v);
        prev % len
    }
}

/// Result of evaluating one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Dialog not running, nothing happened.
    Idle,
    /// Task still working; the dialog was refreshed.
    Running,
    /// Task observed as finished on this tick; the dialog is now hidden.
    Finished,
}

#[derive(Clone, Debug)]
pub struct BusyState {
    pub phase: DialogPhase,
    pub visible: bool,
    pub message: String,
    pub progress_enabled: bool,
    pub progress: ProgressMode,
    /// Index of the icon frame on screen, `None` when there is no animation.
    pub frame: Option<usize>,
    pub ticks: u64,
    counter: FrameCounter,
}

impl BusyState {
    pub fn new(progress_enabled: bool, frames_len: usize, counter: FrameCounter) -> Self {
        Self {
            phase: DialogPhase::Idle,
            visible: false,
            message: "...".into(),
            progress_enabled,
            progress: ProgressMode::Indeterminate,
            frame: (frames_len > 0).then_some(0),
            ticks: 0,
            counter,
        }
    }

    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    /// Swap the animation counter, keeping every other field.
    pub fn set_counter(&mut self, counter: FrameCounter) {
        self.counter = counter;
    }

    pub fn is_running(&self) -> bool {
        self.phase == DialogPhase::Running
    }

    /// Enter the running phase and show the dialog.
    pub fn begin(&mut self) {
        self.phase = DialogPhase::Running;
        self.visible = true;
    }

    /// Apply a raw percentage: 0 goes indeterminate, anything else
    /// determinate. Ignored when the progress row is disabled.
    pub fn set_progress(&mut self, value: u8) {
        if !self.progress_enabled {
            return;
        }
        let mode = ProgressMode::from_percent(value);
        if mode.is_indeterminate() != self.progress.is_indeterminate() {
            debug!(?mode, "progress mode changed");
        }
        self.progress = mode;
    }

    /// One timer firing.
    pub fn tick(&mut self, task: &dyn BusyTask, frames_len: usize) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.ticks += 1;
        if task.is_finished() {
            self.visible = false;
            self.phase = DialogPhase::Finished;
            return TickOutcome::Finished;
        }
        if !self.visible {
            self.visible = true;
        }
        if frames_len > 0 {
            self.frame = Some(self.counter.advance(frames_len));
        }
        if self.progress_enabled {
            self.set_progress(task.progress_percent());
        }
        if let Some(msg) = task.status_message() {
            self.message = msg;
        }
        trace!(tick = self.ticks, frame = ?self.frame, progress = ?self.progress, "tick");
        TickOutcome::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Steps {
        // progress per tick, `None` once finished
        script: Vec<Option<u8>>,
        pos: Cell<usize>,
    }

    impl Steps {
        fn new(script: Vec<Option<u8>>) -> Self {
            Self {
                script,
                pos: Cell::new(0),
            }
        }

        fn current(&self) -> Option<u8> {
            let idx = self.pos.get().saturating_sub(1).min(self.script.len() - 1);
            self.script[idx]
        }
    }

    impl BusyTask for Steps {
        fn start(&mut self) {}

        fn is_finished(&self) -> bool {
            self.pos.set(self.pos.get() + 1);
            self.current().is_none()
        }

        fn progress_percent(&self) -> u8 {
            self.current().unwrap_or(100)
        }
    }

    #[test]
    fn idle_state_ignores_ticks() {
        let mut state = BusyState::new(true, 0, FrameCounter::new());
        let task = Steps::new(vec![None]);
        assert_eq!(state.tick(&task, 0), TickOutcome::Idle);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn stays_visible_until_finished() {
        let mut state = BusyState::new(false, 0, FrameCounter::new());
        state.begin();
        let task = Steps::new(vec![Some(0), Some(0), Some(0), Some(0), None]);
        for _ in 0..4 {
            assert_eq!(state.tick(&task, 0), TickOutcome::Running);
            assert!(state.visible);
        }
        assert_eq!(state.tick(&task, 0), TickOutcome::Finished);
        assert!(!state.visible);
        assert_eq!(state.phase, DialogPhase::Finished);
        assert_eq!(state.tick(&task, 0), TickOutcome::Idle);
    }

    #[test]
    fn tick_reshows_hidden_dialog() {
        let mut state = BusyState::new(false, 0, FrameCounter::new());
        state.begin();
        state.visible = false;
        let task = Steps::new(vec![Some(0), None]);
        state.tick(&task, 0);
        assert!(state.visible);
    }

    #[test]
    fn progress_disabled_is_noop() {
        let mut state = BusyState::new(false, 0, FrameCounter::new());
        state.set_progress(40);
        assert_eq!(state.progress, ProgressMode::Indeterminate);
        state.begin();
        state.tick(&Steps::new(vec![Some(70), None]), 0);
        assert_eq!(state.progress, ProgressMode::Indeterminate);
    }

    #[test]
    fn set_progress_switches_modes() {
        let mut state = BusyState::new(true, 0, FrameCounter::new());
        state.set_progress(30);
        assert_eq!(state.progress, ProgressMode::Determinate(30));
        state.set_progress(0);
        assert_eq!(state.progress, ProgressMode::Indeterminate);
        state.set_progress(100);
        assert_eq!(state.progress, ProgressMode::Determinate(100));
    }

    #[test]
    fn frames_cycle_modulo_len() {
        let mut state = BusyState::new(false, 3, FrameCounter::new());
        assert_eq!(state.frame, Some(0));
        state.begin();
        let task = Steps::new(vec![Some(0); 8].into_iter().chain([None]).collect());
        let mut seen = Vec::new();
        for _ in 0..7 {
            state.tick(&task, 3);
            seen.push(state.frame.unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(state.counter().value(), 1);
    }

    #[test]
    fn no_frames_means_no_icon() {
        let mut state = BusyState::new(false, 0, FrameCounter::new());
        state.begin();
        state.tick(&Steps::new(vec![Some(0), None]), 0);
        assert_eq!(state.frame, None);
    }

    #[test]
    fn shared_counter_interleaves() {
        let counter = FrameCounter::new();
        let mut a = BusyState::new(false, 4, counter.shared());
        let mut b = BusyState::new(false, 4, counter.shared());
        a.begin();
        b.begin();
        let ta = Steps::new(vec![Some(0); 10]);
        let tb = Steps::new(vec![Some(0); 10]);
        a.tick(&ta, 4);
        b.tick(&tb, 4);
        a.tick(&ta, 4);
        assert_eq!(a.frame, Some(2));
        assert_eq!(b.frame, Some(1));
        assert_eq!(counter.value(), 3);
    }

    #[test]
    fn advance_with_no_frames_is_zero() {
        let counter = FrameCounter::new();
        assert_eq!(counter.advance(0), 0);
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.advance(2), 0);
        assert_eq!(counter.advance(2), 1);
    }

    #[test]
    fn set_counter_keeps_state() {
        let mut state = BusyState::new(true, 3, FrameCounter::new());
        state.begin();
        state.set_progress(40);
        state.message = "copying".into();
        let shared = FrameCounter::new();
        state.set_counter(shared.shared());
        assert_eq!(state.phase, DialogPhase::Running);
        assert!(state.visible);
        assert_eq!(state.progress, ProgressMode::Determinate(40));
        assert_eq!(state.message, "copying");
        state.tick(&Steps::new(vec![Some(40), None]), 3);
        assert_eq!(shared.value(), 1);
    }

    #[test]
    fn local_counters_are_independent() {
        let mut a = BusyState::new(false, 4, FrameCounter::new());
        let mut b = BusyState::new(false, 4, FrameCounter::new());
        a.begin();
        b.begin();
        let ta = Steps::new(vec![Some(0); 10]);
        let tb = Steps::new(vec![Some(0); 10]);
        a.tick(&ta, 4);
        a.tick(&ta, 4);
        b.tick(&tb, 4);
        assert_eq!(a.frame, Some(1));
        assert_eq!(b.frame, Some(0));
    }
}
