//! Core data types shared across the crate.

use egui::ImageSource;
use std::sync::Arc;

/// Ordered animation frames shown next to the dialog message.
pub type IconFrames = Arc<[ImageSource<'static>]>;

/// What the progress row currently displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Pulsing bar, no numeric readout.
    #[default]
    Indeterminate,
    /// Percentage in 1..=100. Build it with [`ProgressMode::from_percent`];
    /// out-of-range values are clamped when read.
    Determinate(u8),
}

impl ProgressMode {
    /// Map a raw percentage: 0 means indeterminate, anything above 100 clamps.
    pub fn from_percent(value: u8) -> Self {
        match value {
            0 => ProgressMode::Indeterminate,
            v => ProgressMode::Determinate(v.min(100)),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, ProgressMode::Indeterminate)
    }

    /// Fraction for a determinate bar, `None` while indeterminate.
    pub fn fraction(&self) -> Option<f32> {
        match self {
            ProgressMode::Indeterminate => None,
            ProgressMode::Determinate(v) => Some((*v).min(100) as f32 / 100.0),
        }
    }
}

/// Progress update message sent from worker threads to the task handle.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressUpdate {
    Percent(u8),     // 0 ..= 100
    Message(String), // human friendly
}

/// Coarse lifecycle of a dialog as seen by its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Idle,
    Running,
    Finished,
}
