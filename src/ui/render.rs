//! Drawing of the busy modal from a per-frame [`DialogView`] snapshot.

use egui::{Id, ImageSource, ProgressBar, RichText};

use crate::config::BusyDialogConfig;
use crate::style;
use crate::types::ProgressMode;

/// Snapshot of what the dialog should draw this frame.
pub struct DialogView<'a> {
    pub id: Id,
    pub title: &'a str,
    pub message: &'a str,
    pub icon: Option<ImageSource<'static>>,
    /// `None` hides the progress row.
    pub progress: Option<ProgressMode>,
    pub config: &'a BusyDialogConfig,
}

/// Render the modal: title, icon + message row, optional progress row.
/// The modal sizes itself to its content every frame.
pub fn show(ctx: &egui::Context, view: &DialogView<'_>) {
    let cfg = view.config;
    let modal = egui::Modal::new(view.id)
        .frame(style::modal_frame(&ctx.style()))
        .backdrop_color(style::BACKDROP);
    modal.show(ctx, |ui| {
        ui.set_min_width(cfg.min_width);
        ui.label(RichText::new(view.title).strong().size(16.0));
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if let Some(icon) = view.icon.clone() {
                ui.add(egui::Image::new(icon).fit_to_exact_size(egui::vec2(cfg.icon_size, cfg.icon_size)));
            }
            ui.label(view.message);
        });
        if let Some(mode) = view.progress {
            ui.add_space(6.0);
            let time = ui.input(|i| i.time);
            ui.add(progress_bar(mode, cfg, time));
        }
    });
}

fn progress_bar(mode: ProgressMode, cfg: &BusyDialogConfig, time: f64) -> ProgressBar {
    match mode.fraction() {
        Some(fraction) => {
            let bar = ProgressBar::new(fraction)
                .desired_width(cfg.progress_width)
                .fill(style::ACCENT);
            if cfg.show_percentage {
                bar.show_percentage()
            } else {
                bar
            }
        }
        // egui has no indeterminate bar; sweep the fill instead
        None => ProgressBar::new(pulse(time))
            .desired_width(cfg.progress_width)
            .fill(style::ACCENT)
            .animate(true),
    }
}

/// Fill level of the indeterminate bar at `time` seconds, in 0..=1.
pub fn pulse(time: f64) -> f32 {
    ((time * 2.0).sin() * 0.5 + 0.5) as f32
}
