//! Look of the busy modal, plus a light host theme for the demo window.

use egui::{Color32, Frame, Margin, Stroke, Visuals};

/// Fill of determinate and pulsing progress bars.
pub const ACCENT: Color32 = Color32::from_rgb(0, 122, 255);
/// Dimming painted over the parent window while the dialog is up.
pub const BACKDROP: Color32 = Color32::from_black_alpha(110);

const DIALOG_MARGIN: i8 = 12;

/// Frame around the dialog body, derived from the host's current style so
/// dark and light themes both read correctly.
pub fn modal_frame(style: &egui::Style) -> Frame {
    Frame::window(style)
        .inner_margin(Margin::same(DIALOG_MARGIN))
        .stroke(Stroke::new(1.0, style.visuals.widgets.noninteractive.bg_stroke.color))
}

/// Light theme used by the demo host; accents match the dialog's bars.
pub fn set_appkit_style(ctx: &egui::Context) {
    let mut visuals = Visuals::light();
    visuals.window_fill = Color32::from_gray(236);
    visuals.panel_fill = Color32::WHITE;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    ctx.set_visuals(visuals);
    ctx.style_mut(|style| style.spacing.item_spacing = egui::vec2(8.0, 6.0));
}
