//! Demo window: launches example tasks behind a busy dialog.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use busy_dialog::style::set_appkit_style;
use busy_dialog::{BusyDialog, BusyDialogConfig, DialogPhase, IconFrames, ProgressReporter, WorkerTask};
use eframe::{App, egui};
use egui::load::SizedTexture;
use egui::{Color32, ColorImage, ImageSource, TextureHandle, TextureOptions};
use tracing::{info, warn};

const FRAME_COUNT: usize = 8;
const FRAME_PX: usize = 32;

type DemoDialog = BusyDialog<WorkerTask<String>>;

pub struct DemoApp {
    config: BusyDialogConfig,
    // keeps the frame textures alive
    _textures: Vec<TextureHandle>,
    frames: IconFrames,
    dialog: Option<DemoDialog>,
    status_msgs: Vec<String>,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: BusyDialogConfig) -> Self {
        set_appkit_style(&cc.egui_ctx);
        let textures = spinner_textures(&cc.egui_ctx);
        let frames: IconFrames = textures
            .iter()
            .map(|t| ImageSource::Texture(SizedTexture::from_handle(t)))
            .collect::<Vec<_>>()
            .into();
        Self {
            config,
            _textures: textures,
            frames,
            dialog: None,
            status_msgs: Vec::new(),
        }
    }

    fn launch(&mut self, ctx: &egui::Context, title: &str, progress: bool, icons: bool, task: WorkerTask<String>) {
        let frames = icons.then(|| Arc::clone(&self.frames));
        let mut dialog = BusyDialog::new(ctx, title, progress, frames).with_config(self.config.clone());
        dialog.set_message(format!("{}...", task.name()));
        dialog.attach_task(task);
        match dialog.start() {
            Ok(_) => self.dialog = Some(dialog),
            Err(e) => self.status_msgs.push(format!("Cannot start: {e}")),
        }
    }

    fn collect_finished(&mut self) {
        let Some(dialog) = self.dialog.take_if(|d| d.phase() == DialogPhase::Finished) else {
            return;
        };
        let title = dialog.title().to_string();
        let Some(mut task) = dialog.into_task() else {
            return;
        };
        match task.result() {
            Ok(summary) => {
                info!(%title, %summary, "task succeeded");
                self.status_msgs.push(format!("{title}: {summary}"));
            }
            Err(e) => {
                warn!(%title, error = %e, "task failed");
                self.status_msgs.push(format!("{title}: {e}"));
            }
        }
    }
}

impl App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.show(ctx);
        }
        self.collect_finished();

        let busy = self.dialog.is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!("Busy Dialog v{}", env!("CARGO_PKG_VERSION")));
            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                if ui.add_enabled(!busy, egui::Button::new("Copy files")).clicked() {
                    self.launch(ctx, "Copying", true, false, counting_task("Copying files", 40));
                }
                if ui.add_enabled(!busy, egui::Button::new("Index library")).clicked() {
                    self.launch(ctx, "Indexing", true, true, warmup_task());
                }
                if ui.add_enabled(!busy, egui::Button::new("Wait for server")).clicked() {
                    self.launch(ctx, "Connecting", false, true, sleep_task());
                }
                if ui.add_enabled(!busy, egui::Button::new("Broken import")).clicked() {
                    self.launch(ctx, "Importing", true, false, failing_task());
                }
            });
            ui.add_space(8.0);
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for msg in &self.status_msgs {
                    ui.label(msg);
                }
            });
        });
    }
}

fn counting_task(name: &str, step_ms: u64) -> WorkerTask<String> {
    WorkerTask::new(name, move |r: &ProgressReporter| {
        for p in 1..=100u8 {
            if r.is_cancelled() {
                anyhow::bail!("cancelled at {p}%");
            }
            r.set_progress(p);
            thread::sleep(Duration::from_millis(step_ms));
        }
        Ok("100 files copied".to_string())
    })
}

// unknown amount of work first, then measurable work
fn warmup_task() -> WorkerTask<String> {
    WorkerTask::new("Indexing library", |r: &ProgressReporter| {
        r.set_message("Scanning folders...");
        thread::sleep(Duration::from_secs(2));
        let total = 250u32;
        for i in 1..=total {
            r.set_progress((i * 100 / total) as u8);
            if i % 50 == 0 {
                r.set_message(format!("Indexed {i} of {total} items"));
            }
            thread::sleep(Duration::from_millis(12));
        }
        Ok(format!("{total} items indexed"))
    })
}

fn sleep_task() -> WorkerTask<String> {
    WorkerTask::new("Waiting for server", |_: &ProgressReporter| {
        thread::sleep(Duration::from_secs(3));
        Ok("server ready".to_string())
    })
}

fn failing_task() -> WorkerTask<String> {
    WorkerTask::new("Importing archive", |r: &ProgressReporter| {
        for p in (5..=35u8).step_by(5) {
            r.set_progress(p);
            thread::sleep(Duration::from_millis(150));
        }
        anyhow::bail!("archive is truncated")
    })
}

/// Eight frames of a ring of dots with one highlighted dot walking around.
fn spinner_textures(ctx: &egui::Context) -> Vec<TextureHandle> {
    (0..FRAME_COUNT)
        .map(|frame| {
            let image = spinner_frame(frame);
            ctx.load_texture(format!("busy_spinner_{frame}"), image, TextureOptions::LINEAR)
        })
        .collect()
}

fn spinner_frame(frame: usize) -> ColorImage {
    let mut rgba = vec![0u8; FRAME_PX * FRAME_PX * 4];
    let center = FRAME_PX as f32 / 2.0;
    let ring = center - 6.0;
    for dot in 0..FRAME_COUNT {
        let angle = dot as f32 / FRAME_COUNT as f32 * std::f32::consts::TAU;
        let (cx, cy) = (center + ring * angle.cos(), center + ring * angle.sin());
        let color = if dot == frame {
            Color32::from_rgb(0, 122, 255)
        } else {
            Color32::from_gray(180)
        };
        for y in 0..FRAME_PX {
            for x in 0..FRAME_PX {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if dx * dx + dy * dy <= 9.0 {
                    let i = (y * FRAME_PX + x) * 4;
                    rgba[i..i + 4].copy_from_slice(&color.to_array());
                }
            }
        }
    }
    ColorImage::from_rgba_unmultiplied([FRAME_PX, FRAME_PX], &rgba)
}
