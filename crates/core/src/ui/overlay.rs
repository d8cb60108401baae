//! The fullscreen snap overlay.
//!
//! `SnapOverlay` implements `eframe::App`. It owns one [`Session`] and feeds it
//! the pointer and Escape input of each frame; the session decides everything
//! else.

use super::rendering::{draw_dim, draw_grid, draw_selection, draw_snap_preview};
use super::selection::{cancel_requested, pointer_inputs, OverlaySurface, PointerFrame};
use super::settings::Settings;
use crate::error::{AppError, Result};
use crate::geometry::{snap_to_grid, Rect};
use crate::session::{Input, Outcome, Session, Surface};
use crate::sink::Sink;
use eframe::egui;
use std::sync::{Arc, Mutex};

/// The overlay application.
pub struct SnapOverlay {
    session: Session,
    sink: Box<dyn Sink>,
    settings: Settings,
    keep_open: bool,
    /// Last rect reported through feedback; `None` once cleared.
    selection: Option<Rect>,
    pub result: Arc<Mutex<Option<Outcome>>>,
}

/// Shifts a surface-local rect into screen space for painting.
fn on_screen(r: Rect, area: egui::Rect) -> Rect {
    Rect {
        x: r.x + area.min.x,
        y: r.y + area.min.y,
        ..r
    }
}

impl SnapOverlay {
    pub fn new(
        sink: Box<dyn Sink>,
        settings: Settings,
        keep_open: bool,
        result: Arc<Mutex<Option<Outcome>>>,
    ) -> Self {
        Self {
            session: Session::new(),
            sink,
            settings,
            keep_open,
            selection: None,
            result,
        }
    }

    /// Runs one input through the session and records a finished cycle.
    ///
    /// Returns true when the overlay should close.
    fn feed(&mut self, input: Input, surface: &OverlaySurface) -> bool {
        let mut selection = self.selection;
        let mut feedback = |rect: Option<Rect>| selection = rect;
        let outcome = self
            .session
            .dispatch(input, surface, &self.sink, &mut feedback);
        self.selection = selection;

        let Some(outcome) = outcome else {
            return false;
        };
        match self.result.lock() {
            Ok(mut slot) => *slot = Some(outcome),
            Err(poisoned) => *poisoned.into_inner() = Some(outcome),
        }
        // A rejected drag leaves the overlay up so the user can try again.
        match outcome {
            Outcome::Applied(_) | Outcome::Cancelled => !self.keep_open,
            Outcome::Rejected { .. } => false,
        }
    }

    fn paint(&self, painter: &egui::Painter, area: egui::Rect) {
        draw_dim(painter, area, self.settings.dim_alpha);

        let bounds = self
            .session
            .bounds()
            .unwrap_or_else(|| OverlaySurface(area).bounds());

        if self.settings.show_grid {
            draw_grid(painter, on_screen(bounds, area));
        }

        if let Some(selection) = self.selection {
            if self.settings.snap_preview {
                if let Ok(cell) = snap_to_grid(selection, bounds) {
                    draw_snap_preview(painter, on_screen(cell, area));
                }
            }
            draw_selection(painter, on_screen(selection, area), self.settings.border_width);
        }
    }
}

impl eframe::App for SnapOverlay {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // Fully transparent so only the dim layer covers the desktop.
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let panel_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(0))
            .outer_margin(egui::Margin::same(0));

        let mut close = false;

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let area = ui.max_rect();
                let surface = OverlaySurface(area);
                let frame = ctx.input(PointerFrame::read);

                let mut inputs = pointer_inputs(frame, area);
                if cancel_requested(ctx) {
                    if self.session.is_dragging() {
                        inputs.push(Input::Cancel);
                    } else {
                        close = true;
                    }
                }

                for input in inputs {
                    close |= self.feed(input, &surface);
                }

                self.paint(ui.painter(), area);
            });

        if close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Opens the overlay and blocks until it is closed.
///
/// # Returns
/// The outcome of the last finished drag, or `None` if the overlay was closed
/// without one.
pub fn run(sink: Box<dyn Sink>, keep_open: bool) -> Result<Option<Outcome>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("gridsnap")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top(),
        ..Default::default()
    };

    let settings = Settings::load();
    let result = Arc::new(Mutex::new(None));
    let app_result = result.clone();

    eframe::run_native(
        "gridsnap",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(SnapOverlay::new(sink, settings, keep_open, app_result))
                as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run overlay: {}", e)))?;

    let lock = result
        .lock()
        .map_err(|_| AppError::ui("Failed to acquire result lock"))?;
    Ok(*lock)
}
