//! Drawing helpers for the overlay: dimmed surface, grid lines, selection.

use crate::geometry::{grid_lines, Bounds, Rect};
use eframe::egui;

/// Fill of the live selection.
pub const SELECTION_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(14, 48, 62, 64);
/// Border of the live selection.
pub const SELECTION_STROKE: egui::Color32 = egui::Color32::from_rgb(56, 189, 248);
/// Fill of the cell the selection would snap to.
pub const PREVIEW_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(20, 20, 20, 20);

pub fn to_egui(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(r.x, r.y), egui::vec2(r.w, r.h))
}

/// Dims the whole surface.
pub fn draw_dim(painter: &egui::Painter, screen_rect: egui::Rect, alpha: u8) {
    painter.rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(alpha));
}

/// Draws the two vertical and two horizontal dividers of the grid.
pub fn draw_grid(painter: &egui::Painter, bounds: Bounds) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(64));
    let (xs, ys) = grid_lines(bounds);

    for x in xs {
        painter.line_segment(
            [egui::pos2(x, bounds.y), egui::pos2(x, bounds.bottom())],
            stroke,
        );
    }
    for y in ys {
        painter.line_segment(
            [egui::pos2(bounds.x, y), egui::pos2(bounds.right(), y)],
            stroke,
        );
    }
}

/// Draws the live selection rectangle with its border.
///
/// Zero-size selections are drawn one pixel wide so a click is still visible.
pub fn draw_selection(painter: &egui::Painter, selection: Rect, stroke_width: f32) {
    let visible = Rect {
        w: selection.w.max(1.0),
        h: selection.h.max(1.0),
        ..selection
    };
    let rect = to_egui(visible);
    painter.rect_filled(rect, 0.0, SELECTION_FILL);
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(stroke_width, SELECTION_STROKE),
        egui::StrokeKind::Inside,
    );
}

/// Highlights the target cell of the current drag.
pub fn draw_snap_preview(painter: &egui::Painter, cell: Rect) {
    let rect = to_egui(cell);
    painter.rect_filled(rect, 0.0, PREVIEW_FILL);
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, egui::Color32::from_white_alpha(120)),
        egui::StrokeKind::Inside,
    );
}
