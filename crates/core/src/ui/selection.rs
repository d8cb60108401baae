//! Translation of egui pointer and keyboard state into session inputs.

use crate::geometry::{Point, Rect};
use crate::session::{Input, Surface};
use eframe::egui;

/// The overlay area as the session sees it.
///
/// Bounds are read from the area at the moment the session asks, so a resize
/// between drags is picked up at the next pointer-down.
pub struct OverlaySurface(pub egui::Rect);

impl Surface for OverlaySurface {
    fn bounds(&self) -> Rect {
        Rect::from_size(self.0.width(), self.0.height())
    }
}

/// Converts an absolute pointer position to surface-local coordinates.
pub fn to_local(area: egui::Rect, pos: egui::Pos2) -> Point {
    Point::new(pos.x - area.min.x, pos.y - area.min.y)
}

/// Primary-button activity of one frame, in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerFrame {
    /// Where the button went down, if it did this frame.
    pub pressed_at: Option<egui::Pos2>,
    /// Where the pointer moved to while the button was held.
    pub moved_to: Option<egui::Pos2>,
    /// Where the button was released, if it was this frame.
    pub released_at: Option<egui::Pos2>,
}

impl PointerFrame {
    /// Reads the primary button state from egui's input.
    ///
    /// The press position is the press origin, not the position at which
    /// egui decides a drag has started.
    pub fn read(input: &egui::InputState) -> Self {
        let pointer = &input.pointer;
        let latest = pointer.latest_pos();
        Self {
            pressed_at: pointer
                .primary_pressed()
                .then(|| pointer.press_origin().or(latest))
                .flatten(),
            moved_to: (pointer.primary_down() && pointer.delta() != egui::Vec2::ZERO)
                .then_some(latest)
                .flatten(),
            released_at: pointer.primary_released().then_some(latest).flatten(),
        }
    }
}

/// Session inputs for one frame of pointer activity over `area`.
///
/// Presses outside the area are ignored. A press and release within the same
/// frame yield a pointer-down and pointer-up pair, so a plain click still
/// snaps by its single point.
pub fn pointer_inputs(frame: PointerFrame, area: egui::Rect) -> Vec<Input> {
    let surface = OverlaySurface(area).bounds();
    let mut inputs = Vec::new();

    if let Some(pos) = frame.pressed_at {
        let p = to_local(area, pos);
        if surface.contains(p) {
            inputs.push(Input::PointerDown(p));
        }
    }
    if let Some(pos) = frame.moved_to {
        inputs.push(Input::PointerMove(to_local(area, pos)));
    }
    if let Some(pos) = frame.released_at {
        inputs.push(Input::PointerUp(to_local(area, pos)));
    }
    inputs
}

/// Escape cancels at any time, independent of pointer state.
pub fn cancel_requested(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}
