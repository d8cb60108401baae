//! The drag-to-snap overlay.
//!
//! A thin eframe shell around [`crate::session::Session`]:
//! - [`selection`]: egui input to session inputs, and the overlay surface
//! - [`rendering`]: dimmed background, grid lines, selection and preview
//! - [`settings`]: persisted appearance preferences
//! - [`overlay`]: the `eframe::App` and its launcher
//!
//! # Usage
//!
//! ```ignore
//! use gridsnap_core::{sink::HyprctlSink, ui};
//!
//! match ui::run_overlay(Box::new(HyprctlSink::default()), false)? {
//!     Some(outcome) => println!("{:?}", outcome),
//!     None => println!("closed without a drag"),
//! }
//! ```

mod overlay;
mod rendering;
mod selection;
mod settings;

pub use overlay::SnapOverlay;
pub use settings::Settings;

use crate::error::Result;
use crate::session::Outcome;
use crate::sink::Sink;

/// Shows the overlay until a drag finishes (or, with `keep_open`, until the
/// user presses Escape while idle).
///
/// # Returns
/// - `Ok(Some(outcome))` - how the last drag cycle ended
/// - `Ok(None)` - the overlay was closed without finishing a drag
/// - `Err(e)` - the overlay could not be opened
pub fn run_overlay(sink: Box<dyn Sink>, keep_open: bool) -> Result<Option<Outcome>> {
    overlay::run(sink, keep_open)
}
