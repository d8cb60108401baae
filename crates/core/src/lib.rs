//! GridSnap Core Library
//!
//! Drag a rectangle over a dimmed fullscreen overlay; on release the rectangle
//! snaps to the nearest cell of a 3×3 grid and the active window is moved and
//! resized to that cell.
//!
//! # Overview
//!
//! - **Geometry**: selection normalization and grid snapping via [`geometry`]
//! - **Session**: the drag state machine via [`session`]
//! - **Sinks**: window-manager dispatch via [`sink`]
//! - **Overlay**: the eframe front-end via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use gridsnap_core::GridSnap;
//!
//! let app = GridSnap::new()?;
//! app.run_interactive()?;
//! ```
//!
//! The state machine can be driven without any window:
//!
//! ```
//! use gridsnap_core::geometry::{Point, Rect};
//! use gridsnap_core::session::{Input, Outcome, Session};
//! use gridsnap_core::sink::RecordingSink;
//!
//! let surface = Rect::from_size(900.0, 600.0);
//! let sink = RecordingSink::new();
//! let mut session = Session::new();
//! let mut feedback = |_rect: Option<Rect>| {};
//!
//! session.dispatch(Input::PointerDown(Point::new(850.0, 550.0)), &surface, &sink, &mut feedback);
//! let outcome = session.dispatch(Input::PointerUp(Point::new(880.0, 590.0)), &surface, &sink, &mut feedback);
//!
//! assert_eq!(outcome, Some(Outcome::Applied(Rect::new(600.0, 400.0, 300.0, 200.0))));
//! assert_eq!(sink.count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod session;
pub mod sink;
pub mod ui;

// Re-export primary types for convenience
pub use config::Config;
pub use error::{AppError, Result};
pub use geometry::{normalize, snap_to_grid, Bounds, Point, Rect};
pub use session::{Outcome, Session};
pub use sink::{Sink, SinkKind};

/// Main entry point for the overlay application.
///
/// Holds the configuration and builds the sink it selects.
pub struct GridSnap {
    config: Config,
}

impl GridSnap {
    /// Creates an instance from environment configuration (including `.env`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if an environment value is invalid.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Builds the sink selected by the configuration.
    pub fn sink(&self) -> Box<dyn Sink> {
        sink::build(self.config.sink, &self.config.hyprctl_path)
    }

    /// Shows the overlay and applies the snapped cell on release.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ui`] if the overlay window cannot be created.
    pub fn run_interactive(&self) -> Result<Option<Outcome>> {
        tracing::info!(sink = %self.config.sink, keep_open = self.config.keep_open, "opening overlay");
        ui::run_overlay(self.sink(), self.config.keep_open)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
