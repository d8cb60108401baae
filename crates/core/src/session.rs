//! The drag-select-snap-apply state machine.
//!
//! The machine itself is the pure function [`transition`]: it takes the
//! current [`SessionState`] and one [`Event`] and returns the next state plus
//! a list of [`Effect`]s. Nothing in it touches a window, a process or a
//! clock, so every cycle can be driven from a plain test.
//!
//! [`Session`] is the thin stateful wrapper used by the overlay. It owns the
//! state, reads fresh [`Bounds`] from a [`Surface`] on every pointer-down and
//! can execute the resulting effects against a [`Sink`] and a [`Feedback`]
//! observer.
//!
//! ```text
//! Idle --PointerDown--> Dragging --PointerMove--> Dragging
//!                          |
//!                          +--PointerUp--> (snap, apply) --> Idle
//!                          +--Cancel-----> Idle
//! ```

use crate::error::AppError;
use crate::geometry::{normalize, snap_to_grid, Bounds, Point, Rect};
use crate::sink::Sink;

/// State of one session. Nothing survives past the return to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        current: Point,
        /// Surface extent captured at pointer-down for this cycle.
        bounds: Bounds,
    },
}

/// Input to the pure transition function.
///
/// `PointerDown` carries the bounds read from the surface at that instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    PointerDown { point: Point, bounds: Bounds },
    PointerMove(Point),
    PointerUp(Point),
    Cancel,
}

/// Raw host input, before bounds are attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Cancel,
}

/// How a drag cycle ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The snapped cell was handed to the sink.
    Applied(Rect),
    /// The user cancelled; the sink was not called.
    Cancelled,
    /// The captured bounds were unusable; the sink was not called.
    Rejected { bounds: Bounds },
}

/// Side effects requested by a transition, executed by the caller.
#[derive(Debug)]
pub enum Effect {
    /// New live selection rect, or `None` to clear the feedback.
    Feedback(Option<Rect>),
    /// Move and resize the target window to this cell.
    Apply(Rect),
    /// Snapping failed; carries the error from the geometry engine.
    Rejected(AppError),
    /// The cycle is over.
    Finished(Outcome),
}

/// Advances the state machine by one event.
///
/// Events that make no sense in the current state (move or release while
/// idle, cancel while idle) are no-ops and produce no effects. A pointer-down
/// while already dragging restarts the drag at the new point.
pub fn transition(state: SessionState, event: Event) -> (SessionState, Vec<Effect>) {
    match (state, event) {
        (_, Event::PointerDown { point, bounds }) => (
            SessionState::Dragging {
                anchor: point,
                current: point,
                bounds,
            },
            vec![Effect::Feedback(Some(normalize(point, point)))],
        ),
        (SessionState::Dragging { anchor, bounds, .. }, Event::PointerMove(p)) => (
            SessionState::Dragging {
                anchor,
                current: p,
                bounds,
            },
            vec![Effect::Feedback(Some(normalize(anchor, p)))],
        ),
        (SessionState::Dragging { anchor, bounds, .. }, Event::PointerUp(p)) => {
            let rect = normalize(anchor, p);
            let effects = match snap_to_grid(rect, bounds) {
                Ok(cell) => vec![
                    Effect::Apply(cell),
                    Effect::Feedback(None),
                    Effect::Finished(Outcome::Applied(cell)),
                ],
                Err(err) => vec![
                    Effect::Rejected(err),
                    Effect::Feedback(None),
                    Effect::Finished(Outcome::Rejected { bounds }),
                ],
            };
            (SessionState::Idle, effects)
        }
        (SessionState::Dragging { .. }, Event::Cancel) => (
            SessionState::Idle,
            vec![Effect::Feedback(None), Effect::Finished(Outcome::Cancelled)],
        ),
        (SessionState::Idle, _) => (SessionState::Idle, Vec::new()),
    }
}

/// Source of the current overlay extent.
pub trait Surface {
    /// Current bounds; queried once per pointer-down.
    fn bounds(&self) -> Bounds;
}

/// A fixed-size surface; only the size matters, bounds are anchored at 0,0.
impl Surface for Rect {
    fn bounds(&self) -> Bounds {
        Rect::from_size(self.w, self.h)
    }
}

impl<S: Surface + ?Sized> Surface for &S {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }
}

/// Observer for live selection changes.
pub trait Feedback {
    fn on_rect_changed(&mut self, rect: Option<Rect>);
}

impl<F: FnMut(Option<Rect>)> Feedback for F {
    fn on_rect_changed(&mut self, rect: Option<Rect>) {
        self(rect)
    }
}

/// Ignores all feedback.
impl Feedback for () {
    fn on_rect_changed(&mut self, _rect: Option<Rect>) {}
}

/// Owns the state of the interaction for the lifetime of an overlay.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    /// The live selection rect while dragging.
    pub fn selection(&self) -> Option<Rect> {
        match self.state {
            SessionState::Dragging {
                anchor, current, ..
            } => Some(normalize(anchor, current)),
            SessionState::Idle => None,
        }
    }

    /// Bounds captured for the current drag, if any.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.state {
            SessionState::Dragging { bounds, .. } => Some(bounds),
            SessionState::Idle => None,
        }
    }

    /// Feeds one host input through the state machine and returns the
    /// effects without executing them.
    pub fn handle(&mut self, input: Input, surface: &impl Surface) -> Vec<Effect> {
        let event = match input {
            Input::PointerDown(point) => Event::PointerDown {
                point,
                bounds: surface.bounds(),
            },
            Input::PointerMove(p) => Event::PointerMove(p),
            Input::PointerUp(p) => Event::PointerUp(p),
            Input::Cancel => Event::Cancel,
        };
        let (next, effects) = transition(self.state, event);
        self.state = next;
        effects
    }

    /// Like [`Session::handle`], then runs the effects: `Apply` goes to the
    /// sink, `Feedback` to the observer. Returns the outcome if the cycle
    /// ended.
    pub fn dispatch(
        &mut self,
        input: Input,
        surface: &impl Surface,
        sink: &impl Sink,
        feedback: &mut impl Feedback,
    ) -> Option<Outcome> {
        let mut finished = None;
        for effect in self.handle(input, surface) {
            match effect {
                Effect::Feedback(rect) => {
                    tracing::debug!(?rect, "selection changed");
                    feedback.on_rect_changed(rect);
                }
                Effect::Apply(cell) => {
                    tracing::info!(
                        x = cell.x,
                        y = cell.y,
                        w = cell.w,
                        h = cell.h,
                        "snapping window to cell"
                    );
                    sink.apply(cell);
                }
                Effect::Rejected(err) => {
                    tracing::warn!("drag ignored: {}", err);
                }
                Effect::Finished(outcome) => {
                    match outcome {
                        Outcome::Applied(_) => tracing::info!("drag cycle applied"),
                        Outcome::Cancelled => tracing::info!("drag cycle cancelled"),
                        Outcome::Rejected { .. } => tracing::debug!("drag cycle rejected"),
                    }
                    finished = Some(outcome);
                }
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::from_size(900.0, 600.0);

    fn down(x: f32, y: f32) -> Event {
        Event::PointerDown {
            point: Point::new(x, y),
            bounds: SCREEN,
        }
    }

    #[test]
    fn down_starts_drag_with_point_feedback() {
        let (s, fx) = transition(SessionState::Idle, down(5.0, 6.0));
        assert!(matches!(s, SessionState::Dragging { .. }));
        assert!(matches!(
            fx.as_slice(),
            [Effect::Feedback(Some(r))] if *r == Rect::new(5.0, 6.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn move_updates_current() {
        let (s, _) = transition(SessionState::Idle, down(50.0, 50.0));
        let (s, fx) = transition(s, Event::PointerMove(Point::new(20.0, 80.0)));
        assert_eq!(
            s,
            SessionState::Dragging {
                anchor: Point::new(50.0, 50.0),
                current: Point::new(20.0, 80.0),
                bounds: SCREEN,
            }
        );
        assert!(matches!(
            fx.as_slice(),
            [Effect::Feedback(Some(r))] if *r == Rect::new(20.0, 50.0, 30.0, 30.0)
        ));
    }

    #[test]
    fn up_snaps_and_applies_once() {
        let (s, _) = transition(SessionState::Idle, down(10.0, 10.0));
        let (s, fx) = transition(s, Event::PointerUp(Point::new(40.0, 40.0)));
        let cell = Rect::new(0.0, 0.0, 300.0, 200.0);
        assert_eq!(s, SessionState::Idle);
        assert!(matches!(
            fx.as_slice(),
            [
                Effect::Apply(applied),
                Effect::Feedback(None),
                Effect::Finished(Outcome::Applied(finished)),
            ] if *applied == cell && *finished == cell
        ));
    }

    #[test]
    fn idle_ignores_move_up_and_cancel() {
        for ev in [
            Event::PointerMove(Point::new(1.0, 1.0)),
            Event::PointerUp(Point::new(1.0, 1.0)),
            Event::Cancel,
        ] {
            let (s, fx) = transition(SessionState::Idle, ev);
            assert_eq!(s, SessionState::Idle);
            assert!(fx.is_empty());
        }
    }

    #[test]
    fn cancel_clears_without_apply() {
        let (s, _) = transition(SessionState::Idle, down(5.0, 5.0));
        let (s, fx) = transition(s, Event::Cancel);
        assert_eq!(s, SessionState::Idle);
        assert!(matches!(
            fx.as_slice(),
            [Effect::Feedback(None), Effect::Finished(Outcome::Cancelled)]
        ));
    }

    #[test]
    fn invalid_bounds_reject_without_apply() {
        let bad = Rect::from_size(0.0, 600.0);
        let (s, _) = transition(
            SessionState::Idle,
            Event::PointerDown {
                point: Point::new(1.0, 1.0),
                bounds: bad,
            },
        );
        let (s, fx) = transition(s, Event::PointerUp(Point::new(2.0, 2.0)));
        assert_eq!(s, SessionState::Idle);
        assert!(!fx.iter().any(|e| matches!(e, Effect::Apply(_))));
        assert!(matches!(
            fx.first(),
            Some(Effect::Rejected(AppError::InvalidBounds { w, h })) if *w == 0.0 && *h == 600.0
        ));
        assert!(matches!(
            fx.last(),
            Some(Effect::Finished(Outcome::Rejected { bounds })) if *bounds == bad
        ));
    }

    #[test]
    fn second_down_restarts_drag() {
        let (s, _) = transition(SessionState::Idle, down(5.0, 5.0));
        let (s, _) = transition(s, down(700.0, 500.0));
        let (_, fx) = transition(s, Event::PointerUp(Point::new(710.0, 510.0)));
        assert!(matches!(
            fx.first(),
            Some(Effect::Apply(cell)) if *cell == Rect::new(600.0, 400.0, 300.0, 200.0)
        ));
    }

    #[test]
    fn unit_observer_drives_a_full_cycle() {
        let sink = crate::sink::RecordingSink::new();
        let mut session = Session::new();
        session.dispatch(Input::PointerDown(Point::new(10.0, 10.0)), &SCREEN, &sink, &mut ());
        session.dispatch(Input::PointerMove(Point::new(40.0, 40.0)), &SCREEN, &sink, &mut ());
        let outcome =
            session.dispatch(Input::PointerUp(Point::new(40.0, 40.0)), &SCREEN, &sink, &mut ());
        assert_eq!(outcome, Some(Outcome::Applied(Rect::new(0.0, 0.0, 300.0, 200.0))));
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn session_exposes_live_selection() {
        let mut session = Session::new();
        assert_eq!(session.selection(), None);
        session.handle(Input::PointerDown(Point::new(30.0, 30.0)), &SCREEN);
        session.handle(Input::PointerMove(Point::new(10.0, 40.0)), &SCREEN);
        assert!(session.is_dragging());
        assert_eq!(session.selection(), Some(Rect::new(10.0, 30.0, 20.0, 10.0)));
        assert_eq!(session.bounds(), Some(SCREEN));
    }
}
