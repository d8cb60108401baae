//! Window-manager sinks that carry out a snapped placement.
//!
//! A [`Sink`] is best-effort and fire-and-forget. It has no return value, and
//! any failure (missing binary, rejected dispatch, IPC error) is logged and
//! swallowed inside the implementation. The session never learns about it.

use crate::geometry::Rect;
use std::fmt;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::sync::Mutex;
use std::thread;

use crate::error::AppError;

/// Receives the cell the target window should occupy.
pub trait Sink {
    /// Moves the target window to `(cell.x, cell.y)` and resizes it to
    /// `(cell.w, cell.h)`. Never fails into the caller.
    fn apply(&self, cell: Rect);
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn apply(&self, cell: Rect) {
        (**self).apply(cell)
    }
}

impl<S: Sink + ?Sized> Sink for &S {
    fn apply(&self, cell: Rect) {
        (**self).apply(cell)
    }
}

/// Which sink the application drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// Dispatch to Hyprland through `hyprctl`.
    #[default]
    Hyprctl,
    /// Print the commands instead of running them.
    Print,
}

impl FromStr for SinkKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hyprctl" | "hyprland" => Ok(Self::Hyprctl),
            "print" | "dry-run" | "dryrun" => Ok(Self::Print),
            other => Err(AppError::config(format!(
                "unknown sink '{other}' (expected 'hyprctl' or 'print')"
            ))),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hyprctl => f.write_str("hyprctl"),
            Self::Print => f.write_str("print"),
        }
    }
}

/// Arguments for the move half of a placement.
pub fn move_command(cell: Rect) -> Vec<String> {
    dispatch_args("moveactive", cell.x, cell.y)
}

/// Arguments for the resize half of a placement.
pub fn resize_command(cell: Rect) -> Vec<String> {
    dispatch_args("resizeactive", cell.w, cell.h)
}

fn dispatch_args(dispatcher: &str, a: f32, b: f32) -> Vec<String> {
    vec![
        "dispatch".to_string(),
        dispatcher.to_string(),
        "exact".to_string(),
        // Cells are already rounded to whole pixels.
        format!("{}", a.round() as i64),
        format!("{}", b.round() as i64),
    ]
}

/// Moves the active Hyprland window by spawning `hyprctl`.
///
/// The caller never waits on the spawned processes; each child is reaped on
/// a short-lived background thread. Move is issued before resize, but the
/// compositor may apply them in either order.
#[derive(Clone, Debug)]
pub struct HyprctlSink {
    program: String,
}

impl HyprctlSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spawn(&self, args: &[String]) {
        let result = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match result {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %self.program, ?args, "failed to spawn: {}", e);
                return;
            }
        };
        tracing::debug!(pid = child.id(), ?args, "spawned {}", self.program);

        let program = self.program.clone();
        let reaper = thread::Builder::new()
            .name("gridsnap-reaper".to_string())
            .spawn(move || match child.wait() {
                Ok(status) if !status.success() => {
                    tracing::debug!(%status, "{} exited unsuccessfully", program)
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("failed to wait on {}: {}", program, e),
            });
        if let Err(e) = reaper {
            tracing::warn!("failed to start reaper thread: {}", e);
        }
    }
}

impl Default for HyprctlSink {
    fn default() -> Self {
        Self::new("hyprctl")
    }
}

impl Sink for HyprctlSink {
    fn apply(&self, cell: Rect) {
        self.spawn(&move_command(cell));
        self.spawn(&resize_command(cell));
    }
}

/// Dry-run sink that prints the commands it would run.
#[derive(Clone, Debug)]
pub struct PrintSink {
    program: String,
}

impl PrintSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn line(&self, args: &[String]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl Sink for PrintSink {
    fn apply(&self, cell: Rect) {
        println!("{}", self.line(&move_command(cell)));
        println!("{}", self.line(&resize_command(cell)));
    }
}

/// Keeps every applied cell in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    applied: Mutex<Vec<Rect>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells applied so far, oldest first.
    pub fn applied(&self) -> Vec<Rect> {
        match self.applied.lock() {
            Ok(cells) => cells.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.applied().len()
    }
}

impl Sink for RecordingSink {
    fn apply(&self, cell: Rect) {
        match self.applied.lock() {
            Ok(mut cells) => cells.push(cell),
            Err(poisoned) => poisoned.into_inner().push(cell),
        }
    }
}

/// Builds the sink selected by `kind`.
pub fn build(kind: SinkKind, program: &str) -> Box<dyn Sink> {
    match kind {
        SinkKind::Hyprctl => Box::new(HyprctlSink::new(program)),
        SinkKind::Print => Box::new(PrintSink::new(program)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_exact_integers() {
        let cell = Rect::new(600.0, 400.0, 300.0, 200.0);
        assert_eq!(
            move_command(cell),
            ["dispatch", "moveactive", "exact", "600", "400"]
        );
        assert_eq!(
            resize_command(cell),
            ["dispatch", "resizeactive", "exact", "300", "200"]
        );
    }

    #[test]
    fn print_sink_formats_line() {
        let sink = PrintSink::new("hyprctl");
        let line = sink.line(&move_command(Rect::new(0.0, 360.0, 640.0, 360.0)));
        assert_eq!(line, "hyprctl dispatch moveactive exact 0 360");
    }

    #[test]
    fn missing_binary_is_swallowed() {
        let sink = HyprctlSink::new("/nonexistent/gridsnap-hyprctl");
        sink.apply(Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    /// Children of this process that have exited but were not reaped.
    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| std::fs::read_to_string(e.path().join("stat")).ok())
            .filter(|stat| {
                // Fields after the parenthesised command: state, ppid, ...
                let rest = stat.rsplit_once(')').map(|(_, r)| r).unwrap_or("");
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn spawned_children_are_reaped() {
        let sink = HyprctlSink::new("true");
        for _ in 0..5 {
            sink.apply(Rect::new(0.0, 0.0, 10.0, 10.0));
        }
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while zombie_children() > 0 && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(50));
        }
        assert_eq!(zombie_children(), 0);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let boxed: Box<dyn Sink> = Box::new(PrintSink::new("true"));
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 1.0, 1.0, 1.0);
        sink.apply(a);
        (&sink).apply(b);
        boxed.apply(a);
        assert_eq!(sink.applied(), vec![a, b]);
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn sink_kind_parsing() {
        assert_eq!("hyprctl".parse::<SinkKind>().unwrap(), SinkKind::Hyprctl);
        assert_eq!(" Print ".parse::<SinkKind>().unwrap(), SinkKind::Print);
        assert_eq!("dry-run".parse::<SinkKind>().unwrap(), SinkKind::Print);
        assert!("sway".parse::<SinkKind>().is_err());
        assert_eq!(SinkKind::Print.to_string(), "print");
    }
}
