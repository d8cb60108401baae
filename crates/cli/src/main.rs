use anyhow::{bail, Context, Result};
use clap::Parser;
use gridsnap_core::{
    config::Config,
    geometry::{cells, snap_to_grid, Rect},
    session::Outcome,
    ui::Settings,
    GridSnap, SinkKind,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the hyprctl commands instead of running them
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Keep the overlay open after a placement (Escape closes it)
    #[arg(long, default_value_t = false)]
    keep_open: bool,

    /// Path to the hyprctl binary
    #[arg(long)]
    hyprctl: Option<String>,

    /// Log level for gridsnap crates (error|warn|info|debug|trace); RUST_LOG wins if set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the nine grid cells for a WIDTHxHEIGHT surface and exit
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    cells: Option<Rect>,

    /// Print the cell X,Y,W,H snaps to and exit (requires --bounds)
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect, requires = "bounds")]
    snap: Option<Rect>,

    /// Surface size used by --snap
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    bounds: Option<Rect>,

    /// Write the current overlay settings (defaults filled in) and exit
    #[arg(long, default_value_t = false)]
    write_settings: bool,
}

fn parse_size(s: &str) -> std::result::Result<Rect, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: f32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok(Rect::from_size(w, h))
}

fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("bad number '{p}': {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, w, h] if w >= 0.0 && h >= 0.0 => Ok(Rect::new(x, y, w, h)),
        &[_, _, _, _] => Err("width and height must not be negative".to_string()),
        _ => Err(format!("expected X,Y,W,H, got '{s}'")),
    }
}

fn format_rect(r: Rect) -> String {
    format!("{} {} {} {}", r.x, r.y, r.w, r.h)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let lvl = level.to_ascii_lowercase();
        EnvFilter::new(format!("gridsnap={lvl},gridsnap_core={lvl}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(&args.log_level);

    // Handle --write-settings
    if args.write_settings {
        let Some(path) = Settings::path() else {
            bail!("No config directory available for settings");
        };
        Settings::load()
            .save_to(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    // Handle --cells
    if let Some(surface) = args.cells {
        let grid = cells(surface).context("Cannot build grid")?;
        for (i, cell) in grid.iter().enumerate() {
            println!("{} {} {}", i / 3, i % 3, format_rect(*cell));
        }
        return Ok(());
    }

    // Handle --snap
    if let Some(rect) = args.snap {
        let Some(surface) = args.bounds else {
            bail!("--snap requires --bounds");
        };
        let cell = snap_to_grid(rect, surface).context("Cannot snap selection")?;
        println!("{}", format_rect(cell));
        return Ok(());
    }

    // Load config and apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if args.dry_run {
        config.sink = SinkKind::Print;
    }
    if args.keep_open {
        config.keep_open = true;
    }
    if let Some(path) = args.hyprctl {
        config = Config::builder()
            .with_sink(config.sink)
            .with_keep_open(config.keep_open)
            .with_hyprctl_path(path)
            .build()
            .context("Invalid --hyprctl")?;
    }

    let app = GridSnap::with_config(config);
    match app.run_interactive().context("Failed to run overlay")? {
        Some(Outcome::Applied(cell)) => tracing::info!("placed window at {}", format_rect(cell)),
        Some(Outcome::Cancelled) | None => tracing::info!("selection cancelled"),
        Some(Outcome::Rejected { bounds }) => {
            tracing::warn!("overlay reported unusable bounds {}x{}", bounds.w, bounds.h)
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1920x1080").unwrap(), Rect::from_size(1920.0, 1080.0));
        assert_eq!(parse_size("900X600").unwrap(), Rect::from_size(900.0, 600.0));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn rect_parsing() {
        assert_eq!(
            parse_rect("10, 10, 30, 30").unwrap(),
            Rect::new(10.0, 10.0, 30.0, 30.0)
        );
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,-3,4").is_err());
    }

    #[test]
    fn snap_args_require_bounds() {
        assert!(Args::try_parse_from(["gridsnap", "--snap", "1,1,1,1"]).is_err());
        let args =
            Args::try_parse_from(["gridsnap", "--snap", "1,1,1,1", "--bounds", "900x600"]).unwrap();
        assert_eq!(args.bounds, Some(Rect::from_size(900.0, 600.0)));
    }

    #[test]
    fn write_settings_flag() {
        let args = Args::try_parse_from(["gridsnap", "--write-settings"]).unwrap();
        assert!(args.write_settings);
        let args = Args::try_parse_from(["gridsnap"]).unwrap();
        assert!(!args.write_settings);
    }

    #[test]
    fn args_are_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
