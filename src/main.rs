//! Solar savings calculator entry point: CLI wiring and session setup.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::warn;

use solar_savings::config::AppConfig;
use solar_savings::io::export::export_csv;
use solar_savings::logging;
use solar_savings::projection::params::ViewMode;
use solar_savings::report::{JsonReport, TextReport};
use solar_savings::sync::{MemoryAddressBar, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// 25-year solar savings projection: utility vs PPA vs outright purchase.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initial address: a full URL or a bare `?query` string.
    #[arg(long)]
    url: Option<String>,

    /// Load defaults and access settings from a TOML file.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (baseline, battery_backup, flat_rates).
    #[arg(long)]
    preset: Option<String>,

    /// Secret the address `admin` value must match to unlock editing.
    #[arg(long, env = "SOLAR_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// Projection view (annual or cumulative).
    #[arg(long)]
    view: Option<ViewMode>,

    /// Field edit by query key, e.g. `--set usage=9000`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the yearly projection to CSV.
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Print the share link (admin credential removed) to stdout.
    #[arg(long, default_value_t = false)]
    share: bool,

    /// Launch the interactive terminal UI.
    #[arg(long, default_value_t = false)]
    tui: bool,

    /// Log level for this crate when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn load_config(cli: &Cli) -> AppConfig {
    // --config takes priority, then --preset, then baseline default
    let loaded = if let Some(ref path) = cli.config {
        AppConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.preset {
        AppConfig::from_preset(name)
    } else {
        Ok(AppConfig::baseline())
    };
    let cfg = loaded.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

/// Applies `--set key=value` edits; the first failure ends the run.
fn apply_edits(session: &mut Session, edits: &[String]) {
    for edit in edits {
        let Some((key, value)) = edit.split_once('=') else {
            eprintln!("error: --set expects KEY=VALUE, got \"{edit}\"");
            process::exit(1);
        };
        if let Err(e) = session.apply_query_value(key.trim(), value) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(feature = "tui")]
fn run_tui(session: Session) -> Session {
    solar_savings::tui::run(session).unwrap_or_else(|e| {
        eprintln!("error: TUI crashed: {e}");
        process::exit(1);
    })
}

#[cfg(not(feature = "tui"))]
fn run_tui(_session: Session) -> Session {
    eprintln!("error: this build has no TUI; rebuild with `--features tui`");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal, so stay quiet unless RUST_LOG asks otherwise
    logging::init(if cli.tui { "off" } else { cli.log_level.as_str() });

    let cfg = load_config(&cli);
    let secret = cfg.admin_secret(cli.admin_key.as_deref());
    if secret.is_empty() {
        warn!("no admin key configured; editing requires an empty `admin` value");
    }

    let address =
        MemoryAddressBar::resolve(&cfg.access.base_url, cli.url.as_deref().unwrap_or(""))
            .unwrap_or_else(|e| {
                eprintln!("error: {e}");
                process::exit(1);
            });

    let mut session = Session::open(cfg.defaults.clone(), address, secret);
    if let Some(view) = cli.view {
        session.set_view(view);
    }
    apply_edits(&mut session, &cli.set);

    if cli.tui {
        session = run_tui(session);
    } else {
        match cli.format {
            OutputFormat::Text => println!("{}", TextReport::new(&session)),
            OutputFormat::Json => match serde_json::to_string_pretty(&JsonReport::new(&session)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize report: {e}");
                    process::exit(1);
                }
            },
        }
    }

    // Export CSV if requested
    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&session.projection().rows, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Projection written to {}", path.display());
    }

    if cli.share {
        println!("{}", session.share_link());
    }
}
