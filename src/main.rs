//! mdpad - A terminal markdown editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! mdpad notes.md
//! mdpad --theme dark --autosave-secs 10 notes.md
//! mdpad --background '#1e1e2e' --save
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdpad::app::App;
use mdpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use mdpad::document::Document;
use mdpad::ui::style::{Rgb, ThemeName};

/// A terminal markdown editor with live preview
#[derive(Parser, Debug)]
#[command(name = "mdpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit; created on first save if missing
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// Window background override, as #rrggbb
    #[arg(long, value_name = "COLOR", value_parser = parse_background)]
    background: Option<Rgb>,

    /// Seconds between autosaves (0 disables)
    #[arg(long, value_name = "SECS")]
    autosave_secs: Option<u64>,

    /// Do not watch the file for external changes
    #[arg(long)]
    no_watch: bool,

    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

fn parse_background(value: &str) -> Result<Rgb, String> {
    Rgb::parse_hex(value).ok_or_else(|| format!("expected #rrggbb, got '{value}'"))
}

/// Route tracing output to the log file, or nowhere: stderr belongs to the TUI.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        theme: cli.theme,
        background: cli.background,
        autosave_secs: cli.autosave_secs,
        no_watch: cli.no_watch,
        log_file: cli.log_file.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "startup flags");

    let document = match &cli.file {
        Some(path) if path.exists() => {
            Document::load(path).with_context(|| format!("Failed to open {}", path.display()))?
        }
        Some(path) => Document::unsaved_at(path),
        None => Document::untitled(),
    };

    let mut app = App::new(document)
        .with_config(effective.into_config())
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    app.run().context("Application error")
}
