//! docdeck - browse a TOML manifest of markdown pages in the terminal.
//!
//! # Usage
//!
//! ```bash
//! docdeck                       # reads ./pages.toml
//! docdeck --watch docs.toml
//! docdeck --page 3 docs.toml
//! docdeck --export site/ docs.toml
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing_subscriber::EnvFilter;

use docdeck::app::App;
use docdeck::highlight::{HighlightBackground, set_background_mode};
use docdeck::site::{DEFAULT_MANIFEST, load_configuration};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeMode {
    Auto,
    Light,
    Dark,
}

/// Terminal viewer for paged markdown documentation
#[derive(Parser, Debug)]
#[command(name = "docdeck", version, about, long_about = None)]
struct Cli {
    /// Manifest describing the title and pages
    #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,

    /// Watch the manifest and reload on change
    #[arg(short, long)]
    watch: bool,

    /// Open this page first (1-based)
    #[arg(long, value_name = "N")]
    page: Option<NonZeroUsize>,

    /// Force syntax highlight theme background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Write a static HTML site to DIR instead of starting the viewer
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    no_mouse: bool,

    /// Write logs to PATH instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// Query the terminal background using OSC 11 on the controlling tty.
// Non-Unix platforms skip the query: the stdin fallback leaves a reader
// thread behind that swallows console input.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::{Read, Write};
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();

    let mut io = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let reader = io.try_clone()?;

    // ESC ] 11 ; ? BEL
    io.write_all(b"\x1b]11;?\x07")?;
    io.flush()?;

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) => continue,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\")
                    {
                        let _ = tx.send(collected);
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let Ok(collected) = rx.recv_timeout(Duration::from_millis(75)) else {
        return Ok(None);
    };
    Ok(parse_osc11_reply(&String::from_utf8_lossy(&collected)))
}

fn theme_from_rgb(r: u8, g: u8, b: u8) -> HighlightBackground {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        HighlightBackground::Light
    } else {
        HighlightBackground::Dark
    }
}

fn detect_theme() -> Option<HighlightBackground> {
    let _raw = enable_raw_mode();
    let result = query_terminal_background();
    let _ = disable_raw_mode();
    result.ok().flatten().map(|(r, g, b)| theme_from_rgb(r, g, b))
}

/// Parse `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or ST.
fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")?;
    let mut parts = reply[start + 4..].split(['/', '\x07', '\x1b']);
    let r = parse_osc_component(parts.next()?)?;
    let g = parse_osc_component(parts.next()?)?;
    let b = parse_osc_component(parts.next()?)?;
    Some((r, g, b))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    match hex.len() {
        2 => u8::from_str_radix(hex, 16).ok(),
        n if n >= 4 => {
            let v = u16::from_str_radix(&hex[..4], 16).ok()?;
            u8::try_from(v >> 8).ok()
        }
        _ => None,
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn export(manifest: &Path, out_dir: &Path) -> Result<()> {
    let config = load_configuration(manifest)
        .with_context(|| format!("Failed to load {}", manifest.display()))?;
    docdeck::html::export_site(&config, out_dir)?;
    println!(
        "Exported {} page(s) to {}",
        config.len(),
        out_dir.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;
    tracing::debug!(?cli, "parsed arguments");

    if let Some(out_dir) = cli.export.as_deref() {
        return export(&cli.manifest, out_dir);
    }

    match cli.theme {
        ThemeMode::Auto => set_background_mode(detect_theme()),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let mut app = App::new(cli.manifest)
        .with_watch(cli.watch)
        .with_mouse(!cli.no_mouse)
        .with_initial_page(cli.page.map(|n| n.get() - 1));

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_osc11_reply_with_bel() {
        let reply = "\x1b]11;rgb:ffff/ffff/ffff\x07";
        assert_eq!(parse_osc11_reply(reply), Some((255, 255, 255)));
    }

    #[test]
    fn test_parse_osc11_reply_short_components() {
        let reply = "\x1b]11;rgb:1e/1e/2e\x1b\\";
        assert_eq!(parse_osc11_reply(reply), Some((0x1e, 0x1e, 0x2e)));
    }

    #[test]
    fn test_parse_osc11_reply_rejects_garbage() {
        assert_eq!(parse_osc11_reply("no color here"), None);
    }

    #[test]
    fn test_theme_from_rgb() {
        assert_eq!(theme_from_rgb(250, 250, 250), HighlightBackground::Light);
        assert_eq!(theme_from_rgb(20, 20, 30), HighlightBackground::Dark);
    }

    #[test]
    fn test_cli_page_is_one_based() {
        let cli = Cli::parse_from(["docdeck", "--page", "2", "docs.toml"]);
        assert_eq!(cli.page.map(NonZeroUsize::get), Some(2));
        assert_eq!(cli.manifest, PathBuf::from("docs.toml"));
        assert!(Cli::try_parse_from(["docdeck", "--page", "0"]).is_err());
    }

    #[test]
    fn test_cli_defaults_to_pages_toml() {
        let cli = Cli::parse_from(["docdeck"]);
        assert_eq!(cli.manifest, PathBuf::from(DEFAULT_MANIFEST));
        assert!(cli.export.is_none());
        assert!(!cli.watch);
        assert_eq!(cli.theme, ThemeMode::Auto);
    }

    #[test]
    fn test_cli_short_watch_flag() {
        let cli = Cli::parse_from(["docdeck", "-w", "docs.toml"]);
        assert!(cli.watch);
        assert_eq!(cli.manifest, PathBuf::from("docs.toml"));

        let cli = Cli::parse_from(["docdeck", "docs.toml", "--watch", "--no-mouse"]);
        assert!(cli.watch);
        assert!(cli.no_mouse);
    }

    #[test]
    fn test_cli_theme_and_log_file() {
        let cli = Cli::parse_from(["docdeck", "--theme", "light", "--log-file", "dd.log"]);
        assert_eq!(cli.theme, ThemeMode::Light);
        assert_eq!(cli.log_file, Some(PathBuf::from("dd.log")));
        assert!(Cli::try_parse_from(["docdeck", "--save"]).is_err());
    }
}
