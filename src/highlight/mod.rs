//! Syntax highlighting for fenced code blocks.
//!
//! Uses syntect with its bundled Sublime Text syntaxes. The terminal gets
//! per-span foreground colors; HTML export gets inline-styled `<span>`s.

use std::sync::{Mutex, OnceLock};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::document::{InlineColor, InlineSpan, InlineStyle};

/// Theme used for exported HTML, which always renders on a dark page.
const HTML_THEME: &str = "base16-ocean.dark";

/// Highlight `code` for the terminal, one span list per source line.
///
/// Unknown or missing languages fall back to uncolored code spans.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<InlineSpan>> {
    let mut lines = Vec::new();
    let syntax_set = syntax_set();
    let mode = background_mode();

    let Some(syntax) = find_syntax(language) else {
        for line in code.lines() {
            let style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            lines.push(vec![InlineSpan::new(line.to_string(), style)]);
        }
        return lines;
    };

    let mut highlighter = HighlightLines::new(syntax, terminal_theme());
    for line in code.lines() {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let mut spans = Vec::new();
        for (style, text) in ranges {
            let fg = InlineColor {
                r: style.foreground.r,
                g: style.foreground.g,
                b: style.foreground.b,
            };
            let inline_style = InlineStyle {
                code: true,
                fg: Some(adjust_fg_for_background(fg, mode)),
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(text.to_string(), inline_style));
        }
        lines.push(spans);
    }

    lines
}

/// Highlight `code` as HTML, or `None` when the language is not recognized.
///
/// The result is the inner markup of a `<code>` element: one line per source
/// line, joined with newlines, with colors as inline styles.
pub fn highlight_html(language: Option<&str>, code: &str) -> Option<String> {
    let syntax = find_syntax(language)?;
    let syntax_set = syntax_set();
    let mut highlighter = HighlightLines::new(syntax, html_theme());

    let mut out = Vec::new();
    for line in code.lines() {
        let ranges = match highlighter.highlight_line(line, syntax_set) {
            Ok(ranges) => ranges,
            Err(err) => {
                tracing::debug!(?language, %err, "html highlighting failed");
                return None;
            }
        };
        match styled_line_to_highlighted_html(&ranges, IncludeBackground::No) {
            Ok(html) => out.push(html),
            Err(err) => {
                tracing::debug!(?language, %err, "html highlighting failed");
                return None;
            }
        }
    }
    Some(out.join("\n"))
}

fn find_syntax(language: Option<&str>) -> Option<&'static SyntaxReference> {
    let language = language?;
    let syntax_set = syntax_set();
    syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language))
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn terminal_theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let preferred = match background_mode() {
            BackgroundMode::Dark => [
                "Monokai Extended",
                "Monokai Extended Bright",
                "Solarized (dark)",
                "base16-ocean.dark",
            ]
            .as_slice(),
            BackgroundMode::Light => [
                "InspiredGitHub",
                "Solarized (light)",
                "base16-ocean.light",
            ]
            .as_slice(),
        };
        pick_theme(preferred)
    })
}

fn html_theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| pick_theme(&[HTML_THEME]))
}

fn pick_theme(preferred: &[&str]) -> Theme {
    let themes = &theme_set().themes;
    for name in preferred {
        if let Some(theme) = themes.get(*name) {
            return theme.clone();
        }
    }
    themes.values().next().cloned().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Terminal background override for highlight colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

/// Force the background mode used to pick the terminal theme.
///
/// Must be called before the first code block is highlighted.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// Returns true when highlight colors target a light terminal background.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

fn adjust_fg_for_background(color: InlineColor, mode: BackgroundMode) -> InlineColor {
    match mode {
        BackgroundMode::Dark => color,
        BackgroundMode::Light => {
            let luma = (0.2126 * f32::from(color.r))
                + (0.7152 * f32::from(color.g))
                + (0.0722 * f32::from(color.b));
            if luma < 155.0 {
                return color;
            }

            // Scale down bright colors so they stay readable on white.
            InlineColor {
                r: (f32::from(color.r) * 0.42).round() as u8,
                g: (f32::from(color.g) * 0.42).round() as u8,
                b: (f32::from(color.b) * 0.42).round() as u8,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_colored_spans() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let lines = highlight_code(Some("rust"), code);

        assert_eq!(lines.len(), 3);
        let has_color = lines
            .iter()
            .flatten()
            .any(|span| span.style().fg.is_some());
        assert!(has_color, "Expected at least one colored span for Rust");
    }

    #[test]
    fn test_highlight_unknown_language_falls_back_to_plain() {
        let lines = highlight_code(Some("nope"), "just text");

        assert_eq!(lines.len(), 1);
        assert!(lines.iter().flatten().all(|span| span.style().fg.is_none()));
    }

    #[test]
    fn test_highlight_plain_code_sets_code_style() {
        let lines = highlight_code(None, "plain");
        assert!(lines[0].iter().all(|span| span.style().code));
    }

    #[test]
    fn test_highlight_html_emits_styled_spans() {
        let html = highlight_html(Some("rust"), "fn main() {}\nlet x = 1;").unwrap();
        assert!(html.contains("<span style=\""));
        assert_eq!(html.lines().count(), 2);
        assert!(!html.contains("background-color"));
    }

    #[test]
    fn test_highlight_html_escapes_markup() {
        let html = highlight_html(Some("rust"), "let a = 1 < 2;").unwrap();
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn test_highlight_html_unknown_language_is_none() {
        assert!(highlight_html(Some("nope"), "x").is_none());
        assert!(highlight_html(None, "x").is_none());
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        assert_eq!(background_mode_from_colorfgbg(Some("15;0")), BackgroundMode::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        assert_eq!(background_mode_from_colorfgbg(Some("0;15")), BackgroundMode::Light);
    }

    #[test]
    fn test_colorfgbg_garbage_defaults_to_dark() {
        assert_eq!(background_mode_from_colorfgbg(Some("x")), BackgroundMode::Dark);
        assert_eq!(background_mode_from_colorfgbg(None), BackgroundMode::Dark);
    }

    #[test]
    fn test_background_override() {
        set_background_mode(Some(HighlightBackground::Light));
        assert_eq!(background_mode(), BackgroundMode::Light);
        set_background_mode(Some(HighlightBackground::Dark));
        assert_eq!(background_mode(), BackgroundMode::Dark);
        set_background_mode(None);
    }

    #[test]
    fn test_light_mode_darkens_bright_fg() {
        let bright = InlineColor {
            r: 240,
            g: 230,
            b: 120,
        };
        let adjusted = adjust_fg_for_background(bright, BackgroundMode::Light);
        assert!(adjusted.r < bright.r);
        assert!(adjusted.g < bright.g);
        assert!(adjusted.b < bright.b);
    }

    #[test]
    fn test_dark_mode_keeps_fg() {
        let color = InlineColor { r: 1, g: 2, b: 3 };
        assert_eq!(adjust_fg_for_background(color, BackgroundMode::Dark), color);
    }
}
