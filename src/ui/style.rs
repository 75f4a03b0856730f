//! Terminal styling for rendered markdown and page chrome.
//!
//! [`style_for_element`] is the single dispatch table from [`ElementKind`] to
//! a ratatui [`Style`]. Line styles and inline span styles both go through
//! it. Colors are ANSI so they follow the terminal palette, with darker
//! variants for light backgrounds.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{ElementKind, InlineColor, InlineStyle, LineType};

/// Style for a markdown element on the current terminal background.
pub fn style_for_element(kind: ElementKind) -> Style {
    element_style(kind, crate::highlight::is_light_background())
}

/// The element style table.
fn element_style(kind: ElementKind, light_bg: bool) -> Style {
    let pick = |dark: Color, light: Color| if light_bg { light } else { dark };
    match kind {
        ElementKind::Heading1 => Style::default()
            .fg(pick(Color::Cyan, Color::Indexed(24)))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ElementKind::Heading2 => Style::default()
            .fg(pick(Color::Green, Color::Indexed(22)))
            .add_modifier(Modifier::BOLD),
        ElementKind::Heading3 => Style::default()
            .fg(pick(Color::Yellow, Color::Indexed(58)))
            .add_modifier(Modifier::BOLD),
        ElementKind::MinorHeading => Style::default()
            .fg(pick(Color::Blue, Color::Indexed(24)))
            .add_modifier(Modifier::BOLD),

        ElementKind::CodeBlock => Style::default()
            .fg(pick(Color::Indexed(245), Color::Indexed(238)))
            .add_modifier(Modifier::DIM),
        ElementKind::InlineCode => Style::default()
            .fg(pick(Color::Red, Color::Indexed(88)))
            .add_modifier(Modifier::BOLD),

        ElementKind::BlockQuote => Style::default()
            .fg(pick(Color::Blue, Color::Indexed(24)))
            .add_modifier(Modifier::ITALIC),
        ElementKind::Link => Style::default()
            .fg(pick(Color::LightBlue, Color::Blue))
            .add_modifier(Modifier::UNDERLINED),

        ElementKind::TableHeaderCell => Style::default().add_modifier(Modifier::BOLD),

        ElementKind::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
        ElementKind::Strong => Style::default().add_modifier(Modifier::BOLD),
        ElementKind::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),

        ElementKind::Rule => Style::default()
            .fg(pick(Color::Indexed(240), Color::Indexed(241)))
            .add_modifier(Modifier::DIM),
        ElementKind::RawHtml => Style::default().fg(pick(Color::Magenta, Color::Indexed(90))),

        ElementKind::Paragraph
        | ElementKind::Table
        | ElementKind::TableRow
        | ElementKind::TableCell
        | ElementKind::BulletList
        | ElementKind::OrderedList
        | ElementKind::ListItem => Style::default(),
    }
}

/// Style for a whole rendered line.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    line_type
        .element_kind()
        .map_or_else(Style::default, style_for_element)
}

/// Style for an inline span, merged over its line style.
///
/// Syntax-highlight colors win over element colors.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    for kind in inline.element_kinds() {
        style = style.patch(style_for_element(kind));
    }

    if let Some(fg) = inline.fg {
        style = style
            .fg(fg_color_for_terminal(fg))
            .remove_modifier(Modifier::DIM);
    }

    style
}

/// Header bar with the menu button and document title.
pub fn header_style() -> Style {
    Style::default()
        .bg(Color::Indexed(236))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Footer bar with the previous/next affordances.
pub fn footer_style() -> Style {
    Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(252))
}

/// Highlight for the menu cursor row.
pub fn menu_cursor_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn fg_color_for_terminal(fg: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("DOCDECK_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_elements_are_bold() {
        for kind in [
            ElementKind::Heading1,
            ElementKind::Heading2,
            ElementKind::Heading3,
            ElementKind::MinorHeading,
        ] {
            for light in [false, true] {
                assert!(element_style(kind, light).add_modifier.contains(Modifier::BOLD));
            }
        }
    }

    #[test]
    fn test_h1_is_underlined_and_distinct_from_h2() {
        let h1 = element_style(ElementKind::Heading1, false);
        let h2 = element_style(ElementKind::Heading2, false);
        assert!(h1.add_modifier.contains(Modifier::UNDERLINED));
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_light_background_uses_darker_colors() {
        let dark = element_style(ElementKind::Heading1, false);
        let light = element_style(ElementKind::Heading1, true);
        assert_eq!(dark.fg, Some(Color::Cyan));
        assert_eq!(light.fg, Some(Color::Indexed(24)));
    }

    #[test]
    fn test_line_styles_follow_element_table() {
        assert_eq!(
            style_for_line_type(&LineType::Heading(5)),
            style_for_element(ElementKind::MinorHeading)
        );
        assert_eq!(style_for_line_type(&LineType::Empty), Style::default());
        assert!(
            style_for_line_type(&LineType::TableHeader)
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_inline_flags_stack() {
        let inline = InlineStyle {
            strong: true,
            emphasis: true,
            strikethrough: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_link_is_underlined() {
        let inline = InlineStyle {
            link: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(style.fg.is_some());
    }

    #[test]
    fn test_inline_color_removes_dim_modifier() {
        let base = Style::default().add_modifier(Modifier::DIM);
        let inline = InlineStyle {
            code: true,
            fg: Some(InlineColor { r: 255, g: 0, b: 0 }),
            ..InlineStyle::default()
        };

        let styled = style_for_inline(base, inline);
        assert!(!styled.add_modifier.contains(Modifier::DIM));
        assert_ne!(styled.fg, style_for_element(ElementKind::InlineCode).fg);
    }

    #[test]
    fn test_truecolor_detection() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
        assert!(supports_truecolor_from_env(Some("truecolor"), Some("xterm-256color")));
        assert!(supports_truecolor_from_env(None, Some("xterm-direct")));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        assert_eq!(rgb_to_xterm_256(255, 0, 0), 196);
    }
}
