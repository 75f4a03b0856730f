use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, ToastLevel};

/// Clickable footer regions; `None` when the affordance is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FooterTargets {
    pub previous: Option<Rect>,
    pub next: Option<Rect>,
}

fn previous_label(model: &Model) -> Option<String> {
    model
        .store
        .previous_page()
        .map(|page| format!(" ‹ {} ", page.title))
}

fn next_label(model: &Model) -> Option<String> {
    model
        .store
        .next_page()
        .map(|page| format!(" {} › ", page.title))
}

fn label_width(label: &str, area: Rect) -> u16 {
    u16::try_from(UnicodeWidthStr::width(label))
        .unwrap_or(u16::MAX)
        .min(area.width / 2)
}

/// Where the previous/next labels sit inside the footer `area`.
pub fn footer_targets(model: &Model, area: Rect) -> FooterTargets {
    let previous = previous_label(model).map(|label| Rect {
        width: label_width(&label, area),
        ..area
    });
    let next = next_label(model).map(|label| {
        let width = label_width(&label, area);
        Rect {
            x: area.x + area.width - width,
            width,
            ..area
        }
    });
    FooterTargets { previous, next }
}

pub fn render_footer(model: &Model, frame: &mut Frame, area: Rect) {
    let style = super::style::footer_style();
    frame.render_widget(Paragraph::new("").style(style), area);

    if !model.store.is_empty() {
        let watch_indicator = if model.watch_enabled {
            "  [watching]"
        } else {
            ""
        };
        let position = format!(
            "{}/{}{watch_indicator}  ?:help",
            model.store.current_index() + 1,
            model.store.len()
        );
        frame.render_widget(
            Paragraph::new(position)
                .style(style.add_modifier(Modifier::DIM))
                .alignment(Alignment::Center),
            area,
        );
    }

    let targets = footer_targets(model, area);
    let nav_style = style.add_modifier(Modifier::BOLD);
    if let (Some(rect), Some(label)) = (targets.previous, previous_label(model)) {
        frame.render_widget(Paragraph::new(label).style(nav_style), rect);
    }
    if let (Some(rect), Some(label)) = (targets.next, next_label(model)) {
        frame.render_widget(
            Paragraph::new(label)
                .style(nav_style)
                .alignment(Alignment::Right),
            rect,
        );
    }
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
