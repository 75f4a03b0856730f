use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{DOCUMENT_LEFT_PADDING, FOOTER_ROWS, HEADER_ROWS, MENU_BUTTON_WIDTH, overlays, status};

const LOADING_TEXT: &str = "Loading documentation...";

/// Screen regions around the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn chrome_layout(area: Rect) -> ChromeLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(0),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(area);
    ChromeLayout {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = chrome_layout(area);

    render_header(model, frame, layout.header);
    if model.loading {
        render_loading(frame, layout.body);
    } else {
        render_document(model, frame, layout.body);
    }
    status::render_footer(model, frame, layout.footer);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.menu_open {
        overlays::render_menu_overlay(model, frame, area);
    }
}

fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let style = super::style::header_style();
    frame.render_widget(Paragraph::new("").style(style), area);

    let button_style = if model.menu_open {
        style.reversed()
    } else {
        style
    };
    let button = Rect {
        width: MENU_BUTTON_WIDTH.min(area.width),
        ..area
    };
    frame.render_widget(Paragraph::new(" ≡ ").style(button_style), button);

    let title_area = Rect {
        x: area.x + button.width,
        width: area.width.saturating_sub(button.width * 2),
        ..area
    };
    let title = Paragraph::new(model.store.title().to_string())
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(title, title_area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let width = (LOADING_TEXT.len() as u16 + 6).min(area.width);
    let height = 3.min(area.height);
    let panel = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    let block = Block::default().borders(Borders::ALL);
    let text = Paragraph::new(LOADING_TEXT)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(text, panel);
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let toast_active = model.active_toast().is_some();
    let doc_outer_area = Rect {
        height: area.height.saturating_sub(u16::from(toast_active)),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: u16::from(toast_active).min(area.height),
        ..area
    };

    let visible_lines = model
        .document
        .visible_lines(model.viewport.offset(), model.viewport.height() as usize);

    let content: Vec<Line> = visible_lines
        .iter()
        .map(|line| {
            let line_style = super::style::style_for_line_type(line.line_type());
            match line.spans() {
                Some(spans) => Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                super::style::style_for_inline(line_style, span.style()),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                None => Line::styled(line.content().to_string(), line_style),
            }
        })
        .collect();

    let doc_block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(DOCUMENT_LEFT_PADDING));
    frame.render_widget(Clear, doc_outer_area);
    frame.render_widget(Paragraph::new(content).block(doc_block), doc_outer_area);

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
}
