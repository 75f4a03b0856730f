use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;

use super::{FOOTER_ROWS, HEADER_ROWS};

const MENU_MIN_WIDTH: u16 = 24;
/// Border plus "▸ 9. " prefix and a trailing space.
const MENU_CHROME_WIDTH: u16 = 8;

/// The page menu drops down from the header on the left edge.
pub fn menu_rect(model: &Model, area: Rect) -> Rect {
    let widest = model
        .store
        .pages()
        .iter()
        .map(|page| UnicodeWidthStr::width(page.title.as_str()))
        .max()
        .unwrap_or(0);
    let width = u16::try_from(widest)
        .unwrap_or(u16::MAX)
        .saturating_add(MENU_CHROME_WIDTH)
        .max(MENU_MIN_WIDTH)
        .min(area.width);

    // One row for "(no pages)" when the configuration is empty.
    let rows = u16::try_from(model.store.len().max(1)).unwrap_or(u16::MAX);
    let max_height = area.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS);
    let height = rows.saturating_add(2).min(max_height);

    Rect::new(area.x, area.y + HEADER_ROWS.min(area.height), width, height)
}

/// First page index shown when `visible_rows` rows fit and `selected` must
/// stay on screen.
pub fn menu_scroll_start(selected: usize, visible_rows: usize, len: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    let max_start = len.saturating_sub(visible_rows);
    selected.saturating_sub(visible_rows - 1).min(max_start)
}

/// Page index under a click at (`col`, `row`), if it lands on a menu entry.
pub fn menu_index_at(model: &Model, area: Rect, col: u16, row: u16) -> Option<usize> {
    let popup = menu_rect(model, area);
    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    let inside = col >= inner.x
        && col < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    if !inside {
        return None;
    }
    let start = menu_scroll_start(
        model.menu_selected,
        inner.height as usize,
        model.store.len(),
    );
    let index = start + (row - inner.y) as usize;
    (index < model.store.len()).then_some(index)
}

pub fn render_menu_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup = menu_rect(model, area);
    let visible_rows = popup.height.saturating_sub(2) as usize;
    let current = model.store.current_index();

    let mut lines: Vec<Line> = Vec::new();
    if model.store.is_empty() {
        lines.push(Line::styled(
            " (no pages)",
            Style::default().fg(Color::Indexed(245)),
        ));
    }

    let start = menu_scroll_start(model.menu_selected, visible_rows, model.store.len());
    for (index, page) in model
        .store
        .pages()
        .iter()
        .enumerate()
        .skip(start)
        .take(visible_rows)
    {
        let marker = if index == current { "▸" } else { " " };
        let number = if index < 9 {
            format!("{}.", index + 1)
        } else {
            "  ".to_string()
        };
        let style = if index == model.menu_selected {
            super::style::menu_cursor_style()
        } else if index == current {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!("{marker} {number} {}", page.title),
            style,
        ));
    }

    let block = Block::default()
        .title("Pages")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(2).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut keys: Vec<Line> = Vec::new();
    keys.push(Line::styled("Pages", section_style));
    keys.push(Line::raw("  Right / l / n       Next page"));
    keys.push(Line::raw("  Left / h / p        Previous page"));
    keys.push(Line::raw("  Click ‹ / ›         Previous / next"));
    keys.push(Line::raw(""));
    keys.push(Line::styled("Menu", section_style));
    keys.push(Line::raw("  m / click ≡         Toggle page menu"));
    keys.push(Line::raw("  j/k or Up/Down      Move cursor"));
    keys.push(Line::raw("  Enter / 1-9 / click Open page"));
    keys.push(Line::raw("  Esc                 Close menu"));
    keys.push(Line::raw(""));
    keys.push(Line::styled("Scrolling", section_style));
    keys.push(Line::raw("  j/k or Up/Down      Scroll"));
    keys.push(Line::raw("  Space / b           Page down / up"));
    keys.push(Line::raw("  Ctrl-d / Ctrl-u     Half page"));
    keys.push(Line::raw("  g / G               Top / bottom"));

    let mut other: Vec<Line> = Vec::new();
    other.push(Line::styled("Other", section_style));
    other.push(Line::raw("  r        Reload manifest"));
    other.push(Line::raw("  w        Toggle watch"));
    other.push(Line::raw("  ? / F1   Toggle help"));
    other.push(Line::raw("  q        Quit"));
    other.push(Line::raw(""));
    other.push(Line::styled("Manifest", section_style));
    other.push(Line::raw(format!(
        "  Manifest: {}",
        model.manifest_path.display()
    )));
    other.push(Line::raw(format!(
        "  Watching: {}",
        if model.watch_enabled { "on" } else { "off" }
    )));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(inner);
    frame.render_widget(Paragraph::new(keys), columns[0]);
    frame.render_widget(
        Paragraph::new(other).wrap(Wrap { trim: false }),
        columns[1],
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_scroll_start_keeps_selection_visible() {
        assert_eq!(menu_scroll_start(0, 5, 20), 0);
        assert_eq!(menu_scroll_start(4, 5, 20), 0);
        assert_eq!(menu_scroll_start(5, 5, 20), 1);
        assert_eq!(menu_scroll_start(19, 5, 20), 15);
        assert_eq!(menu_scroll_start(3, 10, 4), 0);
        assert_eq!(menu_scroll_start(3, 0, 4), 0);
    }

    #[test]
    fn test_centered_popup_is_clamped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_popup_rect(40, 40, area), area);
        assert_eq!(centered_popup_rect(10, 4, area), Rect::new(5, 3, 10, 4));
    }
}
