use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Message, Model};
use crate::ui::MENU_BUTTON_WIDTH;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_STEP: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(*key, model),
            Event::Mouse(mouse) if self.mouse_enabled => self.handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        let area = screen_area(model);
        let layout = crate::ui::chrome_layout(area);
        let at = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::ScrollDown if model.menu_open => Some(Message::MenuDown),
            MouseEventKind::ScrollUp if model.menu_open => Some(Message::MenuUp),
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_STEP)),
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_STEP)),
            MouseEventKind::Down(MouseButton::Left) => {
                if model.help_visible {
                    return Some(Message::HideHelp);
                }

                let menu_button = Rect {
                    width: MENU_BUTTON_WIDTH.min(layout.header.width),
                    ..layout.header
                };
                if menu_button.contains(at) {
                    return Some(Message::ToggleMenu);
                }

                if model.menu_open {
                    return Some(
                        crate::ui::menu_index_at(model, area, mouse.column, mouse.row)
                            .map_or(Message::CloseMenu, Message::JumpTo),
                    );
                }

                let targets = crate::ui::footer_targets(model, layout.footer);
                if targets.previous.is_some_and(|rect| rect.contains(at)) {
                    return Some(Message::PrevPage);
                }
                if targets.next.is_some_and(|rect| rect.contains(at)) {
                    return Some(Message::NextPage);
                }
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.menu_open {
            return match key.code {
                KeyCode::Char('k') | KeyCode::Up => Some(Message::MenuUp),
                KeyCode::Char('j') | KeyCode::Down => Some(Message::MenuDown),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Message::MenuSelect),
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                    (index < model.store.len()).then_some(Message::JumpTo(index))
                }
                KeyCode::Esc | KeyCode::Char('m') => Some(Message::CloseMenu),
                KeyCode::Char('q') => Some(Message::Quit),
                _ => None,
            };
        }

        match key.code {
            // Pages
            KeyCode::Right | KeyCode::Char('l' | 'n') => {
                model.store.next_page().map(|_| Message::NextPage)
            }
            KeyCode::Left | KeyCode::Char('h' | 'p') => {
                model.store.previous_page().map(|_| Message::PrevPage)
            }
            KeyCode::Char('m') => Some(Message::ToggleMenu),

            // Scrolling
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::HalfPageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::HalfPageUp)
            }
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Manifest
            KeyCode::Char('r') => Some(Message::Reload),
            KeyCode::Char('w') => Some(Message::ToggleWatch),

            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }
}

/// Full terminal area as last reported to the model.
fn screen_area(model: &Model) -> Rect {
    let (width, height) = model.terminal_size;
    Rect::new(0, 0, width, height)
}
