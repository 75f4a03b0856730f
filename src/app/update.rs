use crate::app::Model;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Pages
    /// Go to the next page (no-op on the last page)
    NextPage,
    /// Go to the previous page (no-op on the first page)
    PrevPage,
    /// Go to the page at this index and close the menu
    JumpTo(usize),

    // Menu
    /// Open or close the page menu
    ToggleMenu,
    /// Close the page menu
    CloseMenu,
    /// Move the menu cursor up
    MenuUp,
    /// Move the menu cursor down
    MenuDown,
    /// Open the page under the menu cursor
    MenuSelect,

    // Scrolling
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of page
    GoToTop,
    /// Go to end of page
    GoToBottom,

    // Manifest
    /// Reload the manifest
    Reload,
    /// Manifest changed on disk
    FileChanged,
    /// Toggle manifest watching
    ToggleWatch,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here. Loading the manifest and touching the
/// file watcher are side effects handled by the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::NextPage => {
            if model.store.next() {
                model.page_changed();
            }
        }
        Message::PrevPage => {
            if model.store.previous() {
                model.page_changed();
            }
        }
        Message::JumpTo(index) => {
            if model.store.jump_to(index) {
                model.page_changed();
            }
            model.menu_open = false;
        }

        Message::ToggleMenu => {
            model.menu_open = !model.menu_open;
            if model.menu_open {
                model.menu_selected = model.store.current_index();
                model.help_visible = false;
            }
        }
        Message::CloseMenu => model.menu_open = false,
        Message::MenuUp => {
            model.menu_selected = model.menu_selected.saturating_sub(1);
        }
        Message::MenuDown => {
            let last = model.store.len().saturating_sub(1);
            model.menu_selected = (model.menu_selected + 1).min(last);
        }
        Message::MenuSelect => {
            let index = model.menu_selected;
            return update(model, Message::JumpTo(index));
        }

        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        Message::Reload | Message::FileChanged => model.loading = true,
        Message::ToggleWatch => model.watch_enabled = !model.watch_enabled,

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        Message::Resize(width, height) => {
            let old_width = model.viewport.width();
            model.terminal_size = (width, height);
            model
                .viewport
                .resize(width, crate::ui::document_rows(height));
            if width != old_width {
                model.rebuild_document();
            }
        }
        Message::Redraw => {}

        Message::Quit => model.should_quit = true,
    }
    model
}
