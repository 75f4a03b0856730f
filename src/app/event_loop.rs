use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

use super::effects::Runtime;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the viewer until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or the event
    /// loop hits an I/O failure. Manifest load failures are not errors here;
    /// they are shown in the viewer.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; docdeck requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(self.manifest_path.clone(), (size.width, size.height));
        model.watch_enabled = self.watch_enabled;
        model.pending_page = self.initial_page;

        let result = if self.mouse_enabled {
            execute!(stdout(), EnableMouseCapture)
                .context("Failed to enable mouse capture")
                .and_then(|()| self.event_loop(&mut terminal, &mut model))
        } else {
            self.event_loop(&mut terminal, &mut model)
        };

        if self.mouse_enabled {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        ratatui::restore();

        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut runtime = Runtime::start(model, self.watch_debounce);
        let mut window_title: Option<String> = None;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if let Some(outcome) = runtime.poll_load() {
                model.apply_load_outcome(outcome);
                needs_render = true;
            }

            if window_title.as_deref() != Some(model.store.title()) {
                execute!(stdout(), SetTitle(model.store.title()))?;
                window_title = Some(model.store.title().to_string());
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if runtime.take_file_change(model) {
                tracing::info!(path = %model.manifest_path.display(), "manifest changed on disk");
                Self::dispatch(model, &mut runtime, Message::FileChanged);
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || runtime.load_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        self.handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        tracing::trace!(?msg, "message");
                        Self::dispatch(model, &mut runtime, msg);
                        needs_render = true;
                    }
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                model.ensure_highlight_overscan();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, runtime: &mut Runtime, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        runtime.handle_message_side_effects(model, &side_msg);
    }
}
