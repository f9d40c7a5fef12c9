use cagent_core::{execute, Command, HttpBackend, Panel, SlotId, ViewController};
use tokio::sync::mpsc::UnboundedSender;

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Focusable rows of the similarity panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityFocus {
    #[default]
    File1,
    File2,
    Analyze,
    Preview,
}

impl SimilarityFocus {
    const ORDER: [SimilarityFocus; 4] = [
        SimilarityFocus::File1,
        SimilarityFocus::File2,
        SimilarityFocus::Analyze,
        SimilarityFocus::Preview,
    ];

    pub fn next(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1).min(Self::ORDER.len() - 1)]
    }

    pub fn prev(self) -> Self {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[i.saturating_sub(1)]
    }

    pub fn slot(self) -> Option<SlotId> {
        match self {
            SimilarityFocus::File1 => Some(SlotId::First),
            SimilarityFocus::File2 => Some(SlotId::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsRow {
    #[default]
    Language,
    Theme,
}

pub struct App {
    pub should_quit: bool,
    pub controller: ViewController<HttpBackend>,
    pub input_mode: InputMode,

    // Cursor positions (in chars) of the editable fields
    pub chat_cursor: usize,
    pub help_cursor: usize,
    pub file_inputs: [String; 2],
    pub file_cursors: [usize; 2],

    pub similarity_focus: SimilarityFocus,
    pub settings_row: SettingsRow,

    // Scroll state
    pub chat_scroll: u16,
    pub chat_follow: bool,
    pub help_scroll: u16,
    pub history_scroll: u16,
    pub preview_scroll: u16,

    // Animation state
    pub animation_frame: u8,

    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(controller: ViewController<HttpBackend>, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            controller,
            input_mode: InputMode::Editing,
            chat_cursor: 0,
            help_cursor: 0,
            file_inputs: [String::new(), String::new()],
            file_cursors: [0, 0],
            similarity_focus: SimilarityFocus::default(),
            settings_row: SettingsRow::default(),
            chat_scroll: 0,
            chat_follow: true,
            help_scroll: 0,
            history_scroll: 0,
            preview_scroll: 0,
            animation_frame: 0,
            events,
        }
    }

    pub fn panel(&self) -> Panel {
        self.controller.state().panel
    }

    /// Run a command on a background task; its completion comes back as an event
    pub fn dispatch(&self, command: Option<Command>) {
        let Some(command) = command else { return };
        let backend = self.controller.backend();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let completion = execute(backend.as_ref(), command).await;
            if tx.send(AppEvent::Completion(completion)).is_err() {
                log::debug!("event loop gone, dropping completion");
            }
        });
    }

    pub fn switch_panel(&mut self, panel: Panel) {
        let command = self.controller.begin_switch_tab(panel);
        self.dispatch(command);
        self.history_scroll = 0;
        // Panels with a text field start in editing mode
        self.input_mode = match panel {
            Panel::Chat | Panel::Help => InputMode::Editing,
            _ => InputMode::Normal,
        };
    }

    pub fn send_message(&mut self) {
        let command = self.controller.begin_send_message();
        if command.is_some() {
            self.chat_cursor = 0;
            self.chat_follow = true;
        }
        self.dispatch(command);
    }

    /// Advance the thinking animation (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.controller.state().loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

/// An app wired to a server nobody listens on; spawned requests just fail
#[cfg(test)]
pub(crate) fn test_app() -> App {
    use cagent_core::Config;

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let backend = HttpBackend::new("http://127.0.0.1:9");
    App::new(ViewController::new(backend, Config::new(), None), tx)
}
