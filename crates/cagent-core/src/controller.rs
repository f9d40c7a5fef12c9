//! The view controller: owns `AppState` and turns user intents and server
//! replies into state transitions
//!
//! Remote operations come in two halves. `begin_*` validates input, applies
//! the optimistic update and hands back a `Command`; `apply` consumes the
//! matching `Completion`. The `async` wrappers run both halves inline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{Backend, ChatResponse};
use crate::command::{self, file_name_of, Command, Completion, FileRead};
use crate::config::Config;
use crate::i18n::{self, InputField, LabelKey, Language, Message};
use crate::state::{
    AppState, ChatMessage, HelpView, HistoryView, Notification, Panel, PreviewIcon,
    PreviewToggle, SelectedFile, Severity, SimilarityView, SlotId, Theme, TranscriptEntry,
    UnknownPanel,
};

pub struct ViewController<B: Backend> {
    state: AppState,
    backend: Arc<B>,
    config: Config,
    config_path: Option<PathBuf>,
}

impl<B: Backend> ViewController<B> {
    /// `config_path` is where theme changes are persisted; `None` keeps them in memory
    pub fn new(backend: B, config: Config, config_path: Option<PathBuf>) -> Self {
        let state = AppState {
            theme: config.theme,
            ..AppState::default()
        };
        Self {
            state,
            backend: Arc::new(backend),
            config,
            config_path,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&mut self, command: Command) {
        let completion = command::execute(self.backend.as_ref(), command).await;
        self.apply(completion);
    }

    async fn run_opt(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.run(command).await;
        }
    }

    // Startup

    /// Load the server language and the local theme, then open the chat panel
    pub async fn initialize(&mut self) {
        self.load_config().await;
        self.state.theme = self.config.theme;
        self.switch_tab(Panel::Chat).await;
    }

    pub async fn load_config(&mut self) {
        match self.backend.config().await {
            Ok(server) => {
                self.state.language = server.language();
                log::info!("server language is {}", self.state.language);
            }
            Err(e) => log::error!("failed to load server config: {}", e),
        }
    }

    // Navigation

    /// Activate a panel; entering History asks for a refresh
    pub fn begin_switch_tab(&mut self, panel: Panel) -> Option<Command> {
        self.state.panel = panel;
        if panel == Panel::History {
            Some(self.begin_load_history())
        } else {
            None
        }
    }

    pub async fn switch_tab(&mut self, panel: Panel) {
        let command = self.begin_switch_tab(panel);
        self.run_opt(command).await;
    }

    pub fn begin_switch_tab_by_name(&mut self, name: &str) -> Result<Option<Command>, UnknownPanel> {
        let panel: Panel = name.parse()?;
        Ok(self.begin_switch_tab(panel))
    }

    // Chat

    pub fn chat_input_mut(&mut self) -> &mut String {
        &mut self.state.chat_input
    }

    pub fn set_chat_input(&mut self, text: impl Into<String>) {
        self.state.chat_input = text.into();
    }

    pub fn send_enabled(&self) -> bool {
        !self.state.loading && !self.state.chat_input.trim().is_empty()
    }

    pub fn begin_send_message(&mut self) -> Option<Command> {
        let message = self.state.chat_input.trim().to_string();
        if message.is_empty() || self.state.loading {
            return None;
        }

        self.state.chat_input.clear();
        self.state
            .transcript
            .push(TranscriptEntry::Message(ChatMessage::user(message.clone())));
        self.state.loading = true;

        Some(Command::Chat {
            message,
            history: self.state.conversation.entries().to_vec(),
        })
    }

    pub async fn send_message(&mut self) {
        let command = self.begin_send_message();
        self.run_opt(command).await;
    }

    // Help

    pub fn help_input_mut(&mut self) -> &mut String {
        &mut self.state.help_input
    }

    pub fn set_help_input(&mut self, text: impl Into<String>) {
        self.state.help_input = text.into();
    }

    pub fn begin_search_help(&mut self) -> Option<Command> {
        let query = self.state.help_input.trim().to_string();
        if query.is_empty() {
            self.notify_msg(Message::EmptyQuery, Severity::Error);
            return None;
        }

        let ticket = self.state.help_seq.issue();
        Some(Command::Help {
            ticket,
            query,
            language: self.state.language,
        })
    }

    pub async fn search_help(&mut self) {
        let command = self.begin_search_help();
        self.run_opt(command).await;
    }

    // Similarity

    /// Select (`Some`) or clear (`None`) one of the two comparison files.
    /// Clearing is immediate; a selection is read by the returned command.
    pub fn begin_select_file(&mut self, slot: SlotId, path: Option<PathBuf>) -> Option<Command> {
        let seq = &mut self.state.file_seqs[slot.index()];
        match path {
            Some(path) => Some(Command::ReadFile {
                slot,
                ticket: seq.issue(),
                path,
            }),
            None => {
                seq.cancel();
                self.clear_file(slot);
                None
            }
        }
    }

    pub async fn handle_file_select(&mut self, slot: SlotId, path: Option<PathBuf>) {
        let command = self.begin_select_file(slot, path);
        self.run_opt(command).await;
    }

    fn clear_file(&mut self, slot: SlotId) {
        self.state.files.set(slot, None);
        self.state.preview_visible = false;
    }

    pub fn analyze_enabled(&self) -> bool {
        self.state.files.is_ready()
    }

    /// "Selected: name (1.23 KB)" for a populated slot
    pub fn file_info(&self, slot: SlotId) -> Option<String> {
        self.state.files.get(slot).map(|file| {
            format!(
                "{}: {} ({} KB)",
                self.text(Message::FileSelected),
                file.name,
                file.size_kb()
            )
        })
    }

    pub fn begin_analyze_similarity(&mut self) -> Option<Command> {
        let Some((first, second)) = self.state.files.both() else {
            self.notify_msg(Message::SelectTwoFiles, Severity::Error);
            return None;
        };
        let (file1, file2) = (first.path.clone(), second.path.clone());

        let ticket = self.state.similarity_seq.issue();
        Some(Command::Similarity {
            ticket,
            file1,
            file2,
        })
    }

    pub async fn analyze_similarity(&mut self) {
        let command = self.begin_analyze_similarity();
        self.run_opt(command).await;
    }

    pub fn toggle_code_preview(&mut self) {
        self.state.preview_visible = !self.state.preview_visible;
    }

    pub fn preview_toggle(&self) -> PreviewToggle {
        let visible = self.state.preview_visible;
        PreviewToggle {
            caption: i18n::preview_toggle_caption(self.state.language, visible),
            icon: if visible {
                PreviewIcon::EyeSlash
            } else {
                PreviewIcon::Eye
            },
        }
    }

    // History

    pub fn begin_load_history(&mut self) -> Command {
        self.state.history_view = HistoryView::Loading;
        Command::History {
            ticket: self.state.history_seq.issue(),
        }
    }

    pub async fn load_history(&mut self) {
        let command = self.begin_load_history();
        self.run(command).await;
    }

    // Language and theme

    pub fn begin_change_language(&mut self, language: Language) -> Command {
        Command::Language {
            ticket: self.state.language_seq.issue(),
            language,
        }
    }

    pub async fn change_language(&mut self, language: Language) {
        let command = self.begin_change_language(language);
        self.run(command).await;
    }

    pub fn begin_toggle_language(&mut self) -> Command {
        self.begin_change_language(self.state.language.toggled())
    }

    pub async fn toggle_language(&mut self) {
        let command = self.begin_toggle_language();
        self.run(command).await;
    }

    pub fn change_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.config.theme = theme;
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                log::warn!("failed to persist theme to {}: {}", path.display(), e);
            }
        }
    }

    pub fn label(&self, key: LabelKey) -> &'static str {
        i18n::label(self.state.language, key)
    }

    /// Every labelled element with its caption in the current language
    pub fn labels(&self) -> Vec<(LabelKey, &'static str)> {
        LabelKey::ALL
            .iter()
            .map(|&key| (key, self.label(key)))
            .collect()
    }

    pub fn placeholder(&self, field: InputField) -> &'static str {
        i18n::placeholder(self.state.language, field)
    }

    pub fn language_caption(&self) -> &'static str {
        self.state.language.display_name()
    }

    pub fn text(&self, msg: Message) -> &'static str {
        i18n::message(self.state.language, msg)
    }

    // Notifications

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.state.notification = Some(Notification::new(message, severity, Instant::now()));
    }

    fn notify_msg(&mut self, msg: Message, severity: Severity) {
        self.notify(self.text(msg), severity);
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    /// Drop the notification once its time is up
    pub fn tick(&mut self, now: Instant) {
        if self
            .state
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.state.notification = None;
        }
    }

    /// Last-resort handler for errors nothing else caught
    pub fn report_unexpected(&mut self, err: &anyhow::Error) {
        log::error!("unexpected error: {:#}", err);
        self.notify_msg(Message::UnexpectedError, Severity::Error);
    }

    /// Whether the loading overlay should be shown
    pub fn is_busy(&self) -> bool {
        self.state.loading
            || self.state.help_seq.is_pending()
            || self.state.similarity_seq.is_pending()
    }

    // Completions

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Chat { message, result } => {
                match result {
                    Ok(ChatResponse {
                        success: true,
                        response: Some(reply),
                        ..
                    }) => {
                        self.state
                            .transcript
                            .push(TranscriptEntry::Message(ChatMessage::assistant(reply.clone())));
                        self.state.conversation.push_exchange(&message, &reply);
                    }
                    Ok(response) => {
                        log::warn!("chat reported failure: {:?}", response.error);
                        self.notify_msg(Message::ChatUnavailable, Severity::Error);
                    }
                    Err(e) => {
                        log::error!("error sending message: {}", e);
                        self.notify_msg(Message::SendFailed, Severity::Error);
                    }
                }
                self.state.loading = false;
            }
            Completion::Help { ticket, result } => {
                if !self.state.help_seq.settle(ticket) {
                    log::debug!("dropping stale help response #{}", ticket);
                    return;
                }
                match result {
                    Ok(response) if response.success => {
                        self.state.help_view = HelpView::Results {
                            entries: response.entries(),
                            kind: response.kind,
                        };
                    }
                    Ok(response) => {
                        let message = response
                            .message
                            .unwrap_or_else(|| self.text(Message::NoResults).to_string());
                        self.state.help_view = HelpView::NoResults(message);
                    }
                    Err(e) => {
                        log::error!("error searching help: {}", e);
                        self.notify_msg(Message::SearchFailed, Severity::Error);
                    }
                }
            }
            Completion::Similarity { ticket, result } => {
                if !self.state.similarity_seq.settle(ticket) {
                    log::debug!("dropping stale similarity response #{}", ticket);
                    return;
                }
                match result {
                    Ok(response) if response.success => {
                        let score = response.similarity.unwrap_or(0.0);
                        self.state.similarity_view = SimilarityView::Result {
                            percentage: format!("{:.2}", score * 100.0),
                            file1: response.file1.unwrap_or_default(),
                            file2: response.file2.unwrap_or_default(),
                        };
                    }
                    Ok(response) => {
                        let message = response
                            .error
                            .unwrap_or_else(|| self.text(Message::AnalysisFailed).to_string());
                        self.notify(message, Severity::Error);
                    }
                    Err(e) => {
                        log::error!("error analysing similarity: {}", e);
                        self.notify_msg(Message::AnalysisFailedRetry, Severity::Error);
                    }
                }
            }
            Completion::History { ticket, result } => {
                if !self.state.history_seq.settle(ticket) {
                    log::debug!("dropping stale history response #{}", ticket);
                    return;
                }
                self.state.history_view = match result {
                    Ok(response) if response.success => {
                        if response.history.is_empty() {
                            HistoryView::Empty
                        } else {
                            HistoryView::Entries(response.history.into_iter().rev().collect())
                        }
                    }
                    Ok(_) => HistoryView::Failed(Message::HistoryLoadFailed),
                    Err(e) => {
                        log::error!("error loading history: {}", e);
                        HistoryView::Failed(Message::HistoryFailedRetry)
                    }
                };
            }
            Completion::ReadFile {
                slot,
                ticket,
                path,
                result,
            } => {
                if !self.state.file_seqs[slot.index()].settle(ticket) {
                    log::debug!("dropping stale read of {}", path.display());
                    return;
                }
                let FileRead {
                    size_bytes,
                    content,
                } = match result {
                    Ok(read) => read,
                    Err(e) => {
                        log::warn!("cannot select {}: {}", path.display(), e);
                        self.clear_file(slot);
                        self.notify_msg(Message::FileReadFailed, Severity::Error);
                        return;
                    }
                };

                let content = match content {
                    Ok(text) => Some(text),
                    Err(e) => {
                        log::error!("failed to read {}: {}", path.display(), e);
                        self.notify_msg(Message::FileReadFailed, Severity::Error);
                        None
                    }
                };
                let loaded = content.is_some();
                self.state.files.set(
                    slot,
                    Some(SelectedFile {
                        name: file_name_of(&path),
                        path,
                        size_bytes,
                        content,
                    }),
                );
                if loaded && self.state.files.is_ready() {
                    self.state.preview_visible = true;
                }
            }
            Completion::Language {
                ticket,
                language,
                result,
            } => {
                if !self.state.language_seq.settle(ticket) {
                    log::debug!("dropping stale language response #{}", ticket);
                    return;
                }
                match result {
                    Ok(response) if response.success => {
                        self.state.language = language;
                        self.notify_msg(Message::LanguageChanged, Severity::Success);
                    }
                    Ok(_) => log::debug!("server declined language {}", language),
                    Err(e) => {
                        log::error!("error switching language: {}", e);
                        self.notify_msg(Message::LanguageChangeFailed, Severity::Error);
                    }
                }
            }
        }
    }
}
