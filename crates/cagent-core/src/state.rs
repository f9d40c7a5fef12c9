//! UI-agnostic application state types
//!
//! This module contains data structures that are shared by every front end
//! and don't depend on any specific rendering surface. The controller owns
//! one of each; renderers only read them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::i18n::{LabelKey, Language};

/// Maximum number of entries kept in the conversation sent to the server
pub const MAX_HISTORY: usize = 20;

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// A chat message in the AI conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Conversation context sent along with each chat request, most recent last
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    entries: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange, keeping only the newest `MAX_HISTORY` entries
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.entries.push(ChatMessage::user(question));
        self.entries.push(ChatMessage::assistant(answer));
        if self.entries.len() > MAX_HISTORY {
            let excess = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One of the five mutually exclusive panels, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Chat,
    Help,
    Similarity,
    History,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Chat,
        Panel::Help,
        Panel::Similarity,
        Panel::History,
        Panel::Settings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Panel::Chat => "chat",
            Panel::Help => "help",
            Panel::Similarity => "similarity",
            Panel::History => "history",
            Panel::Settings => "settings",
        }
    }

    pub fn nav_label(&self) -> LabelKey {
        match self {
            Panel::Chat => LabelKey::NavChat,
            Panel::Help => LabelKey::NavHelp,
            Panel::Similarity => LabelKey::NavSimilarity,
            Panel::History => LabelKey::NavHistory,
            Panel::Settings => LabelKey::NavSettings,
        }
    }

    /// Panel bound to the `1`..`5` shortcut digits
    pub fn from_shortcut(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPanel(pub String);

impl fmt::Display for UnknownPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown panel: {}", self.0)
    }
}

impl std::error::Error for UnknownPanel {}

impl FromStr for Panel {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

/// Colour scheme, persisted locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A transient message; a newer one replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity, now: Instant) -> Self {
        Self {
            message: message.into(),
            severity,
            expires_at: now + NOTIFICATION_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    First,
    Second,
}

impl SlotId {
    pub fn index(&self) -> usize {
        match self {
            SlotId::First => 0,
            SlotId::Second => 1,
        }
    }
}

/// A file picked for the similarity comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Text content, once read for the preview
    pub content: Option<String>,
}

impl SelectedFile {
    pub fn size_kb(&self) -> String {
        format!("{:.2}", self.size_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilePair {
    first: Option<SelectedFile>,
    second: Option<SelectedFile>,
}

impl FilePair {
    pub fn get(&self, slot: SlotId) -> Option<&SelectedFile> {
        match slot {
            SlotId::First => self.first.as_ref(),
            SlotId::Second => self.second.as_ref(),
        }
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut SelectedFile> {
        match slot {
            SlotId::First => self.first.as_mut(),
            SlotId::Second => self.second.as_mut(),
        }
    }

    pub fn set(&mut self, slot: SlotId, file: Option<SelectedFile>) {
        match slot {
            SlotId::First => self.first = file,
            SlotId::Second => self.second = file,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    pub fn both(&self) -> Option<(&SelectedFile, &SelectedFile)> {
        match (&self.first, &self.second) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// One visible line of the chat log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Welcome,
    Message(ChatMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HelpView {
    #[default]
    Placeholder,
    Results {
        entries: Vec<(String, String)>,
        kind: Option<String>,
    },
    NoResults(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SimilarityView {
    #[default]
    Empty,
    Result {
        /// Score in percent, two decimals
        percentage: String,
        file1: String,
        file2: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryView {
    #[default]
    Idle,
    Loading,
    /// Most recent first
    Entries(Vec<String>),
    Empty,
    Failed(crate::i18n::Message),
}

/// Glyph of the preview toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewIcon {
    Eye,
    EyeSlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewToggle {
    pub caption: &'static str,
    pub icon: PreviewIcon,
}

/// Monotonic ticket source for one panel's requests
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSeq {
    issued: u64,
    pending: bool,
}

impl RequestSeq {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.pending = true;
        self.issued
    }

    /// Accepts only the latest ticket; an accepted ticket settles the panel
    pub fn settle(&mut self, ticket: u64) -> bool {
        if ticket != self.issued || !self.pending {
            return false;
        }
        self.pending = false;
        true
    }

    /// Supersede any outstanding ticket without issuing a new request
    pub fn cancel(&mut self) {
        self.issued += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Everything the front end draws
#[derive(Debug, Clone)]
pub struct AppState {
    pub panel: Panel,
    pub language: Language,
    pub theme: Theme,

    pub chat_input: String,
    pub transcript: Vec<TranscriptEntry>,
    pub conversation: Conversation,
    pub loading: bool,

    pub help_input: String,
    pub help_view: HelpView,
    pub help_seq: RequestSeq,

    pub files: FilePair,
    /// One ticket source per slot for the file reads
    pub file_seqs: [RequestSeq; 2],
    pub preview_visible: bool,
    pub similarity_view: SimilarityView,
    pub similarity_seq: RequestSeq,

    pub history_view: HistoryView,
    pub history_seq: RequestSeq,

    pub language_seq: RequestSeq,

    pub notification: Option<Notification>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            panel: Panel::Chat,
            language: Language::ZhCn,
            theme: Theme::Light,
            chat_input: String::new(),
            transcript: vec![TranscriptEntry::Welcome],
            conversation: Conversation::new(),
            loading: false,
            help_input: String::new(),
            help_view: HelpView::Placeholder,
            help_seq: RequestSeq::default(),
            files: FilePair::default(),
            file_seqs: [RequestSeq::default(); 2],
            preview_visible: false,
            similarity_view: SimilarityView::Empty,
            similarity_seq: RequestSeq::default(),
            history_view: HistoryView::Idle,
            history_seq: RequestSeq::default(),
            language_seq: RequestSeq::default(),
            notification: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_keeps_latest_twenty() {
        let mut conv = Conversation::new();
        for i in 0..15 {
            conv.push_exchange(&format!("q{}", i), &format!("a{}", i));
            assert!(conv.len() <= MAX_HISTORY);
        }
        assert_eq!(conv.len(), MAX_HISTORY);
        assert_eq!(conv.entries()[0], ChatMessage::user("q5"));
        assert_eq!(conv.entries()[19], ChatMessage::assistant("a14"));
    }

    #[test]
    fn test_chat_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
    }

    #[test]
    fn test_panel_shortcuts() {
        assert_eq!(Panel::from_shortcut('1'), Some(Panel::Chat));
        assert_eq!(Panel::from_shortcut('4'), Some(Panel::History));
        assert_eq!(Panel::from_shortcut('5'), Some(Panel::Settings));
        assert_eq!(Panel::from_shortcut('0'), None);
        assert_eq!(Panel::from_shortcut('6'), None);
        assert_eq!(Panel::from_shortcut('x'), None);
    }

    #[test]
    fn test_panel_names_parse() {
        for panel in Panel::ALL {
            assert_eq!(panel.name().parse::<Panel>(), Ok(panel));
        }
        assert!("profile".parse::<Panel>().is_err());
    }

    #[test]
    fn test_panel_cycle_wraps() {
        assert_eq!(Panel::Settings.next(), Panel::Chat);
        assert_eq!(Panel::Chat.prev(), Panel::Settings);
    }

    #[test]
    fn test_file_pair_readiness() {
        let file = SelectedFile {
            path: PathBuf::from("a.c"),
            name: "a.c".to_string(),
            size_bytes: 2048,
            content: None,
        };
        let mut pair = FilePair::default();
        assert!(!pair.is_ready());
        pair.set(SlotId::First, Some(file.clone()));
        assert!(!pair.is_ready());
        pair.set(SlotId::Second, Some(file.clone()));
        assert!(pair.is_ready());
        pair.set(SlotId::First, None);
        assert!(!pair.is_ready());
        assert_eq!(file.size_kb(), "2.00");
    }

    #[test]
    fn test_request_seq_rejects_stale_tickets() {
        let mut seq = RequestSeq::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.settle(first));
        assert!(seq.is_pending());
        assert!(seq.settle(second));
        assert!(!seq.is_pending());
        assert!(!seq.settle(second));
    }

    #[test]
    fn test_request_seq_cancel_drops_outstanding_ticket() {
        let mut seq = RequestSeq::default();
        let ticket = seq.issue();
        seq.cancel();
        assert!(!seq.is_pending());
        assert!(!seq.settle(ticket));
    }

    #[test]
    fn test_notification_expiry() {
        let now = Instant::now();
        let n = Notification::new("x", Severity::Info, now);
        assert!(!n.is_expired(now + Duration::from_secs(4)));
        assert!(n.is_expired(now + NOTIFICATION_TTL));
    }
}
