use anyhow::Result;
use cagent_core::{Panel, SlotId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::Instant;

use crate::app::{App, InputMode, SettingsRow, SimilarityFocus};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Apply a line-editing key to `text`; returns false if the key isn't an edit
fn edit_line(text: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    let char_count = text.chars().count();
    *cursor = (*cursor).min(char_count);

    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(text, *cursor);
                text.remove(byte_pos);
            }
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(char_count),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = char_count,
        // Ctrl/Alt chords are shortcuts, never text
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            return false;
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(text, *cursor);
            text.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => return false,
    }
    true
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.controller.tick(Instant::now());
        }
        AppEvent::Completion(completion) => {
            app.controller.apply(completion);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('l') => {
                let command = app.controller.begin_toggle_language();
                app.dispatch(Some(command));
                return Ok(());
            }
            _ => {}
        }
    }

    // Ctrl/Alt + 1..5 switch panels; many terminals only report the Alt form
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        if let KeyCode::Char(c) = key.code {
            if let Some(panel) = Panel::from_shortcut(c) {
                app.switch_panel(panel);
                return Ok(());
            }
        }
    }

    if key.code == KeyCode::Esc {
        if app.controller.state().notification.is_some() {
            app.controller.dismiss_notification();
        } else {
            app.input_mode = InputMode::Normal;
        }
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.switch_panel(app.panel().next());
            return;
        }
        KeyCode::BackTab => {
            app.switch_panel(app.panel().prev());
            return;
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(panel) = Panel::from_shortcut(c) {
                app.switch_panel(panel);
            }
            return;
        }
        _ => {}
    }

    match app.panel() {
        Panel::Chat => handle_chat_normal(app, key),
        Panel::Help => handle_help_normal(app, key),
        Panel::Similarity => handle_similarity_normal(app, key),
        Panel::History => handle_history_normal(app, key),
        Panel::Settings => handle_settings_normal(app, key),
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        KeyCode::Char('j') | KeyCode::Down => {
            app.chat_follow = false;
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.chat_follow = false;
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Char('G') | KeyCode::End => app.chat_follow = true,
        _ => {}
    }
}

fn handle_help_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('j') | KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
        _ => {}
    }
}

fn handle_similarity_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.similarity_focus = app.similarity_focus.next(),
        KeyCode::Char('k') | KeyCode::Up => app.similarity_focus = app.similarity_focus.prev(),
        KeyCode::Char('J') => app.preview_scroll = app.preview_scroll.saturating_add(1),
        KeyCode::Char('K') => app.preview_scroll = app.preview_scroll.saturating_sub(1),
        KeyCode::Char('a') => {
            let command = app.controller.begin_analyze_similarity();
            app.dispatch(command);
        }
        KeyCode::Char('p') => app.controller.toggle_code_preview(),
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(slot) = app.similarity_focus.slot() {
                let idx = slot.index();
                app.file_inputs[idx].clear();
                app.file_cursors[idx] = 0;
                let command = app.controller.begin_select_file(slot, None);
                app.dispatch(command);
            }
        }
        KeyCode::Enter | KeyCode::Char('i') => match app.similarity_focus {
            SimilarityFocus::File1 | SimilarityFocus::File2 => {
                app.input_mode = InputMode::Editing;
            }
            SimilarityFocus::Analyze => {
                let command = app.controller.begin_analyze_similarity();
                app.dispatch(command);
            }
            SimilarityFocus::Preview => app.controller.toggle_code_preview(),
        },
        _ => {}
    }
}

fn handle_history_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => {
            let command = app.controller.begin_load_history();
            app.history_scroll = 0;
            app.dispatch(Some(command));
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.history_scroll = app.history_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.history_scroll = app.history_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_settings_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.settings_row = SettingsRow::Theme,
        KeyCode::Char('k') | KeyCode::Up => app.settings_row = SettingsRow::Language,
        KeyCode::Enter | KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
            match app.settings_row {
                SettingsRow::Language => {
                    let command = app.controller.begin_toggle_language();
                    app.dispatch(Some(command));
                }
                SettingsRow::Theme => {
                    let theme = app.controller.state().theme.toggled();
                    app.controller.change_theme(theme);
                }
            }
        }
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.panel() {
        Panel::Chat => handle_chat_editing(app, key),
        Panel::Help => handle_help_editing(app, key),
        Panel::Similarity => handle_path_editing(app, key),
        // Nothing to edit here
        Panel::History | Panel::Settings => app.input_mode = InputMode::Normal,
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            let input = app.controller.chat_input_mut();
            let byte_pos = char_to_byte_index(input, app.chat_cursor);
            input.insert(byte_pos, '\n');
            app.chat_cursor += 1;
        }
        KeyCode::Enter => app.send_message(),
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.switch_panel(app.panel().next());
        }
        _ => {
            let mut cursor = app.chat_cursor;
            edit_line(app.controller.chat_input_mut(), &mut cursor, key);
            app.chat_cursor = cursor;
        }
    }
}

fn handle_help_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let command = app.controller.begin_search_help();
            app.help_scroll = 0;
            app.dispatch(command);
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.switch_panel(app.panel().next());
        }
        _ => {
            let mut cursor = app.help_cursor;
            edit_line(app.controller.help_input_mut(), &mut cursor, key);
            app.help_cursor = cursor;
        }
    }
}

fn handle_path_editing(app: &mut App, key: KeyEvent) {
    let Some(slot) = app.similarity_focus.slot() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let idx = slot.index();

    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let path = expand_path(app.file_inputs[idx].trim());
            let selected = path.is_some();
            app.preview_scroll = 0;
            let command = app.controller.begin_select_file(slot, path);
            app.dispatch(command);
            if slot == SlotId::First {
                app.similarity_focus = SimilarityFocus::File2;
            } else if selected {
                app.similarity_focus = SimilarityFocus::Analyze;
            }
        }
        _ => {
            edit_line(&mut app.file_inputs[idx], &mut app.file_cursors[idx], key);
        }
    }
}

/// Empty input clears the slot; a leading `~` means the home directory
fn expand_path(input: &str) -> Option<PathBuf> {
    if input.is_empty() {
        return None;
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use cagent_core::state::TranscriptEntry;
    use cagent_core::ChatMessage;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        chord(code, KeyModifiers::NONE)
    }

    fn chord(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key(app, chord(code, modifiers)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[tokio::test]
    async fn test_ctrl_and_alt_digits_switch_panels_in_order() {
        let mut app = test_app();
        assert_eq!(app.input_mode, InputMode::Editing);

        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::ALT] {
            for (digit, panel) in ['1', '2', '3', '4', '5'].into_iter().zip(Panel::ALL) {
                press(&mut app, KeyCode::Char(digit), modifiers);
                assert_eq!(app.panel(), panel, "{:?}+{}", modifiers, digit);
            }
        }
        // Shortcuts never leak into the text fields
        assert!(app.controller.state().chat_input.is_empty());
        assert!(app.controller.state().help_input.is_empty());
    }

    #[tokio::test]
    async fn test_control_chords_are_not_typed() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('w'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('7'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(app.controller.state().chat_input, "");

        press(&mut app, KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(app.controller.state().chat_input, "A");
        assert_eq!(app.chat_cursor, 1);
    }

    #[tokio::test]
    async fn test_enter_sends_chat_message() {
        let mut app = test_app();
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        let state = app.controller.state();
        assert!(state.loading);
        assert!(state.chat_input.is_empty());
        assert_eq!(app.chat_cursor, 0);
        assert_eq!(
            state.transcript.last(),
            Some(&TranscriptEntry::Message(ChatMessage::user("hi")))
        );
    }

    #[tokio::test]
    async fn test_shift_or_alt_enter_inserts_newline() {
        let mut app = test_app();
        type_text(&mut app, "a");
        press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&mut app, "b");
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        type_text(&mut app, "c");

        assert_eq!(app.controller.state().chat_input, "a\nb\nc");
        assert!(!app.controller.state().loading);
        assert_eq!(app.controller.state().transcript, vec![TranscriptEntry::Welcome]);
    }

    #[tokio::test]
    async fn test_enter_in_help_runs_search() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('2'), KeyModifiers::CONTROL);
        assert_eq!(app.panel(), Panel::Help);
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "int");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.controller.state().help_seq.is_pending());
        assert!(app.controller.is_busy());
    }

    #[tokio::test]
    async fn test_path_entry_reads_file_in_background() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('3'), KeyModifiers::ALT);
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Editing);
        type_text(&mut app, "left.c");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(app.controller.state().file_seqs[0].is_pending());
        assert_eq!(app.similarity_focus, SimilarityFocus::File2);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_line_handles_multibyte_text() {
        let mut text = String::new();
        let mut cursor = 0;
        for c in "你好x".chars() {
            edit_line(&mut text, &mut cursor, key(KeyCode::Char(c)));
        }
        assert_eq!(text, "你好x");
        edit_line(&mut text, &mut cursor, key(KeyCode::Left));
        edit_line(&mut text, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(text, "你x");
        assert_eq!(cursor, 1);
        edit_line(&mut text, &mut cursor, key(KeyCode::Delete));
        assert_eq!(text, "你");
        assert!(!edit_line(&mut text, &mut cursor, key(KeyCode::Enter)));
    }

    #[test]
    fn test_edit_line_clamps_stale_cursor() {
        // The controller clears the chat input after sending
        let mut text = String::new();
        let mut cursor = 12;
        edit_line(&mut text, &mut cursor, key(KeyCode::Char('a')));
        assert_eq!(text, "a");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path(""), None);
        assert_eq!(expand_path("src/a.c"), Some(PathBuf::from("src/a.c")));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/a.c"), Some(home.join("a.c")));
        }
    }
}
