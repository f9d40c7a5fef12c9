use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};
use cagent_core::format::{parse_message, Segment};
use cagent_core::state::{
    ChatRole, HelpView, HistoryView, PreviewIcon, Severity, SimilarityView, TranscriptEntry,
};
use cagent_core::{InputField, LabelKey, Message, Panel, SlotId, Theme};

use crate::app::{App, InputMode, SettingsRow, SimilarityFocus};

/// Colours for one theme
#[derive(Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    user: Color,
    assistant: Color,
    code: Color,
    focus: Color,
    border: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            user: Color::Blue,
            assistant: Color::Magenta,
            code: Color::Red,
            focus: Color::Blue,
            border: Color::Gray,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            user: Color::Cyan,
            assistant: Color::Yellow,
            code: Color::LightGreen,
            focus: Color::Yellow,
            border: Color::DarkGray,
        },
    }
}

/// Turn an assistant reply into styled lines; code blocks get a frame with their language
fn message_lines(content: &str, p: Palette) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(p.fg);
    let code_style = Style::default().fg(p.code);
    let frame_style = Style::default().fg(p.muted);

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut after_block = false;

    for segment in parse_message(content) {
        match segment {
            Segment::Text(text) => {
                current.push(Span::styled(text, text_style));
                after_block = false;
            }
            Segment::InlineCode(code) => {
                current.push(Span::styled(code, code_style.add_modifier(Modifier::BOLD)));
                after_block = false;
            }
            Segment::LineBreak => {
                // The break right after a block only ends the block's line
                if !(after_block && current.is_empty()) {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
                after_block = false;
            }
            Segment::CodeBlock { language, code } => {
                if !current.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
                lines.push(Line::from(Span::styled(format!("┌─ {} ", language), frame_style)));
                for code_line in code.lines() {
                    lines.push(Line::from(vec![
                        Span::styled("│ ", frame_style),
                        Span::styled(code_line.to_string(), code_style),
                    ]));
                }
                lines.push(Line::from(Span::styled("└─", frame_style)));
                after_block = true;
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// Rows the lines occupy once wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width) as u16)
        .fold(0u16, |acc, rows| acc.saturating_add(rows))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let p = palette(app.controller.state().theme);

    frame.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), area);

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area, p);

    match app.panel() {
        Panel::Chat => render_chat(app, frame, body_area, p),
        Panel::Help => render_help(app, frame, body_area, p),
        Panel::Similarity => render_similarity(app, frame, body_area, p),
        Panel::History => render_history(app, frame, body_area, p),
        Panel::Settings => render_settings(app, frame, body_area, p),
    }

    render_footer(app, frame, footer_area);

    if app.controller.is_busy() && app.panel() != Panel::Chat {
        render_busy(app, frame, body_area, p);
    }
    render_notification(app, frame, body_area, p);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect, p: Palette) {
    let controller = &app.controller;
    let caption = format!(" {} ", controller.language_caption());
    let [tabs_area, lang_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(Span::raw(caption.as_str()).width() as u16 + 2),
    ])
    .areas(area);

    let titles: Vec<Line> = Panel::ALL
        .iter()
        .enumerate()
        .map(|(i, panel)| Line::from(format!("{} {}", i + 1, controller.label(panel.nav_label()))))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.panel().index())
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(p.accent).bold())
        .divider("|");
    frame.render_widget(tabs, tabs_area);

    let lang = Paragraph::new(Line::from(Span::styled(caption, Style::default().fg(Color::White).bold())))
        .alignment(Alignment::Right)
        .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(lang, lang_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.panel(), app.input_mode) {
        (Panel::Chat, InputMode::Editing) => vec![("Enter", "send"), ("S-Enter", "newline"), ("Esc", "normal")],
        (Panel::Help, InputMode::Editing) => vec![("Enter", "search"), ("Esc", "normal")],
        (Panel::Similarity, InputMode::Editing) => vec![("Enter", "select file"), ("Esc", "cancel")],
        (Panel::Chat, _) => vec![("i", "type"), ("j/k", "scroll"), ("G", "follow")],
        (Panel::Help, _) => vec![("i", "type"), ("j/k", "scroll")],
        (Panel::Similarity, _) => vec![
            ("j/k", "move"),
            ("Enter", "edit/run"),
            ("x", "clear"),
            ("a", "analyze"),
            ("p", "preview"),
            ("J/K", "scroll"),
        ],
        (Panel::History, _) => vec![("r", "refresh"), ("j/k", "scroll")],
        (Panel::Settings, _) => vec![("j/k", "move"), ("Enter", "change")],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }
    spans.extend([
        Span::styled(" ^1-5 ", key_style),
        Span::styled(" panel ", label_style),
        Span::styled(" ^L ", key_style),
        Span::styled(" language ", label_style),
        Span::styled(" ^C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel_heading(title: &str, subtitle: &str, p: Palette) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(title.to_string(), Style::default().fg(p.accent).bold())),
        Line::from(Span::styled(subtitle.to_string(), Style::default().fg(p.muted))),
    ])
}

/// Single-line input with horizontal scrolling; shows the placeholder when empty
#[allow(clippy::too_many_arguments)]
fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    text: &str,
    placeholder: &str,
    cursor: usize,
    editing: bool,
    focused: bool,
    p: Palette,
) {
    let border = if editing || focused { p.focus } else { p.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title));

    let inner_width = area.width.saturating_sub(2) as usize;
    let shown: String = text.chars().map(|c| if c == '\n' { '⏎' } else { c }).collect();
    let cursor = cursor.min(shown.chars().count());

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor >= inner_width {
        cursor - inner_width + 1
    } else {
        0
    };

    let paragraph = if shown.is_empty() {
        Paragraph::new(Span::styled(placeholder.to_string(), Style::default().fg(p.muted).italic()))
    } else {
        let visible: String = shown.chars().skip(scroll_offset).take(inner_width).collect();
        Paragraph::new(Span::styled(visible, Style::default().fg(p.user)))
    };
    frame.render_widget(paragraph.block(block), area);

    if editing {
        let before: String = shown.chars().skip(scroll_offset).take(cursor - scroll_offset).collect();
        let cursor_x = Span::raw(before).width() as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect, p: Palette) {
    let [heading_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let controller = &app.controller;
    frame.render_widget(
        panel_heading(controller.label(LabelKey::ChatTitle), controller.label(LabelKey::ChatSubtitle), p),
        heading_area,
    );

    let user_header = Line::from(Span::styled("You:", Style::default().fg(p.user).add_modifier(Modifier::BOLD)));
    let bot_header = Line::from(Span::styled("Lynn:", Style::default().fg(p.assistant).add_modifier(Modifier::BOLD)));

    let mut lines: Vec<Line> = Vec::new();
    for entry in &controller.state().transcript {
        match entry {
            TranscriptEntry::Welcome => {
                lines.push(bot_header.clone());
                lines.push(Line::from(controller.label(LabelKey::WelcomeMessage)));
            }
            TranscriptEntry::Message(msg) => match msg.role {
                ChatRole::User => {
                    lines.push(user_header.clone());
                    lines.extend(msg.content.lines().map(|l| Line::from(l.to_string())));
                }
                ChatRole::Assistant => {
                    lines.push(bot_header.clone());
                    lines.extend(message_lines(&msg.content, p));
                }
            },
        }
        lines.push(Line::default());
    }

    if controller.state().loading {
        lines.push(bot_header.clone());
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", controller.text(Message::Thinking), dots),
            Style::default().fg(p.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.input_mode == InputMode::Normal { p.focus } else { p.border }));
    let inner_height = chat_area.height.saturating_sub(2);
    let total = wrapped_height(&lines, chat_area.width.saturating_sub(2));
    let max_scroll = total.saturating_sub(inner_height);
    if app.chat_follow {
        app.chat_scroll = max_scroll;
    }
    app.chat_scroll = app.chat_scroll.min(max_scroll);

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let controller = &app.controller;
    let send_hint = if controller.send_enabled() { "⏎" } else { "·" };
    render_input(
        frame,
        input_area,
        &format!("{} {}", controller.label(LabelKey::NavChat), send_hint),
        &controller.state().chat_input,
        controller.placeholder(InputField::Chat),
        app.chat_cursor,
        app.input_mode == InputMode::Editing,
        false,
        p,
    );
}

fn render_help(app: &mut App, frame: &mut Frame, area: Rect, p: Palette) {
    let [heading_area, input_area, results_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let controller = &app.controller;
    frame.render_widget(
        panel_heading(controller.label(LabelKey::HelpTitle), controller.label(LabelKey::HelpSubtitle), p),
        heading_area,
    );

    render_input(
        frame,
        input_area,
        controller.label(LabelKey::NavHelp),
        &controller.state().help_input,
        controller.placeholder(InputField::Help),
        app.help_cursor,
        app.input_mode == InputMode::Editing,
        false,
        p,
    );

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border));

    let lines: Vec<Line> = match &controller.state().help_view {
        HelpView::Placeholder => vec![Line::from(Span::styled(
            controller.label(LabelKey::HelpPlaceholder),
            Style::default().fg(p.muted),
        ))],
        HelpView::NoResults(message) => vec![Line::from(Span::styled(
            format!("! {}", message),
            Style::default().fg(p.muted),
        ))],
        HelpView::Results { entries, kind } => {
            if let Some(kind) = kind {
                block = block.title(format!(" {} ", kind));
            }
            let mut lines = Vec::new();
            for (keyword, description) in entries {
                lines.push(Line::from(Span::styled(
                    keyword.clone(),
                    Style::default().fg(p.code).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("  {}", description)));
            }
            lines
        }
    };

    let results = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));
    frame.render_widget(results, results_area);
}

fn render_similarity(app: &mut App, frame: &mut Frame, area: Rect, p: Palette) {
    let controller = &app.controller;
    let preview_height = if controller.state().preview_visible {
        Constraint::Min(6)
    } else {
        Constraint::Length(0)
    };
    let [heading_area, file1_area, file2_area, buttons_area, result_area, preview_area] =
        Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
            preview_height,
        ])
        .areas(area);

    frame.render_widget(
        panel_heading(
            controller.label(LabelKey::SimilarityTitle),
            controller.label(LabelKey::SimilaritySubtitle),
            p,
        ),
        heading_area,
    );

    for (slot, file_area, key) in [
        (SlotId::First, file1_area, LabelKey::UploadFile1),
        (SlotId::Second, file2_area, LabelKey::UploadFile2),
    ] {
        let idx = slot.index();
        let focused = app.similarity_focus.slot() == Some(slot);
        let title = match controller.file_info(slot) {
            Some(info) => format!("{} · {}", controller.label(key), info),
            None => controller.label(key).to_string(),
        };
        render_input(
            frame,
            file_area,
            &title,
            &app.file_inputs[idx],
            "path/to/file.c",
            app.file_cursors[idx],
            focused && app.input_mode == InputMode::Editing,
            focused,
            p,
        );
    }

    let button = |text: String, enabled: bool, focused: bool| {
        let mut style = if enabled {
            Style::default().fg(p.fg).bold()
        } else {
            Style::default().fg(p.muted)
        };
        if focused {
            style = style.bg(p.focus).fg(p.bg);
        }
        Span::styled(format!("[ {} ]", text), style)
    };
    let toggle = controller.preview_toggle();
    let icon = match toggle.icon {
        PreviewIcon::Eye => "◉",
        PreviewIcon::EyeSlash => "◌",
    };
    let buttons = Line::from(vec![
        button(
            controller.label(LabelKey::AnalyzeBtn).to_string(),
            controller.analyze_enabled(),
            app.similarity_focus == SimilarityFocus::Analyze,
        ),
        Span::raw("  "),
        button(
            format!("{} {}", icon, toggle.caption),
            true,
            app.similarity_focus == SimilarityFocus::Preview,
        ),
    ]);
    frame.render_widget(Paragraph::new(buttons), buttons_area);

    if let SimilarityView::Result { percentage, file1, file2 } = &controller.state().similarity_view {
        let card = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(format!("{}%", percentage), Style::default().fg(p.accent).bold()),
                Span::raw("  "),
                Span::styled(controller.text(Message::SimilarityCaption), Style::default().fg(p.muted)),
            ]),
            Line::from(vec![
                Span::raw(file1.clone()),
                Span::styled("  VS  ", Style::default().fg(p.assistant).bold()),
                Span::raw(file2.clone()),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(p.border)));
        frame.render_widget(card, result_area);
    }

    if controller.state().preview_visible && preview_area.height > 0 {
        render_code_preview(app, frame, preview_area, p);
    }
}

fn render_code_preview(app: &App, frame: &mut Frame, area: Rect, p: Palette) {
    let controller = &app.controller;
    let outer = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(p.border))
        .title(format!(" {} ", controller.label(LabelKey::CodePreviewTitle)));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    for (slot, column, key) in [
        (SlotId::First, left, LabelKey::File1Preview),
        (SlotId::Second, right, LabelKey::File2Preview),
    ] {
        let file = controller.state().files.get(slot);
        let name = file.map(|f| f.name.as_str()).unwrap_or_default();
        let content = file.and_then(|f| f.content.as_deref()).unwrap_or_default();
        let lines: Vec<Line> = content
            .lines()
            .enumerate()
            .map(|(n, line)| {
                Line::from(vec![
                    Span::styled(format!("{:>4} ", n + 1), Style::default().fg(p.muted)),
                    Span::styled(line.replace('\t', "    "), Style::default().fg(p.code)),
                ])
            })
            .collect();
        let column_widget = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(p.border))
                    .title(format!(" {}: {} ", controller.label(key), name)),
            )
            .scroll((app.preview_scroll, 0));
        frame.render_widget(column_widget, column);
    }
}

fn render_history(app: &mut App, frame: &mut Frame, area: Rect, p: Palette) {
    let controller = &app.controller;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(format!(" {} ", controller.label(LabelKey::HistoryTitle)))
        .title_bottom(format!(" r: {} ", controller.label(LabelKey::Refresh)));

    let muted = Style::default().fg(p.muted);
    let lines: Vec<Line> = match &controller.state().history_view {
        HistoryView::Idle => Vec::new(),
        HistoryView::Loading => vec![Line::from(Span::styled(controller.label(LabelKey::Loading), muted))],
        HistoryView::Empty => vec![Line::from(Span::styled(controller.text(Message::HistoryEmpty), muted))],
        HistoryView::Failed(msg) => vec![Line::from(Span::styled(
            format!("! {}", controller.text(*msg)),
            Style::default().fg(Color::Red),
        ))],
        HistoryView::Entries(entries) => entries
            .iter()
            .map(|entry| Line::from(vec![Span::styled("• ", muted), Span::raw(entry.clone())]))
            .collect(),
    };

    let history = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.history_scroll, 0));
    frame.render_widget(history, area);
}

fn render_settings(app: &mut App, frame: &mut Frame, area: Rect, p: Palette) {
    let controller = &app.controller;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border))
        .title(format!(" {} ", controller.label(LabelKey::SettingsTitle)));

    let row = |label: &str, value: &str, selected: bool| {
        let marker = if selected { "> " } else { "  " };
        let value_style = if selected {
            Style::default().fg(p.bg).bg(p.focus).bold()
        } else {
            Style::default().fg(p.accent)
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<20}", label), Style::default().fg(p.fg)),
            Span::styled(format!("< {} >", value), value_style),
        ])
    };

    let lines = vec![
        Line::default(),
        row(
            controller.label(LabelKey::LanguageSetting),
            controller.language_caption(),
            app.settings_row == SettingsRow::Language,
        ),
        Line::default(),
        row(
            controller.label(LabelKey::ThemeSetting),
            controller.state().theme.as_str(),
            app.settings_row == SettingsRow::Theme,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Helper to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_busy(app: &App, frame: &mut Frame, area: Rect, p: Palette) {
    let text = app.controller.label(LabelKey::Processing);
    let popup = centered_rect(Span::raw(text).width() as u16 + 6, 3, area);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(Span::styled(text, Style::default().fg(p.accent).bold()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(p.accent)))
        .style(Style::default().bg(p.bg));
    frame.render_widget(widget, popup);
}

fn render_notification(app: &App, frame: &mut Frame, area: Rect, p: Palette) {
    let Some(notification) = &app.controller.state().notification else {
        return;
    };

    let color = match notification.severity {
        Severity::Info => Color::Blue,
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    };
    let width = (Span::raw(notification.message.as_str()).width() as u16 + 4)
        .max(20)
        .min(area.width.saturating_sub(2).max(1));
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y,
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(Span::styled(notification.message.clone(), Style::default().fg(p.fg)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title_bottom(Line::from(" Esc ").right_aligned()),
        )
        .style(Style::default().bg(p.bg));
    frame.render_widget(widget, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_message_lines_frame_code_blocks() {
        let lines = message_lines("Try this:\n```c\nint x = 1;\nx++;\n```\nDone", palette(Theme::Dark));
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec!["Try this:", "┌─ c ", "│ int x = 1;", "│ x++;", "└─", "Done"]
        );
    }

    #[test]
    fn test_message_lines_keep_inline_code_on_line() {
        let lines = message_lines("call `printf` here", palette(Theme::Light));
        assert_eq!(lines.len(), 1);
        assert_eq!(plain(&lines[0]), "call printf here");
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("abcdefghij"), Line::default(), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 20), 3);
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 10, 4);
        let rect = centered_rect(40, 3, area);
        assert_eq!(rect.width, 10);
        assert_eq!(rect.height, 3);
    }

    #[test]
    fn test_notification_fits_narrow_terminal() {
        let mut app = test_app();
        app.controller.notify("hi", Severity::Info);
        let screen = draw(&mut app, 18, 10);
        assert!(screen.contains("hi"));
    }

    #[test]
    fn test_every_panel_renders_in_tiny_and_normal_sizes() {
        let mut app = test_app();
        app.controller.notify("a rather long notification message", Severity::Error);
        for panel in Panel::ALL {
            // The history refresh command is dropped; no server here
            let _ = app.controller.begin_switch_tab(panel);
            for (width, height) in [(18, 10), (40, 8), (80, 24)] {
                draw(&mut app, width, height);
            }
        }
    }

    #[test]
    fn test_header_and_footer_reflect_state() {
        let mut app = test_app();
        let screen = draw(&mut app, 80, 24);
        // Wide glyphs are followed by a padding cell, so look for single characters
        assert!(screen.contains('中'));
        assert!(screen.contains(" EDIT "));
    }
}
