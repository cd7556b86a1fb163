use askbox_core::ChatRole;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};

const TITLE: &str = " Personal Chatbot ";
const SUBTITLE: &str = "Ask anything, powered by your generative AI model";
const EMPTY_TRANSCRIPT: &str = "Your conversation will appear here.";
const PLACEHOLDER: &str = "Write your question or prompt here...";
const PRO_TIP: &str = "Pro tip: Try asking for a summary, code snippet, or creative content.";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, prompt, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled(SUBTITLE, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Indexed(54)));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let focused = app.input_mode == InputMode::Normal;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(format!(" {} ", app.session.client().base_url()));

    let transcript = app.session.transcript();
    let text = if transcript.is_empty() && !app.is_pending() {
        Text::from(
            Line::from(Span::styled(EMPTY_TRANSCRIPT, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
        )
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in transcript {
            match msg.role {
                ChatRole::User => {
                    lines.push(
                        Line::from(Span::styled(
                            msg.role.label(),
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        ))
                        .alignment(Alignment::Right),
                    );
                    for line in msg.text.split('\n') {
                        lines.push(
                            Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Cyan)))
                                .alignment(Alignment::Right),
                        );
                    }
                }
                ChatRole::Bot => {
                    lines.push(Line::from(Span::styled(
                        msg.role.label(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    for line in msg.text.split('\n') {
                        lines.push(Line::from(line.to_string()));
                    }
                }
            }
            lines.push(Line::default());
        }

        if app.is_pending() {
            lines.push(Line::from(Span::styled(
                ChatRole::Bot.label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Generating{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.is_pending();
    let editing = app.input_mode == InputMode::Editing;

    let border_color = if pending {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if pending { " Generating... " } else { " Your prompt " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    // Horizontal scroll offset that keeps the cursor visible
    let scroll_offset = if inner_width == 0 || cursor_pos < inner_width {
        0
    } else {
        cursor_pos - inner_width + 1
    };

    let input = if app.input.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let visible: String = app
            .input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(block), area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" PROMPT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let send_label = if app.is_pending() { " generating " } else { " send " };
    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(send_label, label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![Span::styled(mode_text, mode_style), Span::styled(" ", label_style)]
            .into_iter()
            .chain(hints)
            .chain([Span::styled(format!("  {}", PRO_TIP), Style::default().fg(Color::DarkGray))])
            .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}
