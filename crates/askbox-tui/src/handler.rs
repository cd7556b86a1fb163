use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

const WHEEL_ROWS: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(app.page_rows()),
        KeyCode::PageUp => app.scroll_up(app.page_rows()),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(app.page_rows())
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(app.page_rows())
        }
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => {
            if let Err(e) = app.submit() {
                debug!("prompt not sent: {}", e);
            }
        }
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::PageDown => app.scroll_down(app.page_rows()),
        KeyCode::PageUp => app.scroll_up(app.page_rows()),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL_ROWS),
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL_ROWS),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askbox_core::{AskClient, ChatMessage, ChatSession, Reply};
    use crossterm::event::KeyEventState;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    fn app_for(url: &str) -> App {
        App::new(ChatSession::new(AskClient::new(url)))
    }

    #[tokio::test]
    async fn enter_sends_typed_prompt() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({ "question": "tell me a joke" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "_status": true, "_finalData": "knock knock" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut app = app_for(&mock_server.uri());
        type_text(&mut app, "tell me a joke");
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.is_pending());

        let reply = app.next_reply().await;
        app.finish_reply(reply);

        assert_eq!(
            app.session.transcript().messages(),
            &[ChatMessage::user("tell me a joke"), ChatMessage::bot("knock knock")]
        );
        assert!(!app.is_pending());
    }

    #[tokio::test]
    async fn enter_while_pending_keeps_input() {
        let mut app = app_for("http://127.0.0.1:1");
        type_text(&mut app, "first");
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.is_pending());

        type_text(&mut app, "second");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.input, "second");
        assert_eq!(app.session.transcript().len(), 1);

        let reply = app.next_reply().await;
        assert!(matches!(reply, Reply::ServerError(_)));
        app.finish_reply(reply);

        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.input.is_empty());
        assert_eq!(app.session.transcript().len(), 3);
        let reply = app.next_reply().await;
        app.finish_reply(reply);
        assert_eq!(app.session.transcript().len(), 4);
    }

    #[test]
    fn whitespace_enter_is_noop() {
        let mut app = app_for("http://127.0.0.1:1");
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.session.transcript().is_empty());
        assert!(!app.is_pending());
        assert!(app.reply_task.is_none());
    }

    #[test]
    fn esc_then_q_quits() {
        let mut app = app_for("http://127.0.0.1:1");
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_while_editing() {
        let mut app = app_for("http://127.0.0.1:1");
        handle_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn normal_mode_i_resumes_editing() {
        let mut app = app_for("http://127.0.0.1:1");
        handle_event(&mut app, key(KeyCode::Esc));
        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn tick_animates_only_while_pending() {
        let mut app = app_for("http://127.0.0.1:1");
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);

        app.session.begin("hi").unwrap();
        handle_event(&mut app, AppEvent::Tick);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 2);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);
    }

    #[test]
    fn mouse_wheel_outside_chat_is_ignored() {
        let mut app = app_for("http://127.0.0.1:1");
        app.chat_area = Some(Rect::new(0, 0, 10, 10));
        app.scroll = 0;
        handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::ScrollUp,
                column: 20,
                row: 20,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.scroll, 0);
        assert!(point_in_rect(3, 3, Rect::new(0, 0, 10, 10)));
        assert!(!point_in_rect(10, 3, Rect::new(0, 0, 10, 10)));
    }
}
