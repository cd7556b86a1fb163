use askbox_core::{ChatSession, Reply, SubmitError};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Rows a message body takes once wrapped to `width` columns
fn wrapped_rows(text: &str, width: usize) -> u16 {
    text.split('\n')
        .map(|line| {
            // Character count, not byte length, for proper UTF-8 handling
            let chars = line.chars().count();
            u16::try_from(chars.div_ceil(width).max(1)).unwrap_or(u16::MAX)
        })
        .fold(0u16, u16::saturating_add)
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Prompt box
    pub input: String,
    pub input_cursor: usize,

    // Conversation
    pub session: ChatSession,
    pub reply_task: Option<JoinHandle<Reply>>,

    // Transcript viewport, updated during render
    pub scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub chat_area: Option<Rect>,

    // 0-2 for ellipsis animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(session: ChatSession) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: String::new(),
            input_cursor: 0,

            session,
            reply_task: None,

            scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,

            animation_frame: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Send the prompt box contents. Blank input does nothing; input typed
    /// while a reply is outstanding stays in the box.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        let pending = self.session.begin(&self.input)?;
        debug!(api_url = self.session.client().base_url(), "dispatching question");

        self.input.clear();
        self.input_cursor = 0;
        self.animation_frame = 0;
        self.reply_task = Some(tokio::spawn(pending.send()));
        self.scroll_to_bottom();
        Ok(())
    }

    /// Resolves once the in-flight request settles; never resolves when
    /// nothing is in flight.
    pub async fn next_reply(&mut self) -> Reply {
        match self.reply_task.as_mut() {
            Some(handle) => match handle.await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("reply task ended abnormally: {}", e);
                    Reply::from_description(e.to_string())
                }
            },
            None => std::future::pending().await,
        }
    }

    pub fn finish_reply(&mut self, reply: Reply) {
        self.reply_task = None;
        self.session.settle(reply);
        self.scroll_to_bottom();
    }

    pub fn quit(&mut self) {
        if let Some(handle) = self.reply_task.take() {
            handle.abort();
        }
        self.should_quit = true;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Prompt editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.insert(byte_pos, c);
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
    }

    // Transcript scrolling
    pub fn transcript_rows(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut rows: u16 = 0;
        for msg in self.session.transcript() {
            // Label line, wrapped body, blank separator
            rows = rows
                .saturating_add(1)
                .saturating_add(wrapped_rows(&msg.text, width))
                .saturating_add(1);
        }
        if self.is_pending() {
            rows = rows.saturating_add(2);
        }
        rows
    }

    fn max_scroll(&self) -> u16 {
        let visible = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.transcript_rows().saturating_sub(visible)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn page_rows(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askbox_core::{AskClient, ChatMessage};

    fn app() -> App {
        App::new(ChatSession::new(AskClient::new("http://127.0.0.1:1")))
    }

    #[test]
    fn editing_is_utf8_safe() {
        let mut app = app();
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.cursor_left();
        app.delete_before_cursor();
        assert_eq!(app.input, "hélo");
        assert_eq!(app.input_cursor, 2);

        app.cursor_home();
        app.delete_at_cursor();
        assert_eq!(app.input, "élo");

        app.cursor_end();
        app.insert_char('!');
        assert_eq!(app.input, "élo!");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app();
        app.cursor_left();
        app.delete_before_cursor();
        assert_eq!(app.input_cursor, 0);

        app.insert_char('a');
        app.cursor_right();
        app.cursor_right();
        assert_eq!(app.input_cursor, 1);
        app.delete_at_cursor();
        assert_eq!(app.input, "a");
    }

    #[test]
    fn blank_submit_keeps_state() {
        let mut app = app();
        app.input = "   ".to_string();
        assert_eq!(app.submit(), Err(SubmitError::Empty));
        assert!(app.session.transcript().is_empty());
        assert!(app.reply_task.is_none());
        assert_eq!(app.input, "   ");
    }

    #[test]
    fn wrapped_rows_counts_chars() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("abcdefghij", 10), 1);
        assert_eq!(wrapped_rows("abcdefghijk", 10), 2);
        assert_eq!(wrapped_rows("ab\ncd", 10), 2);
        assert_eq!(wrapped_rows("ééééé", 5), 1);
        assert_eq!(wrapped_rows(&"x".repeat(100_000), 1), u16::MAX);
    }

    #[tokio::test]
    async fn submit_records_prompt_and_clears_input() {
        let mut app = app();
        app.input = " hello ".to_string();
        app.input_cursor = 7;

        app.submit().unwrap();
        assert!(app.is_pending());
        assert!(app.reply_task.is_some());
        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);
        assert_eq!(app.session.transcript().messages(), &[ChatMessage::user("hello")]);

        let reply = app.next_reply().await;
        app.finish_reply(reply);
        assert!(!app.is_pending());
        assert!(app.reply_task.is_none());
        assert_eq!(app.session.transcript().len(), 2);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut app = app();
        app.chat_height = 5;
        app.chat_width = 20;
        app.scroll_down(10);
        assert_eq!(app.scroll, 0);

        for i in 0..5 {
            app.session.begin(&format!("question {i}")).unwrap();
            app.session.settle(Reply::Answer("answer".to_string()));
        }
        // 10 messages x 3 rows
        assert_eq!(app.transcript_rows(), 30);

        app.scroll_to_bottom();
        assert_eq!(app.scroll, 25);
        app.scroll_down(3);
        assert_eq!(app.scroll, 25);
        app.scroll_up(30);
        assert_eq!(app.scroll, 0);
    }
}
