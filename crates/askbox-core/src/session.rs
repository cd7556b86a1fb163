//! A chat session: the transcript, the pending flag and the client that
//! feeds them.
//!
//! Sending is split into [`ChatSession::begin`] and [`ChatSession::settle`] so
//! a UI can run the request on a background task and keep redrawing while it
//! is in flight. Every successful `begin` must be followed by exactly one
//! `settle`; that is what keeps user and bot messages paired.

use tracing::{error, info, warn};

use crate::client::AskClient;
use crate::error::SubmitError;
use crate::reply::Reply;
use crate::state::{ChatMessage, Transcript};

pub struct ChatSession {
    client: AskClient,
    transcript: Transcript,
    pending: bool,
}

/// A question that has been recorded in the transcript but not yet sent
#[derive(Debug, Clone)]
pub struct PendingAsk {
    client: AskClient,
    question: String,
}

impl PendingAsk {
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Send the question. Never fails: every outcome maps to a [`Reply`].
    pub async fn send(self) -> Reply {
        let reply = Reply::from_result(self.client.ask(&self.question).await);
        if let Reply::ServerError(diagnostic) = &reply {
            error!(%diagnostic, "request error");
        }
        reply
    }
}

impl ChatSession {
    pub fn new(client: AskClient) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            pending: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn client(&self) -> &AskClient {
        &self.client
    }

    /// Record the user's prompt and mark the session pending.
    ///
    /// Whitespace-only input is rejected without touching the transcript, as
    /// is any input while another request is still in flight.
    pub fn begin(&mut self, input: &str) -> Result<PendingAsk, SubmitError> {
        let question = input.trim();
        if question.is_empty() {
            return Err(SubmitError::Empty);
        }
        if self.pending {
            warn!("submission rejected, request already in flight");
            return Err(SubmitError::Busy);
        }

        self.transcript.append(ChatMessage::user(question));
        self.pending = true;
        info!(messages = self.transcript.len(), "question submitted");

        Ok(PendingAsk {
            client: self.client.clone(),
            question: question.to_string(),
        })
    }

    /// Append the bot's reply and clear the pending flag.
    pub fn settle(&mut self, reply: Reply) {
        if !self.pending {
            warn!("settling a session with no request in flight");
        }
        self.transcript.append(reply.into_message());
        self.pending = false;
    }

    /// `begin`, send and `settle` in one go.
    pub async fn submit(&mut self, input: &str) -> Result<Reply, SubmitError> {
        let pending = self.begin(input)?;
        let reply = pending.send().await;
        self.settle(reply.clone());
        Ok(reply)
    }
}
