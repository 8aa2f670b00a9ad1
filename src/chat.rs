use crate::error::ApiResult;
use crate::types::{ChatMessage, ChatResponse};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing::warn;

pub const GREETING: &str =
    "Hey! Ich bin dein AI Life Tracker. Sag mir was du tracken willst oder starte ein Workout.";
pub const APOLOGY: &str = "Sorry, da ist etwas schiefgelaufen. Bitte versuche es nochmal.";

const TURN_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]");

#[derive(Clone, Debug, PartialEq)]
pub struct ChatTurn {
    pub id: u64,
    pub message: ChatMessage,
    pub created_at: OffsetDateTime,
}

impl ChatTurn {
    pub fn key(&self) -> String {
        format!("msg-{}", self.id)
    }

    /// Local wall-clock time of the turn, falling back to UTC when the local
    /// offset can't be determined.
    pub fn time_label(&self) -> String {
        let mut datetime = self.created_at;
        if let Ok(offset) = UtcOffset::current_local_offset() {
            datetime = datetime.to_offset(offset);
        }
        datetime.format(TURN_TIME_FORMAT).unwrap_or_default()
    }
}

/// Append-only conversation of one chat screen, with its single-flight guard.
///
/// Turns are appended in the order their triggering action completes. There is
/// no timeout: a request that never settles keeps [`ChatLog::is_sending`] set.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
    sending: bool,
    next_id: u64,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    pub fn new() -> Self {
        let mut log = Self::empty();
        log.push(ChatMessage::assistant(GREETING));
        log
    }

    pub fn empty() -> Self {
        Self {
            turns: Vec::new(),
            sending: false,
            next_id: 1,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Accepts a submission: returns the trimmed text to send, after appending
    /// the user turn. Blank input and submissions while a request is in flight
    /// are ignored.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.sending {
            return None;
        }
        self.push(ChatMessage::user(trimmed));
        self.sending = true;
        Some(trimmed.to_string())
    }

    /// Settles the in-flight request. Failures become a fixed apology turn.
    pub fn complete(&mut self, outcome: ApiResult<ChatResponse>) {
        let message = match outcome {
            Ok(response) => ChatMessage::from(response),
            Err(err) => {
                warn!(error = %err, "chat request failed");
                ChatMessage::assistant(APOLOGY)
            }
        };
        self.push(message);
        self.sending = false;
    }

    fn push(&mut self, message: ChatMessage) {
        let id = self.next_id;
        self.next_id += 1;
        self.turns.push(ChatTurn {
            id,
            message,
            created_at: OffsetDateTime::now_utc(),
        });
    }
}
