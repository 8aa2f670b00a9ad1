//! Voice capture: a two-state session over the platform speech recognizer.
//!
//! The recognizer itself runs in the webview (see [`bridge`]); this module
//! only keeps the state the UI renders and decides which transcript may be
//! submitted to the chat.

pub mod bridge;

use crate::error::VoiceError;
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceState {
    #[default]
    Idle,
    Listening,
}

/// Events posted by the platform recognizer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecognitionEvent {
    Started,
    Result { index: u32, transcript: String },
    Error { error: String },
    End,
    Unsupported,
}

impl RecognitionEvent {
    /// After these the platform session is gone.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::Error { .. } | RecognitionEvent::End | RecognitionEvent::Unsupported
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoiceSession {
    state: VoiceState,
    transcript: String,
    error: Option<VoiceError>,
    /// Generation of the current (or last) recognition session.
    session: u64,
    /// Session the current transcript was recognized in.
    captured_in: Option<u64>,
    /// Session that just ended cleanly and whose transcript may be forwarded.
    ended: Option<u64>,
}

impl VoiceSession {
    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn error(&self) -> Option<&VoiceError> {
        self.error.as_ref()
    }

    /// Request a new session. Returns its id when the platform recognizer
    /// should actually be started; `None` if unsupported or already listening.
    pub fn start(&mut self, supported: bool) -> Option<u64> {
        if !supported {
            self.error = Some(VoiceError::Unsupported);
            return None;
        }
        if self.is_listening() {
            return None;
        }
        self.session += 1;
        self.state = VoiceState::Listening;
        self.error = None;
        self.ended = None;
        debug!(session = self.session, "voice session started");
        Some(self.session)
    }

    /// Apply a platform event. Events from an earlier session are dropped.
    pub fn handle(&mut self, session: u64, event: RecognitionEvent) {
        if session != self.session {
            return;
        }
        match event {
            RecognitionEvent::Started => {
                if self.is_listening() {
                    self.error = None;
                }
            }
            RecognitionEvent::Result { transcript, .. } => {
                if self.is_listening() {
                    self.transcript = transcript;
                    self.captured_in = Some(session);
                }
            }
            RecognitionEvent::Error { error } => {
                debug!(session, %error, "voice session failed");
                self.state = VoiceState::Idle;
                self.error = Some(VoiceError::Recognition(error));
                self.ended = None;
            }
            RecognitionEvent::End => {
                if self.is_listening() {
                    self.state = VoiceState::Idle;
                    self.ended = Some(session);
                }
            }
            RecognitionEvent::Unsupported => {
                self.state = VoiceState::Idle;
                self.error = Some(VoiceError::Unsupported);
                self.ended = None;
            }
        }
    }

    /// Explicit stop. Returns whether the platform recognizer must be told.
    pub fn stop(&mut self) -> bool {
        if !self.is_listening() {
            return false;
        }
        self.state = VoiceState::Idle;
        self.ended = Some(self.session);
        true
    }

    /// The transcript of the session that just ended, at most once, and only
    /// if that session produced it. A session ends through an explicit stop or
    /// when the recognizer stops on its own after a pause; both forward the
    /// transcript so a hands-free utterance reaches the chat. A failed session
    /// forwards nothing.
    pub fn take_forwardable(&mut self) -> Option<String> {
        let ended = self.ended.take()?;
        if self.captured_in != Some(ended) || self.transcript.trim().is_empty() {
            return None;
        }
        self.captured_in = None;
        Some(self.transcript.clone())
    }
}
