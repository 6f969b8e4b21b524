//! **Recognition Adapter** — seam over a platform speech-to-text capability.
//!
//! A recognizer is started with the active speaker's language and emits a
//! stream of [`TranscriptEvent`]s over an unbounded channel: `Started`, zero
//! or more interim transcripts, at most one final transcript, then `Ended`.
//! At most one recognition session may run at a time. A platform without any
//! speech recognition signals [`VaniError::RecognitionUnsupported`] from
//! `start` rather than silently doing nothing.

use crate::error::{VaniError, VaniResult};
use crate::language::Language;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::debug;

/// Per-session recognition settings. Mirrors the platform capability knobs:
/// single utterance, interim results on, one alternative.
#[derive(Debug, Clone, Copy)]
pub struct RecognitionConfig {
    /// Language tag the recognizer listens for.
    pub language: Language,
    /// Keep listening after a final result (default false: one utterance per session).
    pub continuous: bool,
    /// Emit interim (partial) transcripts while the user is still speaking (default true).
    pub interim_results: bool,
    /// Number of alternative transcripts to produce (default 1).
    pub max_alternatives: u32,
}

impl RecognitionConfig {
    /// Default settings for one turn in the given language.
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            continuous: false,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

/// Events emitted by a recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// The session is live and the microphone is open.
    Started,
    /// A transcript chunk. Interim transcripts (`is_final: false`) are
    /// cumulative snapshots; the final one completes the utterance.
    Transcript { text: String, is_final: bool },
    /// The session ended (after a final result, a stop request, or an error).
    Ended,
    /// Permission or hardware failure (e.g. microphone unavailable).
    Error(String),
}

/// Platform speech-to-text seam. Implementations wrap a real capability or a
/// deterministic stand-in; the session core only sees the event stream.
pub trait SpeechRecognizer: Send {
    /// Begin a recognition session. Returns the event stream receiver.
    ///
    /// Errors: [`VaniError::RecognitionUnsupported`] when the platform lacks
    /// the capability, [`VaniError::Recognition`] when a session is already
    /// running.
    fn start(
        &mut self,
        config: RecognitionConfig,
    ) -> VaniResult<mpsc::UnboundedReceiver<TranscriptEvent>>;

    /// Request the current session to stop. The actual end of the session is
    /// observed as a [`TranscriptEvent::Ended`] on the stream, not here.
    fn stop(&mut self);

    /// Whether a session is currently running.
    fn is_active(&self) -> bool;
}

/// A platform with no speech recognition capability. `start` always signals
/// the capability gap so callers can surface it to the user.
#[derive(Debug, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn start(
        &mut self,
        _config: RecognitionConfig,
    ) -> VaniResult<mpsc::UnboundedReceiver<TranscriptEvent>> {
        Err(VaniError::RecognitionUnsupported)
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }
}

enum Script {
    /// A full utterance: interim snapshots, then a final transcript.
    Utterance(String),
    /// An utterance the user abandons: interim snapshots, then `Ended` with no final.
    Abandoned(String),
    /// A session that fails (permission/hardware) right after starting.
    Error(String),
}

/// Feeds utterances to a [`ScriptedRecognizer`]. Clone and keep this around;
/// push before each `start` to decide what the next session "hears".
#[derive(Clone)]
pub struct ScriptHandle {
    queue: Arc<Mutex<VecDeque<Script>>>,
}

impl ScriptHandle {
    /// Queue an utterance for the next session: word-by-word interim
    /// transcripts followed by a final transcript.
    pub fn push_utterance(&self, text: impl Into<String>) {
        self.lock().push_back(Script::Utterance(text.into()));
    }

    /// Queue an utterance that never produces a final transcript (the user
    /// stopped mid-sentence). The session emits interims and then `Ended`.
    pub fn push_abandoned(&self, text: impl Into<String>) {
        self.lock().push_back(Script::Abandoned(text.into()));
    }

    /// Queue a session that fails with a recognition error after starting.
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().push_back(Script::Error(message.into()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Script>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Deterministic recognizer: replays scripted utterances instead of listening
/// to a microphone. Used by tests and by front-ends that turn typed input
/// into "speech". An empty script yields `Started` + `Ended` only.
pub struct ScriptedRecognizer {
    queue: Arc<Mutex<VecDeque<Script>>>,
    active: bool,
}

impl ScriptedRecognizer {
    /// Create a recognizer and the handle used to feed it.
    pub fn new() -> (Self, ScriptHandle) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let handle = ScriptHandle {
            queue: Arc::clone(&queue),
        };
        (
            Self {
                queue,
                active: false,
            },
            handle,
        )
    }

    fn pop(&self) -> Option<Script> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(
        &mut self,
        config: RecognitionConfig,
    ) -> VaniResult<mpsc::UnboundedReceiver<TranscriptEvent>> {
        if self.active {
            return Err(VaniError::Recognition(
                "a recognition session is already running".to_string(),
            ));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let send = |ev: TranscriptEvent| {
            // Receiver may be dropped mid-script; remaining events are moot.
            let _ = tx.send(ev);
        };

        debug!(lang = %config.language, "scripted recognition session started");
        send(TranscriptEvent::Started);

        match self.pop() {
            Some(Script::Utterance(text)) => {
                if config.interim_results {
                    emit_interims(&text, &send);
                }
                send(TranscriptEvent::Transcript {
                    text,
                    is_final: true,
                });
                send(TranscriptEvent::Ended);
            }
            Some(Script::Abandoned(text)) => {
                if config.interim_results {
                    emit_interims(&text, &send);
                }
                send(TranscriptEvent::Ended);
            }
            Some(Script::Error(message)) => {
                send(TranscriptEvent::Error(message));
                send(TranscriptEvent::Ended);
            }
            None => {
                send(TranscriptEvent::Ended);
            }
        }

        self.active = true;
        Ok(rx)
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Cumulative word-by-word interim snapshots, the way live recognizers
/// lengthen the partial transcript as the user speaks.
fn emit_interims(text: &str, send: &impl Fn(TranscriptEvent)) {
    let mut partial = String::new();
    for word in text.split_whitespace() {
        if !partial.is_empty() {
            partial.push(' ');
        }
        partial.push_str(word);
        send(TranscriptEvent::Transcript {
            text: partial.clone(),
            is_final: false,
        });
    }
}
