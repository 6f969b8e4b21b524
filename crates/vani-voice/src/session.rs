//! **Translation Session** — the turn-taking state machine and conversation log.
//!
//! Two speakers alternate: the active speaker records an utterance, the final
//! transcript is translated into the other speaker's language, the completed
//! [`Turn`] is appended to the log, the translation is optionally vocalized,
//! and after a short handoff delay the active speaker flips.
//!
//! The phase enum encodes the core invariant: the session is never listening
//! and processing at the same time.
//!
//! ```text
//!            start_listening()            final transcript
//!   Idle ──────────────────▶ Listening ──────────────────▶ Processing
//!    ▲                          │                              │
//!    │        Ended (no final)  │     translate → log → speak  │
//!    └──────────────────────────┴──── handoff → flip speaker ──┘
//! ```

use crate::error::{VaniError, VaniResult};
use crate::language::Language;
use crate::playback::SpeechSynthesizer;
use crate::recognition::{RecognitionConfig, SpeechRecognizer, TranscriptEvent};
use crate::translator::TranslatorBackend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Pause after a completed turn before the active speaker flips, giving the
/// listener a beat to absorb the translation.
pub const SPEAKER_HANDOFF_DELAY: Duration = Duration::from_secs(1);

/// One of the two conversation roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// The opposite role.
    pub fn other(&self) -> Speaker {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::A => f.write_str("A"),
            Speaker::B => f.write_str("B"),
        }
    }
}

/// One completed speak → translate → display cycle. Immutable once logged;
/// removed only by [`TranslationSession::clear`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique, time-derived id: `<timestamp_millis>-<sequence>`.
    pub id: String,
    pub speaker: Speaker,
    pub original_text: String,
    pub translated_text: String,
    pub timestamp: DateTime<Utc>,
    pub from_lang: Language,
    pub to_lang: Language,
}

/// Session lifecycle phase. At most one of listening/processing holds, by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready; `start_listening` is valid.
    Idle,
    /// A recognition session is live.
    Listening,
    /// A final transcript is being translated and logged.
    Processing,
}

/// Session setup: the two speakers' languages plus playback/pacing knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub speaker_a: Language,
    pub speaker_b: Language,
    /// Vocalize translations when true (default).
    pub audio_enabled: bool,
    /// Delay before the speaker flips after a completed turn.
    pub handoff_delay: Duration,
}

impl SessionConfig {
    /// Config with default playback and pacing.
    pub fn new(speaker_a: Language, speaker_b: Language) -> Self {
        Self {
            speaker_a,
            speaker_b,
            audio_enabled: true,
            handoff_delay: SPEAKER_HANDOFF_DELAY,
        }
    }

    /// Build from environment: `VANI_SPEAKER_A_LANG` and `VANI_SPEAKER_B_LANG`
    /// (language tags, required), `VANI_AUDIO` (`0`/`false`/`off` to mute).
    pub fn from_env() -> VaniResult<Self> {
        let speaker_a = std::env::var("VANI_SPEAKER_A_LANG")
            .map_err(|_| VaniError::Config("VANI_SPEAKER_A_LANG not set".to_string()))?
            .parse()?;
        let speaker_b = std::env::var("VANI_SPEAKER_B_LANG")
            .map_err(|_| VaniError::Config("VANI_SPEAKER_B_LANG not set".to_string()))?
            .parse()?;
        let audio_enabled = std::env::var("VANI_AUDIO")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off"))
            .unwrap_or(true);
        Ok(Self {
            speaker_a,
            speaker_b,
            audio_enabled,
            handoff_delay: SPEAKER_HANDOFF_DELAY,
        })
    }
}

/// Events emitted by the session for the UI to render.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Recognition is live for the given speaker/language.
    ListeningStarted { speaker: Speaker, language: Language },
    /// Interim transcript while the speaker is still talking.
    PartialTranscript(String),
    /// A turn was translated and appended to the log.
    TurnCompleted(Turn),
    /// The active speaker changed (after a turn or a manual toggle).
    SpeakerChanged(Speaker),
    /// The session returned to idle (after a turn, a stop, or an error).
    ReturnedToIdle,
    /// The conversation log was emptied.
    HistoryCleared,
    /// Transient user-visible notice (errors surface here, never as a crash).
    Notification { title: String, detail: String },
}

/// The interactive session: owns the state, the conversation log, and the
/// three capability adapters.
pub struct TranslationSession {
    config: SessionConfig,
    phase: SessionPhase,
    active_speaker: Speaker,
    current_partial: String,
    conversation: Vec<Turn>,
    turn_seq: u64,
    recognizer: Box<dyn SpeechRecognizer>,
    translator: Box<dyn TranslatorBackend>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl TranslationSession {
    /// Create a session and the event stream the UI renders from.
    pub fn new(
        config: SessionConfig,
        recognizer: Box<dyn SpeechRecognizer>,
        translator: Box<dyn TranslatorBackend>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = Self {
            config,
            phase: SessionPhase::Idle,
            active_speaker: Speaker::A,
            current_partial: String::new(),
            conversation: Vec::new(),
            turn_seq: 0,
            recognizer,
            translator,
            synthesizer,
            event_tx,
        };
        (session, event_rx)
    }

    /// Begin recording the active speaker. Valid only while idle; otherwise a
    /// silent no-op returning `Ok(None)`. On success returns the transcript
    /// event stream to feed through [`drive_recognition`](Self::drive_recognition).
    ///
    /// Capability and start failures surface as a [`SessionEvent::Notification`]
    /// and an `Err`; the session stays idle.
    pub fn start_listening(
        &mut self,
    ) -> VaniResult<Option<mpsc::UnboundedReceiver<TranscriptEvent>>> {
        if self.phase != SessionPhase::Idle {
            debug!(phase = ?self.phase, "start_listening ignored while busy");
            return Ok(None);
        }

        let language = self.language_of(self.active_speaker);
        let rx = match self
            .recognizer
            .start(RecognitionConfig::for_language(language))
        {
            Ok(rx) => rx,
            Err(e) => {
                warn!("recognition start failed: {}", e);
                let (title, detail) = match &e {
                    VaniError::RecognitionUnsupported => (
                        "Speech Recognition Unavailable",
                        "This platform has no speech recognition capability.",
                    ),
                    _ => (
                        "Speech Recognition Error",
                        "Could not start recording. Please try again.",
                    ),
                };
                self.notify(title, detail)?;
                return Err(e);
            }
        };

        self.phase = SessionPhase::Listening;
        self.current_partial.clear();
        info!(speaker = %self.active_speaker, lang = %language, "listening");
        Ok(Some(rx))
    }

    /// Request the recognizer to stop. Valid only while listening; the state
    /// transition happens when the stream delivers `Ended`, not here.
    pub fn stop_listening(&mut self) {
        if self.phase == SessionPhase::Listening {
            self.recognizer.stop();
        }
    }

    /// Feed one recognition session's events through the state machine until
    /// the stream closes.
    pub async fn drive_recognition(
        &mut self,
        mut events: mpsc::UnboundedReceiver<TranscriptEvent>,
    ) -> VaniResult<()> {
        while let Some(event) = events.recv().await {
            self.handle_transcript_event(event).await?;
        }
        Ok(())
    }

    /// Advance the state machine by one recognition event.
    pub async fn handle_transcript_event(&mut self, event: TranscriptEvent) -> VaniResult<()> {
        match event {
            TranscriptEvent::Started => {
                if self.phase == SessionPhase::Listening {
                    self.emit(SessionEvent::ListeningStarted {
                        speaker: self.active_speaker,
                        language: self.language_of(self.active_speaker),
                    })?;
                }
            }
            TranscriptEvent::Transcript {
                text,
                is_final: false,
            } => {
                if self.phase == SessionPhase::Listening {
                    self.current_partial = text.clone();
                    self.emit(SessionEvent::PartialTranscript(text))?;
                }
            }
            TranscriptEvent::Transcript {
                text,
                is_final: true,
            } => {
                self.complete_turn(text).await?;
            }
            TranscriptEvent::Ended => {
                self.recognizer.stop();
                // A stop without a final transcript discards the partial.
                if self.phase == SessionPhase::Listening {
                    self.phase = SessionPhase::Idle;
                    self.current_partial.clear();
                    debug!("recognition ended without a final transcript");
                    self.emit(SessionEvent::ReturnedToIdle)?;
                }
            }
            TranscriptEvent::Error(message) => {
                warn!("recognition error: {}", message);
                self.recognizer.stop();
                self.phase = SessionPhase::Idle;
                self.current_partial.clear();
                self.notify(
                    "Speech Recognition Error",
                    "Please check microphone permissions and try again.",
                )?;
                self.emit(SessionEvent::ReturnedToIdle)?;
            }
        }
        Ok(())
    }

    /// Translate a final transcript, log the turn, optionally vocalize, then
    /// hand off to the other speaker. Failures notify and reset to idle; the
    /// already-logged history is untouched.
    async fn complete_turn(&mut self, original: String) -> VaniResult<()> {
        if original.trim().is_empty() {
            return Ok(());
        }

        self.phase = SessionPhase::Processing;
        let from = self.language_of(self.active_speaker);
        let to = self.language_of(self.active_speaker.other());
        info!(speaker = %self.active_speaker, %from, %to, "translating turn");

        let result = self.translator.translate(&original, from, to).await;
        match result {
            Ok(translated) if !translated.trim().is_empty() => {
                let timestamp = Utc::now();
                self.turn_seq += 1;
                let turn = Turn {
                    id: format!("{}-{}", timestamp.timestamp_millis(), self.turn_seq),
                    speaker: self.active_speaker,
                    original_text: original,
                    translated_text: translated.clone(),
                    timestamp,
                    from_lang: from,
                    to_lang: to,
                };
                self.conversation.push(turn.clone());
                self.emit(SessionEvent::TurnCompleted(turn))?;

                if self.config.audio_enabled {
                    // Fire-and-forget: playback trouble never undoes the turn.
                    if let Err(e) = self.synthesizer.speak(&translated, to) {
                        warn!("speech playback failed: {}", e);
                    }
                }

                tokio::time::sleep(self.config.handoff_delay).await;
                self.active_speaker = self.active_speaker.other();
                info!(speaker = %self.active_speaker, "speaker handoff");
                self.emit(SessionEvent::SpeakerChanged(self.active_speaker))?;
            }
            Ok(_) => {
                warn!("translator returned an empty result; turn discarded");
                self.notify("Translation Error", "Translator returned an empty result.")?;
            }
            Err(e) => {
                warn!("translation failed: {}", e);
                self.notify("Translation Error", "Failed to translate. Please try again.")?;
            }
        }

        self.phase = SessionPhase::Idle;
        self.current_partial.clear();
        self.emit(SessionEvent::ReturnedToIdle)?;
        Ok(())
    }

    /// Empty the conversation log and partial text. Valid from any state;
    /// does not stop an in-flight recognition or translation.
    pub fn clear(&mut self) -> VaniResult<()> {
        self.conversation.clear();
        self.current_partial.clear();
        self.emit(SessionEvent::HistoryCleared)
    }

    /// Manually select the active speaker. Honored only while idle (the
    /// record/processing flow owns the speaker otherwise); silent no-op else.
    pub fn set_active_speaker(&mut self, speaker: Speaker) -> VaniResult<()> {
        if self.phase != SessionPhase::Idle {
            debug!(phase = ?self.phase, "speaker toggle ignored while busy");
            return Ok(());
        }
        if speaker != self.active_speaker {
            self.active_speaker = speaker;
            self.emit(SessionEvent::SpeakerChanged(speaker))?;
        }
        Ok(())
    }

    /// Enable or disable translated-speech playback.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.config.audio_enabled = enabled;
    }

    /// The language a given speaker talks in.
    pub fn language_of(&self, speaker: Speaker) -> Language {
        match speaker {
            Speaker::A => self.config.speaker_a,
            Speaker::B => self.config.speaker_b,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn active_speaker(&self) -> Speaker {
        self.active_speaker
    }

    pub fn is_listening(&self) -> bool {
        self.phase == SessionPhase::Listening
    }

    pub fn is_processing(&self) -> bool {
        self.phase == SessionPhase::Processing
    }

    pub fn audio_enabled(&self) -> bool {
        self.config.audio_enabled
    }

    /// The interim transcript of the utterance in progress, if any.
    pub fn current_partial(&self) -> &str {
        &self.current_partial
    }

    /// The append-only conversation log, oldest turn first.
    pub fn conversation(&self) -> &[Turn] {
        &self.conversation
    }

    fn notify(&self, title: &str, detail: &str) -> VaniResult<()> {
        self.emit(SessionEvent::Notification {
            title: title.to_string(),
            detail: detail.to_string(),
        })
    }

    fn emit(&self, event: SessionEvent) -> VaniResult<()> {
        self.event_tx
            .send(event)
            .map_err(|e| VaniError::ChannelSend(e.to_string()))
    }
}
