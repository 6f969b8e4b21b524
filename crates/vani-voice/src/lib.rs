//! # Vani Voice - Two-Party Voice Translation Session Core
//!
//! This crate implements the turn-taking state machine behind a face-to-face
//! voice translator: two speakers alternate, speech is recognized, translated,
//! logged, and optionally vocalized. Recognition and synthesis are platform
//! capabilities behind traits, so the whole pipeline runs deterministically in
//! tests with no audio hardware.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Translation Session                      │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │
//! │  │  Recognition  │──▶│  Translator   │──▶│ Conversation  │   │
//! │  │    Adapter    │   │ (phrasebook/  │   │      Log      │   │
//! │  │ (platform STT)│   │     API)      │   │ (append-only) │   │
//! │  └───────────────┘   └───────────────┘   └───────┬───────┘   │
//! │          ▲                                       ▼           │
//! │  ┌───────┴───────┐                       ┌───────────────┐   │
//! │  │  Turn State   │◀──── flip speaker ────│   Playback    │   │
//! │  │ Idle/Listen/  │      after handoff    │ (platform TTS)│   │
//! │  │   Process     │                       └───────────────┘   │
//! │  └───────────────┘                                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod language;
pub mod playback;
pub mod recognition;
pub mod session;
pub mod translator;

pub use error::{VaniError, VaniResult};
pub use language::Language;
pub use playback::{PlaceholderSynthesizer, SpeechSynthesizer, SPEECH_RATE};
pub use recognition::{
    RecognitionConfig, ScriptHandle, ScriptedRecognizer, SpeechRecognizer, TranscriptEvent,
    UnsupportedRecognizer,
};
pub use session::{
    SessionConfig, SessionEvent, SessionPhase, Speaker, TranslationSession, Turn,
    SPEAKER_HANDOFF_DELAY,
};
pub use translator::{
    ApiTranslator, PhrasebookTranslator, TranslatorBackend, SIMULATED_LATENCY,
};
