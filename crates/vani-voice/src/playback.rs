//! **Speech Playback Adapter** — seam over a platform text-to-speech capability.
//!
//! Playback is fire-and-forget: no completion tracking and no queuing
//! guarantees beyond what the platform provides. A failed playback never
//! fails the turn that requested it.

use crate::error::VaniResult;
use crate::language::Language;

/// Speaking rate passed to the platform synthesizer. Slightly below normal
/// speed so translated speech stays intelligible to a non-native listener.
pub const SPEECH_RATE: f32 = 0.9;

/// Platform text-to-speech seam.
pub trait SpeechSynthesizer: Send + Sync {
    /// Vocalize `text` in the given language at [`SPEECH_RATE`]. Returns as
    /// soon as the utterance is handed to the platform.
    fn speak(&self, text: &str, language: Language) -> VaniResult<()>;
}

/// No-op synthesizer: nothing plays. Use when the platform has no TTS or in
/// tests that only exercise the turn pipeline.
#[derive(Debug, Default)]
pub struct PlaceholderSynthesizer;

impl SpeechSynthesizer for PlaceholderSynthesizer {
    fn speak(&self, _text: &str, _language: Language) -> VaniResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_noop() {
        let tts = PlaceholderSynthesizer;
        assert!(tts.speak("नमस्ते", Language::Hindi).is_ok());
    }
}
