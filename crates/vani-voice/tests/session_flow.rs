//! Integration tests for the translation session pipeline.
//!
//! Every backend here is deterministic (scripted recognizer, zero-delay
//! phrasebook), so the full recognize → translate → log → speak → flip flow
//! runs without audio hardware or a network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use vani_voice::{
    Language, PhrasebookTranslator, PlaceholderSynthesizer, RecognitionConfig, ScriptHandle,
    ScriptedRecognizer, SessionConfig, SessionEvent, SessionPhase, Speaker, SpeechRecognizer,
    SpeechSynthesizer, TranscriptEvent, TranslationSession, TranslatorBackend,
    UnsupportedRecognizer, VaniError, VaniResult,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Synthesizer that records what it was asked to vocalize.
#[derive(Clone, Default)]
struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<(String, Language)>>>,
}

impl RecordingSynthesizer {
    fn spoken(&self) -> Vec<(String, Language)> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, text: &str, language: Language) -> VaniResult<()> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), language));
        Ok(())
    }
}

/// Recognizer wrapper that counts stop requests, so tests can observe
/// whether the session asked the adapter to stop.
struct ObservedRecognizer {
    inner: ScriptedRecognizer,
    stops: Arc<AtomicUsize>,
}

impl SpeechRecognizer for ObservedRecognizer {
    fn start(
        &mut self,
        config: RecognitionConfig,
    ) -> VaniResult<mpsc::UnboundedReceiver<TranscriptEvent>> {
        self.inner.start(config)
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.inner.stop();
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}

/// Translator that always fails, for the error-path tests.
struct FailingTranslator;

#[async_trait]
impl TranslatorBackend for FailingTranslator {
    async fn translate(&self, _: &str, _: Language, _: Language) -> VaniResult<String> {
        Err(VaniError::Translation("backend unavailable".to_string()))
    }
}

/// Translator that returns an empty string, which must never reach the log.
struct EmptyTranslator;

#[async_trait]
impl TranslatorBackend for EmptyTranslator {
    async fn translate(&self, _: &str, _: Language, _: Language) -> VaniResult<String> {
        Ok(String::new())
    }
}

fn test_config() -> SessionConfig {
    let mut config = SessionConfig::new(Language::English, Language::Hindi);
    config.handoff_delay = Duration::ZERO;
    config
}

fn phrasebook_session(
    config: SessionConfig,
) -> (
    TranslationSession,
    mpsc::UnboundedReceiver<SessionEvent>,
    ScriptHandle,
    RecordingSynthesizer,
) {
    init_logging();
    let (recognizer, script) = ScriptedRecognizer::new();
    let synthesizer = RecordingSynthesizer::default();
    let (session, events) = TranslationSession::new(
        config,
        Box::new(recognizer),
        Box::new(PhrasebookTranslator::new().with_delay(Duration::ZERO)),
        Box::new(synthesizer.clone()),
    );
    (session, events, script, synthesizer)
}

/// Record one utterance end to end.
async fn speak_once(session: &mut TranslationSession) {
    let rx = session
        .start_listening()
        .expect("start_listening failed")
        .expect("start_listening was a no-op");
    session.drive_recognition(rx).await.expect("drive failed");
}

fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

#[tokio::test]
async fn canned_phrase_turn_logs_and_flips_speaker() {
    let (mut session, mut events, script, synthesizer) = phrasebook_session(test_config());
    script.push_utterance("hello");

    speak_once(&mut session).await;

    let log = session.conversation();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].original_text, "hello");
    assert_eq!(log[0].translated_text, "नमस्ते");
    assert_eq!(log[0].speaker, Speaker::A);
    assert_eq!(log[0].from_lang, Language::English);
    assert_eq!(log[0].to_lang, Language::Hindi);

    assert_eq!(session.active_speaker(), Speaker::B);
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(synthesizer.spoken(), vec![("नमस्ते".to_string(), Language::Hindi)]);

    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::TurnCompleted(t) if t.translated_text == "नमस्ते")));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::SpeakerChanged(Speaker::B))));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::PartialTranscript(p) if p == "hello")));
}

#[tokio::test]
async fn unknown_phrase_logs_fallback_format() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("xyz unknown phrase");

    speak_once(&mut session).await;

    assert_eq!(
        session.conversation()[0].translated_text,
        "[Hindi: xyz unknown phrase]"
    );
}

#[tokio::test]
async fn second_turn_translates_in_the_other_direction() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("hello");
    script.push_utterance("thank you");

    speak_once(&mut session).await; // A: en -> hi
    speak_once(&mut session).await; // B: hi -> en

    let log = session.conversation();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].speaker, Speaker::B);
    assert_eq!(log[1].from_lang, Language::Hindi);
    assert_eq!(log[1].to_lang, Language::English);
    assert_eq!(log[1].translated_text, "Thank you");
    assert_eq!(session.active_speaker(), Speaker::A);
}

#[tokio::test]
async fn turn_ids_are_unique() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("yes");
    script.push_utterance("no");

    speak_once(&mut session).await;
    speak_once(&mut session).await;

    let log = session.conversation();
    assert_ne!(log[0].id, log[1].id);
}

#[tokio::test]
async fn translation_failure_discards_turn_and_resets() {
    init_logging();
    let (recognizer, script) = ScriptedRecognizer::new();
    script.push_utterance("hello");
    let (mut session, mut events) = TranslationSession::new(
        test_config(),
        Box::new(recognizer),
        Box::new(FailingTranslator),
        Box::new(PlaceholderSynthesizer),
    );

    speak_once(&mut session).await;

    assert!(session.conversation().is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.current_partial(), "");
    // Failure does not hand the turn to the other speaker.
    assert_eq!(session.active_speaker(), Speaker::A);

    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Notification { title, .. } if title == "Translation Error")));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SessionEvent::TurnCompleted(_))));
}

#[tokio::test]
async fn empty_translation_never_reaches_the_log() {
    init_logging();
    let (recognizer, script) = ScriptedRecognizer::new();
    script.push_utterance("hello");
    let (mut session, mut events) = TranslationSession::new(
        test_config(),
        Box::new(recognizer),
        Box::new(EmptyTranslator),
        Box::new(PlaceholderSynthesizer),
    );

    speak_once(&mut session).await;

    assert!(session.conversation().is_empty());
    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Notification { title, .. } if title == "Translation Error")));
}

#[tokio::test]
async fn start_listening_while_busy_is_a_noop() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("hello");

    let rx = session.start_listening().unwrap().unwrap();
    assert_eq!(session.phase(), SessionPhase::Listening);

    // Already listening: silently ignored, no second recognition session.
    assert!(session.start_listening().unwrap().is_none());
    assert_eq!(session.phase(), SessionPhase::Listening);
    assert!(session.conversation().is_empty());

    session.drive_recognition(rx).await.unwrap();
    assert_eq!(session.conversation().len(), 1);
}

#[tokio::test]
async fn whitespace_only_final_transcript_is_ignored() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("   ");

    speak_once(&mut session).await;

    assert!(session.conversation().is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.active_speaker(), Speaker::A);
}

#[tokio::test]
async fn stop_without_final_discards_partial() {
    let (mut session, mut events, script, _tts) = phrasebook_session(test_config());
    script.push_abandoned("hello there");

    speak_once(&mut session).await;

    assert!(session.conversation().is_empty());
    assert_eq!(session.current_partial(), "");
    assert_eq!(session.phase(), SessionPhase::Idle);

    let events = drain(&mut events);
    // Interims were surfaced, then the session fell back to idle.
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::PartialTranscript(p) if p == "hello there")));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::ReturnedToIdle)));
}

#[tokio::test]
async fn stop_listening_requests_recognizer_stop_only_while_listening() {
    init_logging();
    let (inner, script) = ScriptedRecognizer::new();
    let stops = Arc::new(AtomicUsize::new(0));
    let (mut session, _events) = TranslationSession::new(
        test_config(),
        Box::new(ObservedRecognizer {
            inner,
            stops: Arc::clone(&stops),
        }),
        Box::new(PhrasebookTranslator::new().with_delay(Duration::ZERO)),
        Box::new(PlaceholderSynthesizer),
    );

    // Idle: nothing to stop.
    session.stop_listening();
    assert_eq!(stops.load(Ordering::SeqCst), 0);
    assert_eq!(session.phase(), SessionPhase::Idle);

    script.push_abandoned("hello there");
    let rx = session.start_listening().unwrap().unwrap();
    assert_eq!(session.phase(), SessionPhase::Listening);

    session.stop_listening();
    assert_eq!(stops.load(Ordering::SeqCst), 1);
    // The transition waits for the recognizer's end-of-session event.
    assert_eq!(session.phase(), SessionPhase::Listening);

    session.drive_recognition(rx).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.conversation().is_empty());
}

#[tokio::test]
async fn recognition_error_notifies_and_keeps_history() {
    let (mut session, mut events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("hello");
    speak_once(&mut session).await;
    assert_eq!(session.conversation().len(), 1);

    script.push_error("microphone unavailable");
    speak_once(&mut session).await;

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.conversation().len(), 1, "history must survive errors");

    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Notification { title, .. } if title == "Speech Recognition Error")));
}

#[tokio::test]
async fn unsupported_platform_surfaces_capability_error() {
    init_logging();
    let (mut session, mut events) = TranslationSession::new(
        test_config(),
        Box::new(UnsupportedRecognizer),
        Box::new(PhrasebookTranslator::new().with_delay(Duration::ZERO)),
        Box::new(PlaceholderSynthesizer),
    );

    let err = session.start_listening().unwrap_err();
    assert!(matches!(err, VaniError::RecognitionUnsupported));
    assert_eq!(session.phase(), SessionPhase::Idle);

    let events = drain(&mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::Notification { title, .. } if title == "Speech Recognition Unavailable")));
}

#[tokio::test]
async fn clear_empties_log_and_recording_still_works() {
    let (mut session, mut events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("hello");
    speak_once(&mut session).await;
    assert_eq!(session.conversation().len(), 1);

    session.clear().unwrap();
    assert!(session.conversation().is_empty());
    assert_eq!(session.current_partial(), "");
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, SessionEvent::HistoryCleared)));

    // A fresh recording after clear still completes a turn.
    script.push_utterance("sorry");
    speak_once(&mut session).await;
    assert_eq!(session.conversation().len(), 1);
    assert_eq!(session.conversation()[0].translated_text, "Sorry"); // B spoke hi -> en
}

#[tokio::test]
async fn clear_while_listening_keeps_the_session_usable() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());
    script.push_utterance("hello");

    let rx = session.start_listening().unwrap().unwrap();
    session.clear().unwrap(); // valid from any state
    session.drive_recognition(rx).await.unwrap();

    // The in-flight turn was not cancelled by the clear.
    assert_eq!(session.conversation().len(), 1);
}

#[tokio::test]
async fn muted_session_logs_but_does_not_speak() {
    let mut config = test_config();
    config.audio_enabled = false;
    let (mut session, _events, script, synthesizer) = phrasebook_session(config);
    script.push_utterance("hello");

    speak_once(&mut session).await;

    assert_eq!(session.conversation().len(), 1);
    assert!(synthesizer.spoken().is_empty());
}

#[tokio::test]
async fn manual_speaker_toggle_only_while_idle() {
    let (mut session, _events, script, _tts) = phrasebook_session(test_config());

    session.set_active_speaker(Speaker::B).unwrap();
    assert_eq!(session.active_speaker(), Speaker::B);
    session.set_active_speaker(Speaker::A).unwrap();

    script.push_utterance("hello");
    let rx = session.start_listening().unwrap().unwrap();
    session.set_active_speaker(Speaker::B).unwrap(); // ignored while listening
    assert_eq!(session.active_speaker(), Speaker::A);
    session.drive_recognition(rx).await.unwrap();
}
