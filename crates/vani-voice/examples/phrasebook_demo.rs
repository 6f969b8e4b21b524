//! Phrasebook Demo — scripted end-to-end run of the translation session.
//!
//! Replays three utterances through the full recognize → translate → log →
//! speak → flip pipeline with the deterministic backends, printing each
//! completed turn. No microphone, network, or API keys required.

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vani_voice::{
    Language, PhrasebookTranslator, PlaceholderSynthesizer, ScriptedRecognizer, SessionConfig,
    SessionEvent, TranslationSession,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Phrasebook Demo — English speaker A, Hindi speaker B");

    let (recognizer, script) = ScriptedRecognizer::new();
    script.push_utterance("hello");
    script.push_utterance("how are you");
    script.push_utterance("i am fine");

    let config = SessionConfig::new(Language::English, Language::Hindi);
    let (mut session, mut events) = TranslationSession::new(
        config,
        Box::new(recognizer),
        Box::new(PhrasebookTranslator::new()),
        Box::new(PlaceholderSynthesizer),
    );

    for _ in 0..3 {
        if let Some(rx) = session.start_listening()? {
            session.drive_recognition(rx).await?;
        }
        while let Ok(event) = events.try_recv() {
            if let SessionEvent::TurnCompleted(turn) = event {
                info!(
                    "Speaker {} [{}] \"{}\" -> [{}] \"{}\"",
                    turn.speaker,
                    turn.from_lang.name(),
                    turn.original_text,
                    turn.to_lang.name(),
                    turn.translated_text
                );
            }
        }
    }

    info!("Conversation log: {} turns", session.conversation().len());
    Ok(())
}
