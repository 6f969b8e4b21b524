//! vani-console: terminal front-end for the vani-voice session core.
//!
//! Setup screen picks the two speakers' languages (env override via
//! `VANI_SPEAKER_A_LANG`/`VANI_SPEAKER_B_LANG`), then each typed line is fed
//! through the scripted recognizer as one spoken utterance, so the full
//! recognize → translate → log → speak → flip pipeline runs per turn.
//! Translation uses `ApiTranslator` when `VANI_TRANSLATE_API_KEY` is set,
//! otherwise the built-in phrasebook stub.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vani_voice::{
    ApiTranslator, Language, PhrasebookTranslator, ScriptHandle, ScriptedRecognizer,
    SessionConfig, SessionEvent, Speaker, SpeechSynthesizer, TranslationSession,
    TranslatorBackend, VaniResult, SPEECH_RATE,
};

/// "Vocalizes" by printing: the console stands in for platform TTS.
struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&self, text: &str, language: Language) -> VaniResult<()> {
        println!("  🔊 [{}] {} (rate {})", language.code(), text, SPEECH_RATE);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Vani — voice translation console");
    println!("================================\n");

    let config = match SessionConfig::from_env() {
        Ok(config) => {
            println!(
                "Languages from environment: A = {}, B = {}\n",
                config.speaker_a.name(),
                config.speaker_b.name()
            );
            config
        }
        Err(_) => setup_screen(&mut lines).await?,
    };

    let translator: Box<dyn TranslatorBackend> = match ApiTranslator::from_env() {
        Some(api) => {
            info!("using the translation API backend");
            println!("Translator: API backend (VANI_TRANSLATE_API_KEY set)\n");
            Box::new(api)
        }
        None => {
            println!("Translator: built-in phrasebook stub (set VANI_TRANSLATE_API_KEY for a real backend)\n");
            Box::new(PhrasebookTranslator::new())
        }
    };

    let (recognizer, script) = ScriptedRecognizer::new();
    let (mut session, mut events) = TranslationSession::new(
        config,
        Box::new(recognizer),
        translator,
        Box::new(ConsoleSynthesizer),
    );

    println!("Type a line to speak as the current speaker. /help for commands.\n");
    print_prompt(&session);

    while let Some(line) = lines.next_line().await.context("stdin closed")? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print_prompt(&session);
            continue;
        }

        match line.as_str() {
            "/quit" | "/q" => break,
            "/help" => print_help(),
            "/mute" => {
                session.set_audio_enabled(!session.audio_enabled());
                println!(
                    "Audio {}",
                    if session.audio_enabled() { "on" } else { "off" }
                );
            }
            "/stop" => {
                // Valid only while listening; the session returns to idle
                // when the recognizer delivers its end-of-session event.
                session.stop_listening();
            }
            "/clear" => {
                session.clear()?;
            }
            "/history" => {
                println!("{}", serde_json::to_string_pretty(session.conversation())?);
            }
            "/speaker a" | "/speaker A" => {
                session.set_active_speaker(Speaker::A)?;
            }
            "/speaker b" | "/speaker B" => {
                session.set_active_speaker(Speaker::B)?;
            }
            _ if line.starts_with('/') => {
                println!("Unknown command: {} (/help for the list)", line);
            }
            _ => speak(&mut session, &script, &line).await?,
        }

        render_events(&mut events, &session);
        print_prompt(&session);
    }

    println!(
        "\nGoodbye — {} turn(s) this session.",
        session.conversation().len()
    );
    Ok(())
}

/// One utterance through the whole pipeline.
async fn speak(
    session: &mut TranslationSession,
    script: &ScriptHandle,
    text: &str,
) -> Result<()> {
    script.push_utterance(text);
    match session.start_listening() {
        Ok(Some(rx)) => session.drive_recognition(rx).await?,
        Ok(None) => println!("(busy — recording ignored)"),
        // The notification event carries the user-facing message.
        Err(_) => {}
    }
    Ok(())
}

/// Interactive setup screen: pick both speakers' languages.
async fn setup_screen(lines: &mut Lines<BufReader<Stdin>>) -> Result<SessionConfig> {
    println!("Choose languages for both speakers:\n");
    for (i, lang) in Language::ALL.iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, lang.name(), lang.native_name());
    }
    println!();

    let speaker_a = pick_language(lines, "Speaker A language (number or tag): ").await?;
    let speaker_b = pick_language(lines, "Speaker B language (number or tag): ").await?;
    println!();
    Ok(SessionConfig::new(speaker_a, speaker_b))
}

async fn pick_language(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Language> {
    loop {
        print!("{}", prompt);
        use std::io::Write;
        std::io::stdout().flush().ok();

        let line = lines
            .next_line()
            .await
            .context("stdin closed")?
            .context("stdin closed during setup")?;
        let input = line.trim();

        if let Ok(n) = input.parse::<usize>() {
            if (1..=Language::ALL.len()).contains(&n) {
                return Ok(Language::ALL[n - 1]);
            }
        }
        if let Ok(lang) = input.parse::<Language>() {
            return Ok(lang);
        }
        println!("Not a supported language: {:?}", input);
    }
}

fn render_events(
    events: &mut tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
    session: &TranslationSession,
) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::ListeningStarted { speaker, language } => {
                println!("🎤 Listening (Speaker {}, {})...", speaker, language.name());
            }
            SessionEvent::PartialTranscript(text) => {
                println!("   … {}", text);
            }
            SessionEvent::TurnCompleted(turn) => {
                println!(
                    "── Speaker {} · {} ─────────────",
                    turn.speaker,
                    turn.timestamp.format("%H:%M:%S")
                );
                println!("   Original   ({}): {}", turn.from_lang.name(), turn.original_text);
                println!("   Translated ({}): {}", turn.to_lang.name(), turn.translated_text);
            }
            SessionEvent::SpeakerChanged(speaker) => {
                println!(
                    "→ Current speaker: {} ({})",
                    speaker,
                    session.language_of(speaker).native_name()
                );
            }
            SessionEvent::ReturnedToIdle => {}
            SessionEvent::HistoryCleared => {
                println!("History cleared.");
            }
            SessionEvent::Notification { title, detail } => {
                println!("⚠ {}: {}", title, detail);
            }
        }
    }
}

fn print_prompt(session: &TranslationSession) {
    let speaker = session.active_speaker();
    println!(
        "\n[Speaker {} · {} · audio {}] ({} turns)",
        speaker,
        session.language_of(speaker).name(),
        if session.audio_enabled() { "on" } else { "off" },
        session.conversation().len()
    );
}

fn print_help() {
    println!("Commands:");
    println!("  <text>        speak the line as the current speaker");
    println!("  /speaker a|b  switch the active speaker (idle only)");
    println!("  /stop         stop an in-progress recording");
    println!("  /mute         toggle translated-speech playback");
    println!("  /clear        clear the conversation history");
    println!("  /history      dump the conversation log as JSON");
    println!("  /quit         exit");
}
