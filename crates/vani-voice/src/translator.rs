//! **Translation Stub** — phrasebook lookup with simulated network latency,
//! plus an opt-in production backend.
//!
//! The default [`PhrasebookTranslator`] is a deterministic stand-in for a real
//! translation service: a fixed table of canned phrases, a lowercase/trimmed
//! lookup, and a `[<TargetLanguageName>: <original>]` fallback when the phrase
//! is unknown. [`ApiTranslator`] is the production collaborator an actual
//! deployment would swap in (OpenAI-compatible chat completions).

use crate::error::{VaniError, VaniResult};
use crate::language::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Translation seam: text plus source/target languages in, translated text out.
/// Implementations must be deterministic for identical inputs.
#[async_trait]
pub trait TranslatorBackend: Send + Sync {
    /// Translate `text` from `from` to `to`. An `Ok` result is always
    /// non-empty; backends return [`VaniError::Translation`] otherwise.
    async fn translate(&self, text: &str, from: Language, to: Language) -> VaniResult<String>;
}

/// Simulated network latency of the stub, matching what a fast translation
/// API would cost per request.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(800);

use Language::{Bengali, English, Hindi, Tamil, Telugu};

/// Canned phrase table: (phrase, source, target, translation). Only `en` and
/// `hi` source rows exist; every other pair resolves through the fallback.
const PHRASES: &[(&str, Language, Language, &str)] = &[
    ("hello", English, Hindi, "नमस्ते"),
    ("hello", English, Bengali, "হ্যালো"),
    ("hello", English, Tamil, "வணக்கம்"),
    ("hello", English, Telugu, "హలో"),
    ("hello", Hindi, English, "Hello"),
    ("hello", Hindi, Bengali, "হ্যালো"),
    ("hello", Hindi, Tamil, "வணக்கம்"),
    ("hello", Hindi, Telugu, "హలో"),
    ("how are you", English, Hindi, "आप कैसे हैं?"),
    ("how are you", English, Bengali, "আপনি কেমন আছেন?"),
    ("how are you", English, Tamil, "நீங்கள் எப்படி இருக்கிறீர்கள்?"),
    ("how are you", English, Telugu, "మీరు ఎలా ఉన్నారు?"),
    ("how are you", Hindi, English, "How are you?"),
    ("how are you", Hindi, Bengali, "আপনি কেমন আছেন?"),
    ("how are you", Hindi, Tamil, "நீங்கள் எப்படி இருக்கிறீர்கள்?"),
    ("how are you", Hindi, Telugu, "మీరు ఎలా ఉన్నారు?"),
    ("thank you", English, Hindi, "धन्यवाद"),
    ("thank you", English, Bengali, "ধন্যবাদ"),
    ("thank you", English, Tamil, "நன்றி"),
    ("thank you", English, Telugu, "ధన్యవాదాలు"),
    ("thank you", Hindi, English, "Thank you"),
    ("thank you", Hindi, Bengali, "ধন্যবাদ"),
    ("thank you", Hindi, Tamil, "நன்றி"),
    ("thank you", Hindi, Telugu, "ధన్యవాదాలు"),
    ("goodbye", English, Hindi, "अलविदा"),
    ("goodbye", English, Bengali, "বিদায়"),
    ("goodbye", English, Tamil, "பிரியாவிடை"),
    ("goodbye", English, Telugu, "వీడ్కోలు"),
    ("goodbye", Hindi, English, "Goodbye"),
    ("goodbye", Hindi, Bengali, "বিদায়"),
    ("goodbye", Hindi, Tamil, "பிரியாவிடை"),
    ("goodbye", Hindi, Telugu, "వీడ్కోలు"),
    ("yes", English, Hindi, "हाँ"),
    ("yes", English, Bengali, "হ্যাঁ"),
    ("yes", English, Tamil, "ஆம்"),
    ("yes", English, Telugu, "అవును"),
    ("yes", Hindi, English, "Yes"),
    ("yes", Hindi, Bengali, "হ্যাঁ"),
    ("yes", Hindi, Tamil, "ஆம்"),
    ("yes", Hindi, Telugu, "అవును"),
    ("no", English, Hindi, "नहीं"),
    ("no", English, Bengali, "না"),
    ("no", English, Tamil, "இல்லை"),
    ("no", English, Telugu, "కాదు"),
    ("no", Hindi, English, "No"),
    ("no", Hindi, Bengali, "না"),
    ("no", Hindi, Tamil, "இல்லை"),
    ("no", Hindi, Telugu, "కాదు"),
    ("what is your name", English, Hindi, "आपका नाम क्या है?"),
    ("what is your name", English, Bengali, "তোমার নাম কী?"),
    ("what is your name", English, Tamil, "உங்கள் பெயர் என்ன?"),
    ("what is your name", English, Telugu, "మీ పేరు ఏమిటి?"),
    ("what is your name", Hindi, English, "What is your name?"),
    ("what is your name", Hindi, Bengali, "তোমার নাম কী?"),
    ("what is your name", Hindi, Tamil, "உங்கள் பெயர் என்ன?"),
    ("what is your name", Hindi, Telugu, "మీ పేరు ఏమిటి?"),
    ("i am fine", English, Hindi, "मैं ठीक हूँ"),
    ("i am fine", English, Bengali, "আমি ভাল আছি"),
    ("i am fine", English, Tamil, "நான் நலமாக இருக்கிறேன்"),
    ("i am fine", English, Telugu, "నేను బాగున్నాను"),
    ("i am fine", Hindi, English, "I am fine"),
    ("i am fine", Hindi, Bengali, "আমি ভাল আছি"),
    ("i am fine", Hindi, Tamil, "நான் நலமாக இருக்கிறேன்"),
    ("i am fine", Hindi, Telugu, "నేను బాగున్నాను"),
    ("i love you", English, Hindi, "मैं तुमसे प्यार करता हूँ"),
    ("i love you", English, Bengali, "আমি তোমায় ভালোবাসি"),
    ("i love you", English, Tamil, "நான் உன்னை காதலிக்கிறேன்"),
    ("i love you", English, Telugu, "నేను నిన్ను ప్రేమిస్తున్నాను"),
    ("i love you", Hindi, English, "I love you"),
    ("i love you", Hindi, Bengali, "আমি তোমায় ভালোবাসি"),
    ("i love you", Hindi, Tamil, "நான் உன்னை காதலிக்கிறேன்"),
    ("i love you", Hindi, Telugu, "నేను నిన్ను ప్రేమిస్తున్నాను"),
    ("sorry", English, Hindi, "माफ़ कीजिए"),
    ("sorry", English, Bengali, "দুঃখিত"),
    ("sorry", English, Tamil, "மன்னிக்கவும்"),
    ("sorry", English, Telugu, "క్షమించండి"),
    ("sorry", Hindi, English, "Sorry"),
    ("sorry", Hindi, Bengali, "দুঃখিত"),
    ("sorry", Hindi, Tamil, "மன்னிக்கவும்"),
    ("sorry", Hindi, Telugu, "క్షమించండి"),
    ("please", English, Hindi, "कृपया"),
    ("please", English, Bengali, "অনুগ্রহ করে"),
    ("please", English, Tamil, "தயவு செய்து"),
    ("please", English, Telugu, "దయచేసి"),
    ("please", Hindi, English, "Please"),
    ("please", Hindi, Bengali, "অনুগ্রহ করে"),
    ("please", Hindi, Tamil, "தயவு செய்து"),
    ("please", Hindi, Telugu, "దయచేసి"),
];

/// Deterministic translation stub: canned phrase lookup plus artificial delay.
pub struct PhrasebookTranslator {
    delay: Duration,
    table: HashMap<(String, Language, Language), &'static str>,
}

impl PhrasebookTranslator {
    /// Build the stub with the default simulated latency.
    pub fn new() -> Self {
        let table = PHRASES
            .iter()
            .map(|&(phrase, from, to, out)| ((phrase.to_string(), from, to), out))
            .collect();
        Self {
            delay: SIMULATED_LATENCY,
            table,
        }
    }

    /// Override the simulated latency (tests use zero).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lookup(&self, text: &str, from: Language, to: Language) -> Option<&'static str> {
        let key = (text.trim().to_lowercase(), from, to);
        self.table.get(&key).copied()
    }
}

impl Default for PhrasebookTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslatorBackend for PhrasebookTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> VaniResult<String> {
        tokio::time::sleep(self.delay).await;

        match self.lookup(text, from, to) {
            Some(hit) => {
                debug!(%from, %to, "phrasebook hit");
                Ok(hit.to_string())
            }
            None => {
                debug!(%from, %to, "phrasebook miss, falling back to echo");
                Ok(format!("[{}: {}]", to.name(), text))
            }
        }
    }
}

// OpenAI-compatible request/response wire types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// Production translation backend: OpenAI-compatible chat-completions API.
/// Uses `VANI_TRANSLATE_API_URL`, `VANI_TRANSLATE_API_KEY`, and
/// `VANI_TRANSLATE_MODEL`.
pub struct ApiTranslator {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ApiTranslator {
    /// Build from environment. Returns `None` when no API key is set (the
    /// caller falls back to the phrasebook stub).
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("VANI_TRANSLATE_API_KEY").ok()?;
        let key = api_key.trim().to_string();
        if key.is_empty() {
            return None;
        }
        let base_url = std::env::var("VANI_TRANSLATE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model =
            std::env::var("VANI_TRANSLATE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(base_url, key, model))
    }

    /// Create with explicit config (e.g. for tests or non-env wiring).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        }
    }

    /// Set the model (e.g. `meta-llama/llama-3.3-70b-instruct`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TranslatorBackend for ApiTranslator {
    async fn translate(&self, text: &str, from: Language, to: Language) -> VaniResult<String> {
        let system = "You are a translation engine. \
            Output only the translated text, with no quotes, notes, or commentary.";
        let user = format!(
            "Translate from {} to {}: {}",
            from.name(),
            to.name(),
            text
        );

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VaniError::Translation(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(VaniError::Translation(format!(
                "translation API error {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| VaniError::Translation(format!("response parse failed: {}", e)))?;

        let translated = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if translated.is_empty() {
            return Err(VaniError::Translation(
                "empty translation from API".to_string(),
            ));
        }
        Ok(translated)
    }
}
