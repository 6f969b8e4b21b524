//! Supported languages: short code, English display name, native-script name.
//!
//! The set is fixed; both speakers pick from it during setup. Codes double as
//! the recognition/synthesis language tags.

use crate::error::{VaniError, VaniResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Language {
    Hindi,
    English,
    Bengali,
    Telugu,
    Marathi,
    Tamil,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
    Odia,
    Assamese,
}

impl Language {
    /// All supported languages, in setup-screen order.
    pub const ALL: [Language; 12] = [
        Language::Hindi,
        Language::English,
        Language::Bengali,
        Language::Telugu,
        Language::Marathi,
        Language::Tamil,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Punjabi,
        Language::Odia,
        Language::Assamese,
    ];

    /// Short language tag (e.g. "hi"). Used as the recognition/synthesis lang.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::English => "en",
            Language::Bengali => "bn",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Tamil => "ta",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
            Language::Odia => "or",
            Language::Assamese => "as",
        }
    }

    /// English display name (e.g. "Hindi"). Also used in the fallback
    /// translation format `[<name>: <original>]`.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::English => "English",
            Language::Bengali => "Bengali",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Tamil => "Tamil",
            Language::Gujarati => "Gujarati",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
            Language::Odia => "Odia",
            Language::Assamese => "Assamese",
        }
    }

    /// Native-script name (e.g. "हिन्दी"), for display next to the English name.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Hindi => "हिन्दी",
            Language::English => "English",
            Language::Bengali => "বাংলা",
            Language::Telugu => "తెలుగు",
            Language::Marathi => "मराठी",
            Language::Tamil => "தமிழ்",
            Language::Gujarati => "ગુજરાતી",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Malayalam => "മലയാളം",
            Language::Punjabi => "ਪੰਜਾਬੀ",
            Language::Odia => "ଓଡ଼ିଆ",
            Language::Assamese => "অসমীয়া",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = VaniError;

    fn from_str(s: &str) -> VaniResult<Self> {
        let tag = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == tag)
            .ok_or_else(|| VaniError::Config(format!("unsupported language tag: {}", s)))
    }
}

impl From<Language> for String {
    fn from(l: Language) -> String {
        l.code().to_string()
    }
}

impl TryFrom<String> for Language {
    type Error = VaniError;

    fn try_from(s: String) -> VaniResult<Self> {
        s.parse()
    }
}
