//! Display language and bilingual text.
//!
//! Language is a pure display parameter: it selects which half of a
//! [`LocalizedText`] is shown and which static labels are used. It is never
//! sent to the data store.

use serde::{Deserialize, Serialize};

/// The two languages every menu is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Arabic (right-to-left). The primary language of every record.
    #[default]
    Ar,
    /// English (left-to-right). Translations are optional.
    En,
}

impl Lang {
    /// The other language.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ar => Self::En,
            Self::En => Self::Ar,
        }
    }

    /// BCP 47 code for the `lang` attribute.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Text direction for the `dir` attribute.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Ar => "rtl",
            Self::En => "ltr",
        }
    }

    /// Whether this is a right-to-left language.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    /// Currency label shown next to prices.
    #[must_use]
    pub const fn currency_label(self) -> &'static str {
        match self {
            Self::Ar => "ر.س",
            Self::En => "SAR",
        }
    }

    /// Parse a stored language code, falling back to Arabic for anything unknown.
    #[must_use]
    pub fn from_code_or_default(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("en") => Self::En,
            _ => Self::Ar,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// A bilingual string: Arabic is required, English is optional.
///
/// Missing or blank English falls back to the Arabic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalizedText {
    /// Arabic text.
    pub ar: String,
    /// English text, if translated.
    pub en: Option<String>,
}

impl LocalizedText {
    /// Build from the two columns stored in the data store.
    #[must_use]
    pub fn new(ar: impl Into<String>, en: Option<String>) -> Self {
        let en = en.filter(|s| !s.trim().is_empty());
        Self { ar: ar.into(), en }
    }

    /// Text for the given language.
    #[must_use]
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Ar => &self.ar,
            Lang::En => self.en.as_deref().unwrap_or(&self.ar),
        }
    }

    /// English text without the Arabic fallback (for edit forms).
    #[must_use]
    pub fn en_or_empty(&self) -> &str {
        self.en.as_deref().unwrap_or_default()
    }

    /// Whether either language contains `needle`.
    ///
    /// Arabic is matched as-is; English is matched case-insensitively.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        if self.ar.contains(needle) {
            return true;
        }
        self.en
            .as_deref()
            .is_some_and(|en| en.to_lowercase().contains(&needle.to_lowercase()))
    }
}
