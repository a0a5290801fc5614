//! Response language selection.
//!
//! The client names a language in `Accept-Language` using a bare two-letter
//! code. Matching is exact after lowercasing: `es-MX` or `es;q=0.9` are not
//! negotiated and fall back to English like any other unknown value.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    Portuguese,
}

impl Language {
    /// Resolve the header value, defaulting to English.
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Language::English;
        };

        match value.to_lowercase().as_str() {
            "es" => Language::Spanish,
            "pt" => Language::Portuguese,
            _ => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Portuguese => "Portuguese",
        }
    }

    /// The sentence appended to prompts, or `None` when the model's default
    /// (English) is wanted.
    pub fn response_instruction(&self) -> Option<String> {
        match self {
            Language::English => None,
            other => Some(format!("Please respond in {}.", other.display_name())),
        }
    }
}
