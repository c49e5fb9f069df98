use std::fmt;

use serde::{Deserialize, Serialize};

/// Syntax tag carried on every stored version.
///
/// The store never interprets this; it exists for rendering collaborators.
/// Unrecognized input normalizes to [`Language::Plaintext`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Plaintext,
    Go,
    Javascript,
    Typescript,
    Json,
    Yaml,
    Toml,
    Python,
    Bash,
    Html,
    Css,
    Sql,
    Markdown,
}

impl Language {
    /// Every known language tag, in display order.
    pub const ALL: [Language; 13] = [
        Language::Plaintext,
        Language::Go,
        Language::Javascript,
        Language::Typescript,
        Language::Json,
        Language::Yaml,
        Language::Toml,
        Language::Python,
        Language::Bash,
        Language::Html,
        Language::Css,
        Language::Sql,
        Language::Markdown,
    ];

    /// The canonical lowercase tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Plaintext => "plaintext",
            Language::Go => "go",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Python => "python",
            Language::Bash => "bash",
            Language::Html => "html",
            Language::Css => "css",
            Language::Sql => "sql",
            Language::Markdown => "markdown",
        }
    }

    /// Parse a known tag exactly.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lang| lang.as_str() == tag)
    }

    /// Normalize arbitrary input to a known tag, falling back to plaintext.
    pub fn normalize(tag: &str) -> Self {
        Self::parse(tag.trim()).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
