use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation tag for a paste. Unrecognized input normalizes to dark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The canonical lowercase tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parse a known tag exactly.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    /// Normalize arbitrary input to a known tag, falling back to dark.
    pub fn normalize(tag: &str) -> Self {
        Self::parse(tag.trim()).unwrap_or_default()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
