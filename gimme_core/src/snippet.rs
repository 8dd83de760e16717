use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shared piece of code, as held by the store under its reference code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// The code, exactly as it was typed. We don't look at it.
    pub code: String,

    /// When this snippet was last shared. Re-sharing under the same reference
    /// code replaces this along with the code.
    pub created_at: DateTime<Utc>,
}

impl Snippet {
    /// Stamp some code with the current time, ready to be written.
    pub fn new(code: String) -> Self {
        Self::at(code, Utc::now())
    }

    /// Stamp some code with a specific time.
    pub fn at(code: String, created_at: DateTime<Utc>) -> Self {
        Self { code, created_at }
    }
}

/// The result of looking a reference code up. Not finding anything is a
/// perfectly normal outcome, so it's not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// There is a snippet under this reference code
    Found(Snippet),

    /// Nobody has shared anything under this reference code
    NotFound,
}

impl Lookup {
    /// Get the code, if we found any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Found(snippet) => Some(&snippet.code),
            Self::NotFound => None,
        }
    }

    /// Did we find anything?
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl From<Option<Snippet>> for Lookup {
    fn from(snippet: Option<Snippet>) -> Self {
        snippet.map_or(Self::NotFound, Self::Found)
    }
}
