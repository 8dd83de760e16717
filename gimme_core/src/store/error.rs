use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Things that can go wrong while talking to the store. The messages here end
/// up in front of the user verbatim, so keep them readable.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the configured endpoint was
    /// invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't get a response at all, or the response body didn't decode.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered, but not happily. Only the store's message is
    /// shown; the status is for matching on and logging.
    #[error("{message}")]
    Service {
        /// The status code the store answered with
        status: StatusCode,

        /// What the store said was wrong
        message: String,
    },

    /// The reference code can't be used as a document ID.
    #[error("{0:?} can't be used as a reference code")]
    InvalidKey(String),

    /// The store is not taking requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The body of an error response from a Firestore-compatible store.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResp {
    /// The wrapped error
    pub error: ErrorBody,
}

/// Details of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric HTTP-ish code
    #[serde(default)]
    pub code: u16,

    /// Human-readable message
    pub message: String,

    /// Machine-readable status, e.g. `NOT_FOUND` or `PERMISSION_DENIED`
    #[serde(default)]
    pub status: Option<String>,
}
