use std::fmt::{self, Display};
use std::time::Duration;
use thiserror::Error;

/// How long result notices stay up
pub const RESULT_TIMEOUT: Duration = Duration::from_secs(3);

/// How long the "copied!" notice stays up
pub const COPIED_TIMEOUT: Duration = Duration::from_secs(2);

/// Something the user asked for that talks to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Write the current code under the reference code
    Share,

    /// Replace the current code with whatever is under the reference code
    Load,
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Share => write!(f, "share"),
            Self::Load => write!(f, "load"),
        }
    }
}

/// A required field was blank, so we didn't even try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Sharing needs both code and a reference code
    #[error("Please enter code and a reference")]
    MissingCodeOrReference,

    /// Loading needs a reference code
    #[error("Please enter a reference code")]
    MissingReference,

    /// Copying needs some code
    #[error("No code to copy")]
    NothingToCopy,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// We refused to start something
    Invalid(ValidationError),

    /// We've started talking to the store
    InProgress(Operation),

    /// The store has our code
    Shared,

    /// We have the store's code
    Loaded,

    /// There was nothing under that reference code
    NotFound,

    /// The store let us down, for this reason
    Failed(Operation, String),

    /// The code is on the clipboard
    Copied,

    /// We couldn't get the code onto the clipboard
    CopyFailed(String),
}

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Still waiting on something
    Pending,

    /// It worked
    Success,

    /// It didn't
    Error,
}

impl Notice {
    /// What kind of notice is this?
    pub fn level(&self) -> Level {
        match self {
            Self::InProgress(_) => Level::Pending,
            Self::Shared | Self::Loaded | Self::Copied => Level::Success,
            Self::Invalid(_) | Self::NotFound | Self::Failed(..) | Self::CopyFailed(_) => {
                Level::Error
            }
        }
    }

    /// How long the notice should stay visible. Pending notices stay until
    /// they're replaced by a result.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::InProgress(_) => None,
            Self::Copied => Some(COPIED_TIMEOUT),
            _ => Some(RESULT_TIMEOUT),
        }
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::InProgress(Operation::Share) => write!(f, "Sharing your code..."),
            Self::InProgress(Operation::Load) => write!(f, "Loading code..."),
            Self::Shared => write!(f, "Code shared successfully!"),
            Self::Loaded => write!(f, "Code loaded successfully!"),
            Self::NotFound => write!(f, "No code found for that reference!"),
            Self::Failed(op, reason) => write!(f, "Failed to {op} code: {reason}"),
            Self::Copied => write!(f, "Code copied to clipboard!"),
            Self::CopyFailed(reason) => write!(f, "Failed to copy code: {reason}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn failure_includes_reason() {
        let notice = Notice::Failed(Operation::Load, "permission denied".to_owned());

        assert_eq!(notice.to_string(), "Failed to load code: permission denied");
        assert_eq!(notice.level(), Level::Error);
    }

    #[test]
    fn pending_never_times_out() {
        assert_eq!(Notice::InProgress(Operation::Share).timeout(), None);
        assert_eq!(Notice::InProgress(Operation::Load).level(), Level::Pending);
    }

    #[test]
    fn copied_is_quicker_than_results() {
        assert_eq!(Notice::Copied.timeout(), Some(COPIED_TIMEOUT));
        assert_eq!(Notice::Shared.timeout(), Some(RESULT_TIMEOUT));
        assert_eq!(Notice::NotFound.timeout(), Some(RESULT_TIMEOUT));
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            Notice::from(ValidationError::MissingCodeOrReference).to_string(),
            "Please enter code and a reference"
        );
        assert_eq!(
            Notice::from(ValidationError::MissingReference).to_string(),
            "Please enter a reference code"
        );
    }
}
