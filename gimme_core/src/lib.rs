//! Common code for gimme frontends: the playground's rules, and the stores it
//! shares snippets through.

/// Messages for the user, and the validation errors that produce some of them.
pub mod notice;
pub use notice::{Level, Notice, Operation, ValidationError};

/// The playground controller.
pub mod playground;
pub use playground::{Completion, Playground, Request};

/// Cosmetic editor preferences.
pub mod settings;
pub use settings::Settings;

/// The one thing we store.
pub mod snippet;
pub use snippet::{Lookup, Snippet};

/// Places to keep snippets.
pub mod store;
pub use store::SnippetStore;
