use super::toast::ToastId;
use crossterm::event::KeyEvent;
use gimme_core::Completion;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// The user pasted some text into the terminal
    Paste(String),

    /// Something bad happened; display it to the user
    Problem(String),

    /// Some amount of time passed and we should do clock things
    TimePassed,

    /// The store got back to us about a share or a load. `toast` is the
    /// pending notice to replace with the result.
    Finished {
        /// Which toast to update
        toast: ToastId,

        /// What the store said
        completion: Completion,
    },

    /// We tried to put code on the clipboard
    Copied(Result<(), String>),
}
