use super::{toast::ToastId, Action};
use arboard::Clipboard;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gimme_core::{Completion, Request, SnippetStore};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::{self, JoinError};

/// Terminals cap how much they'll take in one OSC 52 sequence.
const MAX_OSC52_BYTES: usize = 100 * 1024;

/// Connections to external services that effects use. We keep these around
/// to have some level of connection sharing for the app as a whole.
pub struct EffectContext<S> {
    /// Where snippets go
    store: S,

    /// The system clipboard, once we've managed to open it. On X11 the copied
    /// text only lives as long as this handle does, so it stays open for the
    /// life of the app.
    clipboard: Arc<Mutex<Option<Clipboard>>>,
}

impl<S: SnippetStore> EffectContext<S> {
    /// Get a new `EffectContext`
    pub fn new(store: S) -> Self {
        Self {
            store,
            clipboard: Arc::new(Mutex::new(None)),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    /// Send a share or load request to the store, then update the pending
    /// toast with the outcome.
    Send {
        /// The toast saying we're working on it
        toast: ToastId,

        /// What to ask the store for
        request: Request,
    },

    /// Put this text on the system clipboard
    Copy(String),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run<S: SnippetStore>(self, ctx: &EffectContext<S>) -> Option<Action> {
        match self.run_inner(ctx).await {
            Ok(action) => action,
            Err(problem) => {
                tracing::error!(?problem, "problem running effect");
                Some(Action::Problem(problem.to_string()))
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to make
    /// it more ergonomic to write.
    async fn run_inner<S: SnippetStore>(
        self,
        ctx: &EffectContext<S>,
    ) -> Result<Option<Action>, Problem> {
        match self {
            Self::Send { toast, request } => {
                tracing::info!(operation = %request.operation(), key = request.key(), "sending request");

                let completion = request.send(&ctx.store).await;

                if let Completion::Wrote(Err(err)) | Completion::Read(Err(err)) = &completion {
                    tracing::warn!(?err, operation = %completion.operation(), "store request failed");
                }

                Ok(Some(Action::Finished { toast, completion }))
            }

            Self::Copy(text) => {
                tracing::debug!(len = text.len(), "copying to clipboard");

                // clipboard access can block (e.g. waiting on X11), so keep
                // it off the async workers.
                let clipboard = Arc::clone(&ctx.clipboard);
                let result = task::spawn_blocking(move || {
                    let mut slot = clipboard.lock().unwrap_or_else(PoisonError::into_inner);

                    match system_copy(&mut slot, &text) {
                        Ok(()) => Ok(()),
                        Err(system_err) => {
                            // no display (say, over SSH): ask the terminal instead
                            tracing::warn!(%system_err, "system clipboard failed, trying OSC 52");
                            osc52_copy(&text)
                                .map_err(|osc_err| format!("{system_err}; {osc_err}"))
                        }
                    }
                })
                .await?;

                Ok(Some(Action::Copied(result)))
            }
        }
    }
}

/// Put text on the system clipboard, opening it first if we haven't yet. A
/// clipboard that fails is dropped so the next copy can try a fresh one.
fn system_copy(slot: &mut Option<Clipboard>, text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = match slot.take() {
        Some(clipboard) => clipboard,
        None => Clipboard::new()?,
    };

    clipboard.set_text(text)?;
    *slot = Some(clipboard);

    Ok(())
}

/// Ask the terminal to set the clipboard with an OSC 52 escape sequence.
fn osc52_copy(text: &str) -> Result<(), String> {
    let sequence = osc52_sequence(text)?;

    let mut out = io::stdout();
    out.write_all(sequence.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| err.to_string())
}

/// `ESC ] 52 ; c ; <base64> BEL`
fn osc52_sequence(text: &str) -> Result<String, String> {
    if text.len() > MAX_OSC52_BYTES {
        return Err(format!(
            "too large for the terminal clipboard ({} bytes, limit {MAX_OSC52_BYTES})",
            text.len()
        ));
    }

    Ok(format!("\x1b]52;c;{}\x07", STANDARD.encode(text)))
}

/// Problems that can happen while running an `Effect`.
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// A blocking task we handed work to went away.
    #[error("Background task failed: {0}")]
    Join(#[from] JoinError),
}
