//! A terminal code playground: write code, share it under a reference code,
//! load it back later.

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// A small multi-line text editor widget
mod editor;

/// Colors for dark and light mode
mod theme;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream},
    execute,
};
use futures::StreamExt;
use gimme_core::store::firestore;
use ratatui::DefaultTerminal;
use std::{fs, io, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file. Hold the guard
    // until we exit or buffered lines get lost.
    let _guard = init_tracing(&config)?;

    let ctx = Arc::new(EffectContext::new(config.store(reqwest::Client::new())));

    tracing::info!(
        project_id = %config.project_id,
        endpoint = %config.endpoint,
        collection = %config.collection,
        "starting"
    );

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableBracketedPaste)?;
    terminal.clear()?;
    let res = run(terminal, ctx).await;
    execute!(io::stdout(), DisableBracketedPaste)?;
    ratatui::restore();

    if let Err(err) = &res {
        tracing::error!(?err, "exiting with error");
    }

    res
}

/// Set up logging to a daily file in the configured log directory.
fn init_tracing(config: &config::Config) -> io::Result<WorkerGuard> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&log_dir, "gimme.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}

/// Manage the lifecycle of the app
async fn run(
    mut terminal: DefaultTerminal,
    ctx: Arc<EffectContext<firestore::Client>>,
) -> io::Result<ExitCode> {
    let mut app = App::new();

    // We expect side-effectful behaviors (that is, network and clipboard
    // access) to take place via async tasks. Once those tasks are done, we
    // read their results off of a channel. We keep track of outstanding
    // effects so we can exit cleanly.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<JoinHandle<()>> = Vec::with_capacity(1);

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Toasts expire on their own, so we need to wake up now and then even
    // without input.
    let mut ticks = time::interval(time::Duration::from_millis(250));

    loop {
        // Wait for either external input or the async result of an effect.
        // This is an `Option<_>` because we don't need to pay attention to
        // every single piece of external input.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Ok(Event::Paste(text))) => {
                        Some(app::Action::Paste(text))
                    }
                    Some(Err(err)) => {
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            _ = ticks.tick() => {
                Some(app::Action::TimePassed)
            },

            effect_opt = effect_rx.recv() => {
                effect_opt.flatten()
            }
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&ctx),
                    effect,
                ));
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        // This list should never be long (we prune it on every pass through
        // the loop) so a full scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Let in-flight writes land before we go.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                if let Err(err) = effect.await {
                    tracing::warn!(?err, "effect failed while exiting");
                }
            }

            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<Option<app::Action>>,
    ctx: Arc<EffectContext<firestore::Client>>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let next_action = effect.run(&ctx).await;

        // A closed channel means we're shutting down, and nobody is left to
        // read the result.
        if effect_tx.send(next_action).is_err() {
            tracing::debug!("dropping effect result after shutdown");
        }
    })
}
