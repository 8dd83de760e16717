/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks for
mod effect;
pub use effect::{Effect, EffectContext};

/// The keyboard shortcut popover
mod help;

/// Transient notices
mod toast;

use crate::editor::Editor;
use crate::theme::Palette;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gimme_core::{Notice, Playground, Request, ValidationError};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use std::{process::ExitCode, time::Instant};
use toast::Toasts;
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

/// The "functional core" of the app.
pub struct App {
    /// Code, reference code, settings, and the rules for sharing them
    playground: Playground,

    /// The editor pane. Its text is mirrored into `playground.code`.
    editor: Editor,

    /// The reference code field. Mirrored into `playground.reference_code`.
    reference: Input,

    /// Which of the two gets keys
    focus: Focus,

    /// Notices, bottom left
    toasts: Toasts,

    /// Are we showing the shortcut list?
    showing_help: bool,

    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Set once we want to quit, with the code to quit with
    exit: Option<ExitCode>,
}

/// Where typing goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// The code editor
    Editor,

    /// The reference code field
    Reference,
}

impl Focus {
    /// Switch to the other one
    fn toggle(self) -> Self {
        match self {
            Self::Editor => Self::Reference,
            Self::Reference => Self::Editor,
        }
    }
}

impl App {
    /// Create a new instance of the app
    pub fn new() -> Self {
        let playground = Playground::new();

        Self {
            editor: Editor::new(&playground.code),
            reference: Input::new(playground.reference_code.clone()),
            playground,
            focus: Focus::Editor,
            toasts: Toasts::default(),
            showing_help: false,
            status_line: None,
            exit: None,
        }
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        let now = Instant::now();

        match action {
            Action::Key(key) => self.handle_key(key, now),
            Action::Paste(text) => {
                if self.showing_help {
                    return vec![];
                }

                match self.focus {
                    Focus::Editor => {
                        if self.editor.insert_str(&text) {
                            self.playground.code = self.editor.text();
                        }
                    }
                    Focus::Reference => {
                        // the reference code is a single line
                        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
                            self.reference.handle(InputRequest::InsertChar(c));
                        }
                        self.playground.reference_code = self.reference.value().to_owned();
                    }
                }

                vec![]
            }
            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }
            Action::TimePassed => {
                self.toasts.expire(now);

                vec![]
            }
            Action::Finished { toast, completion } => {
                let notice = self.playground.finish(completion);
                self.status_line = None;

                if notice == Notice::Loaded {
                    self.editor.set_text(&self.playground.code);
                }

                self.toasts.update(toast, notice, now);

                vec![]
            }
            Action::Copied(result) => {
                self.toasts.show(
                    match result {
                        Ok(()) => Notice::Copied,
                        Err(reason) => Notice::CopyFailed(reason),
                    },
                    now,
                );

                vec![]
            }
        }
    }

    /// Handle a key press: shortcuts first, then whatever has focus.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.showing_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
                self.showing_help = false;
            }

            return vec![];
        }

        match key.code {
            KeyCode::Char('q') if ctrl => {
                self.exit = Some(ExitCode::SUCCESS);
                vec![]
            }
            KeyCode::F(1) => {
                self.showing_help = true;
                vec![]
            }
            KeyCode::F(2) => self.share(now),
            KeyCode::Char('s') if ctrl => self.share(now),
            KeyCode::F(3) => self.load(now),
            KeyCode::Char('l') if ctrl => self.load(now),
            KeyCode::F(4) => self.copy(now),
            KeyCode::Char('y') if ctrl => self.copy(now),
            KeyCode::F(5) => {
                self.playground.settings.toggle_dark_mode();
                vec![]
            }
            KeyCode::F(6) => {
                self.playground.settings.toggle_word_wrap();
                vec![]
            }
            KeyCode::F(7) => {
                self.playground.settings.shrink_font();
                vec![]
            }
            KeyCode::F(8) => {
                self.playground.settings.grow_font();
                vec![]
            }
            KeyCode::BackTab => {
                self.focus = self.focus.toggle();
                vec![]
            }
            KeyCode::Tab if self.focus == Focus::Reference => {
                self.focus = self.focus.toggle();
                vec![]
            }
            _ => {
                match self.focus {
                    Focus::Editor => {
                        if self.editor.handle_key(key) {
                            self.playground.code = self.editor.text();
                        }
                    }
                    Focus::Reference => {
                        if !ctrl && self.reference.handle_event(&Event::Key(key)).is_some() {
                            self.playground.reference_code = self.reference.value().to_owned();
                        }
                    }
                }

                vec![]
            }
        }
    }

    /// Share, unless we're still waiting on the last request.
    fn share(&mut self, now: Instant) -> Vec<Effect> {
        if self.playground.is_busy() {
            self.status_line = Some("Still waiting on the store…".to_owned());
            return vec![];
        }

        let started = self.playground.share();
        self.start(started, now)
    }

    /// Load, unless we're still waiting on the last request.
    fn load(&mut self, now: Instant) -> Vec<Effect> {
        if self.playground.is_busy() {
            self.status_line = Some("Still waiting on the store…".to_owned());
            return vec![];
        }

        let started = self.playground.load();
        self.start(started, now)
    }

    /// Turn a started (or refused) request into a toast and maybe an effect.
    fn start(&mut self, started: Result<Request, ValidationError>, now: Instant) -> Vec<Effect> {
        match started {
            Ok(request) => {
                tracing::info!(operation = %request.operation(), key = request.key(), "starting request");

                let toast = self.toasts.show(Notice::InProgress(request.operation()), now);
                self.status_line = None;

                vec![Effect::Send { toast, request }]
            }
            Err(err) => {
                tracing::debug!(%err, "refusing to start request");
                self.toasts.show(err.into(), now);

                vec![]
            }
        }
    }

    /// Copy the code, if there's any to copy.
    fn copy(&mut self, now: Instant) -> Vec<Effect> {
        match self.playground.copy() {
            Ok(code) => vec![Effect::Copy(code.to_owned())],
            Err(err) => {
                self.toasts.show(err.into(), now);
                vec![]
            }
        }
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let palette = Palette::for_mode(self.playground.settings.dark_mode);

        frame.render_widget(Block::default().style(palette.base()), frame.area());

        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [title_area, body_area, status_area] = vertical.areas(frame.area());

        let title = Line::from(vec![
            Span::styled(" Gimme", Style::new().add_modifier(Modifier::BOLD)),
            Span::styled(
                "That",
                Style::new()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(title).style(palette.base()), title_area);

        let horizontal = Layout::horizontal([Constraint::Min(20), Constraint::Length(34)]);
        let [editor_area, controls_area] = horizontal.areas(body_area);

        // EDITOR
        {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Editor ")
                .border_style(palette.border(self.focus == Focus::Editor));
            let inner = block.inner(editor_area);
            frame.render_widget(block, editor_area);

            self.editor.render(
                frame,
                inner,
                self.playground.settings.word_wrap,
                palette,
                self.focus == Focus::Editor && !self.showing_help,
            );
        }

        self.render_controls(frame, controls_area, palette);

        self.toasts.render(frame, editor_area, palette);

        if self.showing_help {
            help::render(frame, body_area, palette);
        }

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "F1 help · F2 share · F3 load · F4 copy · ctrl-q quit",
        })
        .style(Style::new().fg(palette.muted).bg(palette.background));

        frame.render_widget(status, status_area);
    }

    /// Render the settings, reference code field, and buttons.
    #[expect(clippy::cast_possible_truncation)]
    fn render_controls(&self, frame: &mut Frame<'_>, area: Rect, palette: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Playground Controls ")
            .padding(Padding::horizontal(1))
            .border_style(palette.border(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let sections = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let [settings_area, _, reference_area, _, share_area, _, load_area, copy_area] =
            sections.areas(inner);

        let settings = self.playground.settings;
        let on_off = |on: bool| if on { "on" } else { "off" };
        let muted = Style::new().fg(palette.muted);

        frame.render_widget(
            Paragraph::new(vec![
                Line::styled("Editor Settings", Style::new().add_modifier(Modifier::BOLD)),
                Line::from(vec![
                    Span::raw(format!("Font size: {}px ", settings.font_size())),
                    Span::styled("F7/F8", muted),
                ]),
                Line::from(vec![
                    Span::raw(format!("Word wrap: {} ", on_off(settings.word_wrap))),
                    Span::styled("F6", muted),
                ]),
                Line::from(vec![
                    Span::raw(format!("Dark mode: {} ", on_off(settings.dark_mode))),
                    Span::styled("F5", muted),
                ]),
            ])
            .style(palette.base()),
            settings_area,
        );

        // REFERENCE CODE
        {
            let focused = self.focus == Focus::Reference;
            let width = reference_area.width.saturating_sub(3); // -2 for the border, -1 for the cursor
            let input_scroll = self.reference.visual_scroll(width as usize);

            let field = if self.reference.value().is_empty() {
                Paragraph::new("Enter reference code").style(muted)
            } else {
                Paragraph::new(self.reference.value())
                    .scroll((0, input_scroll as u16))
                    .style(palette.base())
            }
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Reference Code")
                    .border_style(palette.border(focused)),
            );

            frame.render_widget(field, reference_area);

            if focused && !self.showing_help {
                frame.set_cursor_position((
                    reference_area.x
                        + (self.reference.visual_cursor().max(input_scroll) - input_scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    reference_area.y + 1, // +1 row for the border/title
                ));
            }
        }

        // BUTTONS
        let busy = self.playground.is_busy();
        let copied = self.toasts.notices().any(|notice| *notice == Notice::Copied);

        let share = if busy { "Sharing..." } else { "F2  Share Code" };
        let load = if busy { "Loading..." } else { "F3  Load Code" };
        let copy = if copied { "Copied!" } else { "F4  Copy" };

        frame.render_widget(
            Paragraph::new(share)
                .centered()
                .style(palette.button(palette.accent, self.playground.can_share())),
            share_area,
        );
        frame.render_widget(
            Paragraph::new(load)
                .centered()
                .style(palette.button(palette.secondary, self.playground.can_load())),
            load_area,
        );
        frame.render_widget(
            Paragraph::new(copy)
                .centered()
                .style(palette.button(palette.muted, self.playground.copy().is_ok())),
            copy_area,
        );
    }
}
