use crate::theme::Palette;
use gimme_core::Notice;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

/// How many toasts we show at once. Older ones get pushed out.
const MAX_VISIBLE: usize = 4;

/// Identifies a toast so that it can be updated later, e.g. when a pending
/// request finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastId(u64);

/// A notice on screen, and when it should go away.
#[derive(Debug)]
struct Toast {
    /// For updating
    id: ToastId,

    /// What to say
    notice: Notice,

    /// When to stop saying it. `None` means "until replaced."
    expires: Option<Instant>,
}

/// A stack of transient notices, drawn bottom-left.
#[derive(Debug, Default)]
pub struct Toasts {
    /// Oldest first
    toasts: Vec<Toast>,

    /// The next ID to hand out
    next_id: u64,
}

impl Toasts {
    /// Show a notice, returning an ID to update it with.
    pub fn show(&mut self, notice: Notice, now: Instant) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        self.toasts.push(Toast {
            id,
            expires: notice.timeout().map(|timeout| now + timeout),
            notice,
        });

        if self.toasts.len() > MAX_VISIBLE {
            self.toasts.remove(0);
        }

        id
    }

    /// Replace the notice in a toast, restarting its clock. If the toast is
    /// gone already (say it got pushed out) we show a new one instead.
    pub fn update(&mut self, id: ToastId, notice: Notice, now: Instant) {
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) => {
                toast.expires = notice.timeout().map(|timeout| now + timeout);
                toast.notice = notice;
            }
            None => {
                self.show(notice, now);
            }
        }
    }

    /// Drop any toasts whose time is up.
    pub fn expire(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| !matches!(toast.expires, Some(expires) if expires <= now));
    }

    /// What's showing, oldest first
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.toasts.iter().map(|toast| &toast.notice)
    }

    /// Draw toasts stacked upward from the bottom-left corner of `area`.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, palette: &Palette) {
        if self.toasts.is_empty() {
            return;
        }

        let [column] = Layout::horizontal([Constraint::Max(44)])
            .flex(Flex::Start)
            .areas(area);

        let slots = Layout::vertical(self.toasts.iter().map(|_| Constraint::Length(3)))
            .flex(Flex::End)
            .split(column);

        for (toast, slot) in self.toasts.iter().zip(slots.iter()) {
            let color = palette.level(toast.notice.level());

            let widget = Paragraph::new(toast.notice.to_string())
                .wrap(Wrap { trim: true })
                .style(Style::new().fg(palette.text).bg(palette.surface))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::new().fg(color).bg(palette.surface)),
                );

            frame.render_widget(Clear, *slot);
            frame.render_widget(widget, *slot);
        }
    }
}
