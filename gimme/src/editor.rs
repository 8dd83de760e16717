use crate::theme::Palette;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_textarea::TextArea;

/// The editor pane. `tui-textarea` owns the buffer, the cursor and the key
/// bindings; we draw it ourselves when soft wrapping, since it can't.
///
/// Columns count characters, not bytes or terminal cells.
pub struct Editor {
    /// The text and the cursor
    textarea: TextArea<'static>,

    /// First visual row on screen when soft wrapping
    scroll: usize,
}

impl Editor {
    /// Start editing some text, with the cursor at the top.
    pub fn new(text: &str) -> Self {
        Self {
            textarea: TextArea::new(text.split('\n').map(str::to_owned).collect()),
            scroll: 0,
        }
    }

    /// Everything in the buffer
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Replace everything in the buffer and go back to the top.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::new(text);
    }

    /// Where the cursor is, as (line, column)
    #[cfg(test)]
    pub fn cursor(&self) -> (usize, usize) {
        self.textarea.cursor()
    }

    /// Handle a key press. Returns whether the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.textarea.input(key)
    }

    /// Insert text at the cursor, e.g. from a paste. Returns whether the text
    /// changed.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;

        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                self.textarea.insert_newline();
                changed = true;
            }

            changed |= self.textarea.insert_str(line.trim_end_matches('\r'));
        }

        changed
    }

    /// Draw the buffer with a line number gutter. Only the focused editor
    /// shows a cursor.
    pub fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        wrap: bool,
        palette: &Palette,
        focused: bool,
    ) {
        if wrap {
            self.render_wrapped(frame, area, palette, focused);
            return;
        }

        self.textarea.set_style(palette.base());
        self.textarea.set_line_number_style(Style::new().fg(palette.muted));
        self.textarea.set_cursor_line_style(Style::new());
        self.textarea.set_cursor_style(if focused {
            Style::new().add_modifier(Modifier::REVERSED)
        } else {
            Style::new()
        });

        frame.render_widget(&self.textarea, area);
    }

    /// Draw the buffer soft wrapped at the width of `area`, keeping the cursor
    /// row on screen.
    #[expect(clippy::cast_possible_truncation)]
    fn render_wrapped(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        palette: &Palette,
        focused: bool,
    ) {
        let lines = self.textarea.lines();
        let (cursor_line, cursor_col) = self.textarea.cursor();

        let gutter = lines.len().to_string().len() + 1;
        let width = (area.width as usize).saturating_sub(gutter).max(1);
        let height = (area.height as usize).max(1);

        let rows = layout(lines, width);

        let (cursor_row, cursor_x) = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.line == cursor_line && row.start <= cursor_col)
            .last()
            .map_or((0, 0), |(idx, row)| (idx, cursor_col - row.start));

        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + height {
            self.scroll = cursor_row + 1 - height;
        }

        let number_style = Style::new().fg(palette.muted);

        let visible: Vec<Line> = rows
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|row| {
                let number = if row.start == 0 {
                    format!("{:>w$} ", row.line + 1, w = gutter - 1)
                } else {
                    " ".repeat(gutter)
                };

                let text: String = lines[row.line]
                    .chars()
                    .skip(row.start)
                    .take(row.end - row.start)
                    .collect();

                Line::from(vec![Span::styled(number, number_style), Span::raw(text)])
            })
            .collect();

        frame.render_widget(Paragraph::new(visible).style(palette.base()), area);

        if focused {
            frame.set_cursor_position((
                area.x + (gutter + cursor_x.min(width - 1)) as u16,
                area.y + (cursor_row - self.scroll) as u16,
            ));
        }
    }
}

/// One row on screen: a slice of one line of text.
#[derive(Debug, PartialEq, Eq)]
struct VisualRow {
    /// Which line this comes from
    line: usize,

    /// First character shown
    start: usize,

    /// One past the last character shown
    end: usize,
}

/// Break lines into screen rows of at most `width` characters. Every line
/// gets at least one row, even when it's empty.
fn layout(lines: &[String], width: usize) -> Vec<VisualRow> {
    let mut rows = Vec::with_capacity(lines.len());

    for (line, text) in lines.iter().enumerate() {
        let len = text.chars().count();

        if len == 0 {
            rows.push(VisualRow {
                line,
                start: 0,
                end: 0,
            });
        }

        let mut start = 0;
        while start < len {
            let end = (start + width).min(len);
            rows.push(VisualRow { line, start, end });
            start = end;
        }
    }

    rows
}
