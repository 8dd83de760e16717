use crate::theme::Palette;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Padding, Row, Table},
    Frame,
};

/// Keyboard shortcuts, as shown in the help popover
const SHORTCUTS: &[(&str, &str)] = &[
    ("F1", "Display this help"),
    ("F2 / ctrl-s", "Share code under the reference code"),
    ("F3 / ctrl-l", "Load code from the reference code"),
    ("F4 / ctrl-y", "Copy code to the clipboard"),
    ("F5", "Switch between dark and light"),
    ("F6", "Toggle word wrap"),
    ("F7 / F8", "Smaller / bigger font"),
    ("shift-tab", "Switch between editor and reference code"),
    ("tab (reference)", "Back to the editor"),
    ("esc", "Close help"),
    ("ctrl-q", "Quit"),
];

/// Draw the help popover in the middle of `body_area`.
pub fn render(frame: &mut Frame<'_>, body_area: Rect, palette: &Palette) {
    let popup_vert = Layout::vertical([Constraint::Percentage(60)]).flex(Flex::Center);
    let popup_horiz = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center);

    let [popup_area] = popup_vert.areas(body_area);
    let [popup_area] = popup_horiz.areas(popup_area);

    let popup = Table::new(
        SHORTCUTS
            .iter()
            .map(|(keys, description)| Row::new(vec![*keys, *description])),
        [Constraint::Max(18), Constraint::Fill(1)],
    )
    .style(Style::new().fg(palette.text).bg(palette.surface))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keyboard Shortcuts")
            .padding(Padding::horizontal(1))
            .border_style(Style::new().fg(palette.accent)),
    );

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}
