use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// The tag row: window title followed by the command words.
pub struct TagWidget<'a> {
    title: &'a str,
    line: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> TagWidget<'a> {
    /// `line` is the full tag text and must start with `title`.
    pub fn new(title: &'a str, line: &'a str, theme: &'a ThemeColors) -> Self {
        Self { title, line, theme }
    }
}

impl<'a> Widget for TagWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, Style::default().bg(self.theme.tag_bg));

        let rest = self.line.strip_prefix(self.title).unwrap_or(self.line);
        let title_style = Style::default()
            .fg(self.theme.title_fg)
            .bg(self.theme.tag_bg)
            .add_modifier(Modifier::BOLD);
        let tag_style = Style::default().fg(self.theme.tag_fg).bg(self.theme.tag_bg);

        let line = if rest.len() == self.line.len() {
            Line::from(Span::styled(rest, tag_style))
        } else {
            Line::from(vec![
                Span::styled(self.title, title_style),
                Span::styled(rest, tag_style),
            ])
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
