use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::buffer::codec::EntryKind;
use crate::theme::ThemeColors;

/// Columns a tab advances to.
pub const TAB_WIDTH: usize = 4;

/// Replace tabs with spaces up to the next tab stop.
pub fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0;
    for c in text.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(c);
            col += 1;
        }
    }
    out
}

/// The body pane, drawn straight from the host's text.
pub struct BodyWidget<'a> {
    body: &'a [u8],
    starts: &'a [usize],
    scroll: usize,
    cursor: usize,
    theme: &'a ThemeColors,
}

impl<'a> BodyWidget<'a> {
    pub fn new(
        body: &'a [u8],
        starts: &'a [usize],
        scroll: usize,
        cursor: usize,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            body,
            starts,
            scroll,
            cursor,
            theme,
        }
    }

    fn raw_line(&self, idx: usize) -> Option<&'a [u8]> {
        let start = *self.starts.get(idx)?;
        let end = self.starts.get(idx + 1).copied().unwrap_or(self.body.len());
        Some(&self.body[start..end])
    }
}

impl<'a> Widget for BodyWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(
            area,
            Style::default().bg(self.theme.body_bg).fg(self.theme.body_fg),
        );

        for row in 0..area.height {
            let idx = self.scroll + row as usize;
            let Some(raw) = self.raw_line(idx) else {
                break;
            };
            let fg = match EntryKind::of_line(raw) {
                EntryKind::Directory => self.theme.dir_fg,
                EntryKind::File => self.theme.body_fg,
            };
            let bg = if idx == self.cursor {
                self.theme.cursor_bg
            } else {
                self.theme.body_bg
            };
            let style = Style::default().fg(fg).bg(bg);

            let y = area.y + row;
            buf.set_style(Rect::new(area.x, y, area.width, 1), style);
            let text = String::from_utf8_lossy(raw.strip_suffix(b"\n").unwrap_or(raw));
            let line = Line::from(Span::styled(expand_tabs(&text), style));
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}
