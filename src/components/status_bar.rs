use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ⏎:look  p:path  u:up  .:hidden  w:win  n:new  q:quit ";

/// Keep the last `budget` characters of `s`, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

/// Status bar widget that displays the root, session info, key hints, or a
/// status message.
pub struct StatusBarWidget<'a> {
    root: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(root: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            root,
            info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.status_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [root] [info] [key_hints]
        let hints_len = KEY_HINTS.chars().count();
        let remaining = width.saturating_sub(hints_len);
        let info_len = self.info.chars().count();
        let root_budget = remaining.saturating_sub(info_len).saturating_sub(1);
        let root_display = truncate_left(self.root, root_budget);
        let gap = remaining
            .saturating_sub(root_display.chars().count())
            .saturating_sub(info_len);

        let root_style = Style::default().fg(self.theme.status_fg);
        let info_style = Style::default().fg(self.theme.body_fg);
        let hints_style = Style::default()
            .fg(self.theme.body_fg)
            .add_modifier(Modifier::DIM);

        let mut spans = vec![Span::styled(root_display, root_style)];
        if remaining > info_len {
            spans.push(Span::raw(" ".repeat(gap)));
            spans.push(Span::styled(self.info, info_style));
        }
        spans.push(Span::styled(KEY_HINTS, hints_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_status_message_success() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc).status_message("opened /x", false);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row(&buf, 80).contains("opened /x"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.status_fg);
    }

    #[test]
    fn test_status_message_error() {
        let tc = theme::dark_theme();
        let widget =
            StatusBarWidget::new("/path", "info", &tc).status_message("Permission denied", true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row(&buf, 80).contains("Permission denied"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.error_fg);
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/home/user/project", "hidden: off", &tc);

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 100);
        assert!(content.contains("/home/user/project"));
        assert!(content.contains("hidden: off"));
        assert!(content.contains("q:quit"));
    }

    #[test]
    fn test_long_root_is_cut_on_the_left() {
        assert_eq!(truncate_left("/a/very/long/path", 10), "...ng/path");
        assert_eq!(truncate_left("/short", 10), "/short");
        assert_eq!(truncate_left("/ünïcode/dir", 7), ".../dir");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
