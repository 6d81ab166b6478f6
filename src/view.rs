//! Terminal input translated into host events.
//!
//! The terminal stands in for the window system: a cursor line in the body
//! plays the part of the mouse position, and clicks on the tag row execute
//! the word under the pointer.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::handler::{TOKEN_CLOSE, TOKEN_EXPLORER, TOKEN_HIDDEN, TOKEN_PARENT, TOKEN_WIN};
use crate::host::HostEvent;

const SCROLL_STEP: isize = 3;

/// Byte offset of every line start in `body`.
pub fn line_starts(body: &[u8]) -> Vec<usize> {
    if body.is_empty() {
        return Vec::new();
    }
    let mut starts = vec![0];
    for (i, &b) in body.iter().enumerate() {
        if b == b'\n' && i + 1 < body.len() {
            starts.push(i + 1);
        }
    }
    starts
}

/// The text shown in the tag row.
pub fn tag_line(title: &str, tag: &str) -> String {
    format!("{} {} | {}", title, TOKEN_CLOSE, tag)
}

/// The whitespace-delimited word covering column `col`.
pub fn word_at(line: &str, col: usize) -> Option<&str> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let &(_, c) = chars.get(col)?;
    if c.is_whitespace() {
        return None;
    }
    let mut lo = col;
    while lo > 0 && !chars[lo - 1].1.is_whitespace() {
        lo -= 1;
    }
    let mut hi = col + 1;
    while hi < chars.len() && !chars[hi].1.is_whitespace() {
        hi += 1;
    }
    let end = chars.get(hi).map_or(line.len(), |&(i, _)| i);
    Some(&line[chars[lo].0..end])
}

fn execute(word: &str, location: Option<String>) -> HostEvent {
    HostEvent::TagExecute {
        text: word.to_string(),
        location,
    }
}

/// Cursor and scroll state of the body pane, plus the areas it was last
/// drawn into.
#[derive(Debug, Default, Clone)]
pub struct BodyView {
    pub cursor: usize,
    pub scroll: usize,
    pub tag_area: Rect,
    pub body_area: Rect,
}

impl BodyView {
    /// Keep the cursor on an existing line and inside the visible window.
    pub fn clamp(&mut self, lines: usize) {
        self.cursor = self.cursor.min(lines.saturating_sub(1));
        let height = (self.body_area.height as usize).max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + height {
            self.scroll = self.cursor + 1 - height;
        }
    }

    fn move_by(&mut self, delta: isize, lines: usize) {
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(lines.saturating_sub(1));
    }

    /// `name:#q0,#q1` covering the cursor line, without its newline.
    fn location(&self, title: &str, body: &[u8], starts: &[usize]) -> Option<String> {
        let q0 = *starts.get(self.cursor)?;
        let q1 = starts
            .get(self.cursor + 1)
            .map_or(body.len(), |next| next - 1);
        Some(format!("{}:#{},#{}", title, q0, q1))
    }

    /// Turn one terminal event into a host event, updating the cursor on
    /// the way.
    pub fn translate(
        &mut self,
        input: &CrosstermEvent,
        title: &str,
        tag: &str,
        body: &[u8],
    ) -> Option<HostEvent> {
        let starts = line_starts(body);
        match input {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                self.on_key(key, title, body, &starts)
            }
            CrosstermEvent::Mouse(mouse) => self.on_mouse(mouse, title, tag, &starts),
            _ => None,
        }
    }

    fn on_key(
        &mut self,
        key: &KeyEvent,
        title: &str,
        body: &[u8],
        starts: &[usize],
    ) -> Option<HostEvent> {
        let lines = starts.len();
        let page = isize::try_from(self.body_area.height.max(1)).unwrap_or(isize::MAX);
        let here = starts.get(self.cursor).copied();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(execute(TOKEN_CLOSE, None))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_by(1, lines);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_by(-1, lines);
                None
            }
            KeyCode::PageDown => {
                self.move_by(page, lines);
                None
            }
            KeyCode::PageUp => {
                self.move_by(-page, lines);
                None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor = 0;
                None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = lines.saturating_sub(1);
                None
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                here.map(|q0| HostEvent::BodyLook { q0, q1: q0 })
            }
            KeyCode::Char('p') => here.map(|q0| HostEvent::BodyExecute { q0 }),
            KeyCode::Backspace | KeyCode::Char('u') => Some(execute(TOKEN_PARENT, None)),
            KeyCode::Char('.') => Some(execute(TOKEN_HIDDEN, None)),
            KeyCode::Char('w') => Some(execute(TOKEN_WIN, self.location(title, body, starts))),
            KeyCode::Char('W') => Some(execute(TOKEN_WIN, None)),
            KeyCode::Char('n') => Some(execute(
                TOKEN_EXPLORER,
                self.location(title, body, starts),
            )),
            KeyCode::Char('N') => Some(execute(TOKEN_EXPLORER, None)),
            KeyCode::Char('q') => Some(execute(TOKEN_CLOSE, None)),
            _ => None,
        }
    }

    fn on_mouse(
        &mut self,
        mouse: &MouseEvent,
        title: &str,
        tag: &str,
        starts: &[usize],
    ) -> Option<HostEvent> {
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.tag_area.contains(at) => {
                let line = tag_line(title, tag);
                let col = usize::from(mouse.column - self.tag_area.x);
                word_at(&line, col).map(|word| execute(word, None))
            }
            MouseEventKind::Down(button) if self.body_area.contains(at) => {
                let row = self.scroll + usize::from(mouse.row - self.body_area.y);
                let q0 = *starts.get(row)?;
                self.cursor = row;
                match button {
                    MouseButton::Left => None,
                    MouseButton::Right => Some(HostEvent::BodyLook { q0, q1: q0 }),
                    MouseButton::Middle => Some(HostEvent::BodyExecute { q0 }),
                }
            }
            MouseEventKind::ScrollDown => {
                self.move_by(SCROLL_STEP, starts.len());
                None
            }
            MouseEventKind::ScrollUp => {
                self.move_by(-SCROLL_STEP, starts.len());
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: &str = "dirfold-/tmp";
    const TAG: &str = "DotDot Win Dirfold Hidden";
    const BODY: &[u8] = b"+ a\n  \tx\n  b\n\n\n\n";

    fn view() -> BodyView {
        BodyView {
            tag_area: Rect::new(0, 0, 80, 1),
            body_area: Rect::new(0, 1, 80, 10),
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(button: MouseButton, column: u16, row: u16) -> CrosstermEvent {
        CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn line_starts_of_body() {
        assert_eq!(line_starts(BODY), vec![0, 4, 9, 13, 14, 15]);
        assert_eq!(line_starts(b"no newline"), vec![0]);
        assert!(line_starts(b"").is_empty());
    }

    #[test]
    fn word_under_column() {
        let line = tag_line(TITLE, TAG);
        let col = line.find("Hidden").unwrap() + 2;
        assert_eq!(word_at(&line, col), Some("Hidden"));
        assert_eq!(word_at(&line, 0), Some(TITLE));
        assert_eq!(word_at(&line, TITLE.len()), None);
        assert_eq!(word_at(&line, 500), None);
    }

    #[test]
    fn cursor_moves_and_stays_in_bounds() {
        let mut v = view();
        v.translate(&key(KeyCode::Up), TITLE, TAG, BODY);
        assert_eq!(v.cursor, 0);
        v.translate(&key(KeyCode::Char('j')), TITLE, TAG, BODY);
        assert_eq!(v.cursor, 1);
        v.translate(&key(KeyCode::PageDown), TITLE, TAG, BODY);
        assert_eq!(v.cursor, 5);
        v.translate(&key(KeyCode::Char('g')), TITLE, TAG, BODY);
        assert_eq!(v.cursor, 0);
    }

    #[test]
    fn enter_looks_at_the_cursor_line() {
        let mut v = view();
        v.cursor = 2;
        assert_eq!(
            v.translate(&key(KeyCode::Enter), TITLE, TAG, BODY),
            Some(HostEvent::BodyLook { q0: 9, q1: 9 })
        );
        assert_eq!(
            v.translate(&key(KeyCode::Char('p')), TITLE, TAG, BODY),
            Some(HostEvent::BodyExecute { q0: 9 })
        );
    }

    #[test]
    fn launch_keys_carry_the_cursor_location() {
        let mut v = view();
        v.cursor = 1;
        assert_eq!(
            v.translate(&key(KeyCode::Char('w')), TITLE, TAG, BODY),
            Some(HostEvent::TagExecute {
                text: "Win".to_string(),
                location: Some("dirfold-/tmp:#4,#8".to_string()),
            })
        );
        assert_eq!(
            v.translate(&key(KeyCode::Char('N')), TITLE, TAG, BODY),
            Some(HostEvent::TagExecute {
                text: "Dirfold".to_string(),
                location: None,
            })
        );
    }

    #[test]
    fn quit_keys_execute_del() {
        let mut v = view();
        let del = Some(execute("Del", None));
        assert_eq!(v.translate(&key(KeyCode::Char('q')), TITLE, TAG, BODY), del);
        let ctrl_c = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(v.translate(&ctrl_c, TITLE, TAG, BODY), del);
    }

    #[test]
    fn mouse_buttons_on_the_body() {
        let mut v = view();
        assert_eq!(
            v.translate(&click(MouseButton::Right, 3, 2), TITLE, TAG, BODY),
            Some(HostEvent::BodyLook { q0: 4, q1: 4 })
        );
        assert_eq!(v.cursor, 1);
        assert_eq!(
            v.translate(&click(MouseButton::Middle, 3, 3), TITLE, TAG, BODY),
            Some(HostEvent::BodyExecute { q0: 9 })
        );
        assert_eq!(v.translate(&click(MouseButton::Left, 3, 1), TITLE, TAG, BODY), None);
        assert_eq!(v.cursor, 0);
        // below the last line
        assert_eq!(v.translate(&click(MouseButton::Right, 3, 9), TITLE, TAG, BODY), None);
    }

    #[test]
    fn clicking_a_tag_word_executes_it() {
        let mut v = view();
        let col = tag_line(TITLE, TAG).find("DotDot").unwrap() as u16;
        assert_eq!(
            v.translate(&click(MouseButton::Left, col, 0), TITLE, TAG, BODY),
            Some(execute("DotDot", None))
        );
    }

    #[test]
    fn clamp_scrolls_to_the_cursor() {
        let mut v = view();
        v.body_area.height = 2;
        v.cursor = 4;
        v.clamp(6);
        assert_eq!(v.scroll, 3);
        v.cursor = 9;
        v.clamp(6);
        assert_eq!(v.cursor, 5);
        assert_eq!(v.scroll, 4);
        v.cursor = 0;
        v.clamp(6);
        assert_eq!(v.scroll, 0);
    }
}
