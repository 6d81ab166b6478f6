//! Address expressions for the host buffer.
//!
//! Grammar:
//!
//! ```text
//! range  := term? ( ',' term? )?
//! term   := simple ( ('+' | '-') ( '#' NUM | NUM? ) )*
//! simple := '#' NUM | NUM | '$'
//! ```
//!
//! `#n` is the empty range at byte `n`, `n` is line `n` (1-based, `0` is the
//! start of the body) and `$` is the end. `a+k` / `a-k` select the whole line
//! `k` lines after/before the line holding the start of `a` (`k` defaults to
//! 1, and `+0` is that line itself). `a+#k` / `a-#k` are the empty range `k`
//! bytes past the end / before the start of `a`. `a,b` spans from the start
//! of `a` to the end of `b`; a missing side defaults to `0` and `$`.

use std::fmt;
use std::str::FromStr;

use super::{HostError, HostResult};

/// A half-open byte range `q0..q1` in the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub q0: usize,
    pub q1: usize,
}

impl Span {
    pub fn new(q0: usize, q1: usize) -> Self {
        Self { q0, q1 }
    }

    /// The empty range at `q`.
    pub fn point(q: usize) -> Self {
        Self { q0: q, q1: q }
    }

    pub fn len(&self) -> usize {
        self.q1 - self.q0
    }
}

/// Direction of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Forward,
    Back,
}

impl Dir {
    fn sign(self) -> char {
        match self {
            Dir::Forward => '+',
            Dir::Back => '-',
        }
    }
}

/// A parsed address expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `#n`
    Char(usize),
    /// `n`
    Line(usize),
    /// `$`
    End,
    /// `a+k`, `a-k`
    Lines(Box<Address>, Dir, usize),
    /// `a+#k`, `a-#k`
    Chars(Box<Address>, Dir, usize),
    /// `a,b`
    Range(Box<Address>, Box<Address>),
}

impl Address {
    /// The whole body, `0,$`.
    pub fn all() -> Self {
        Address::Range(Box::new(Address::Line(0)), Box::new(Address::End))
    }

    /// The line `offset` lines away from the one containing byte `pos`.
    pub fn line_at(pos: usize, offset: isize) -> Self {
        let dir = if offset < 0 { Dir::Back } else { Dir::Forward };
        Address::Lines(Box::new(Address::Char(pos)), dir, offset.unsigned_abs())
    }

    /// The insertion point right after the line containing `pos`.
    pub fn after_line(pos: usize) -> Self {
        Address::Chars(Box::new(Self::line_at(pos, 0)), Dir::Forward, 0)
    }

    /// The `count` whole lines that follow the line containing `pos`.
    pub fn following_lines(pos: usize, count: usize) -> Self {
        Address::Range(
            Box::new(Self::line_at(pos, 1)),
            Box::new(Address::Lines(
                Box::new(Address::Char(pos)),
                Dir::Forward,
                count,
            )),
        )
    }

    /// Evaluate the address against `text`.
    pub fn evaluate(&self, text: &[u8]) -> HostResult<Span> {
        let len = text.len();
        let span = match self {
            Address::Char(q) if *q <= len => Some(Span::point(*q)),
            Address::Char(_) => None,
            Address::Line(0) => Some(Span::point(0)),
            Address::Line(n) => line_span(text, n - 1),
            Address::End => Some(Span::point(len)),
            Address::Lines(base, dir, k) => {
                let idx = line_index(text, base.evaluate(text)?.q0);
                match dir {
                    Dir::Forward => idx.checked_add(*k),
                    Dir::Back => idx.checked_sub(*k),
                }
                .and_then(|idx| line_span(text, idx))
            }
            Address::Chars(base, dir, k) => {
                let base = base.evaluate(text)?;
                let q = match dir {
                    Dir::Forward => base.q1.checked_add(*k),
                    Dir::Back => base.q0.checked_sub(*k),
                };
                q.filter(|q| *q <= len).map(Span::point)
            }
            Address::Range(a, b) => {
                let a = a.evaluate(text)?;
                let b = b.evaluate(text)?;
                (b.q1 >= a.q0).then(|| Span::new(a.q0, b.q1))
            }
        };
        span.ok_or_else(|| HostError::OutOfRange(self.to_string()))
    }
}

/// Index of the line holding byte `q`.
fn line_index(text: &[u8], q: usize) -> usize {
    text[..q.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

/// Byte range of line `idx` (0-based), terminator included.
fn line_span(text: &[u8], idx: usize) -> Option<Span> {
    let mut start = 0;
    for _ in 0..idx {
        let nl = text[start..].iter().position(|&b| b == b'\n')?;
        start += nl + 1;
    }
    if start >= text.len() {
        return None;
    }
    let end = text[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(text.len(), |nl| start + nl + 1);
    Some(Span::new(start, end))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Char(q) => write!(f, "#{q}"),
            Address::Line(n) => write!(f, "{n}"),
            Address::End => f.write_str("$"),
            Address::Lines(a, dir, k) => write!(f, "{a}{}{k}", dir.sign()),
            Address::Chars(a, dir, k) => write!(f, "{a}{}#{k}", dir.sign()),
            Address::Range(a, b) => write!(f, "{a},{b}"),
        }
    }
}

impl FromStr for Address {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            src: s.as_bytes(),
            pos: 0,
        };
        let addr = parser.range()?;
        if parser.pos != parser.src.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(addr)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, what: &str) -> HostError {
        HostError::BadAddress(format!(
            "{what} at {} in {:?}",
            self.pos,
            String::from_utf8_lossy(self.src)
        ))
    }

    fn at_term(&self) -> bool {
        matches!(self.peek(), Some(b'#' | b'$' | b'0'..=b'9'))
    }

    fn range(&mut self) -> HostResult<Address> {
        let start = if self.at_term() {
            Some(self.term()?)
        } else {
            None
        };
        if !self.eat(b',') {
            return start.ok_or_else(|| self.error("expected address"));
        }
        let end = if self.at_term() {
            self.term()?
        } else {
            Address::End
        };
        Ok(Address::Range(
            Box::new(start.unwrap_or(Address::Line(0))),
            Box::new(end),
        ))
    }

    fn term(&mut self) -> HostResult<Address> {
        let mut addr = self.simple()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let chars = self.eat(b'#');
            let n = match self.number()? {
                Some(n) => n,
                None if chars => return Err(self.error("expected offset")),
                None => 1,
            };
            let dir = if op == b'+' { Dir::Forward } else { Dir::Back };
            addr = if chars {
                Address::Chars(Box::new(addr), dir, n)
            } else {
                Address::Lines(Box::new(addr), dir, n)
            };
        }
        Ok(addr)
    }

    fn simple(&mut self) -> HostResult<Address> {
        if self.eat(b'#') {
            return self
                .number()?
                .map(Address::Char)
                .ok_or_else(|| self.error("expected offset"));
        }
        if self.eat(b'$') {
            return Ok(Address::End);
        }
        self.number()?
            .map(Address::Line)
            .ok_or_else(|| self.error("expected address"))
    }

    fn number(&mut self) -> HostResult<Option<usize>> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let digits = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("bad number"))?;
        digits
            .parse()
            .map(Some)
            .map_err(|_| self.error("number too large"))
    }
}
