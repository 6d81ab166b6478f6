//! One tree entry per line: `<flag><tabs><name>\n`.
//!
//! The flag is two bytes wide for both kinds so names line up in columns.
//! Depth is the number of leading tabs after the flag and is never stored
//! anywhere else. Names are raw bytes, so a name that is not valid UTF-8
//! still resolves back to its file.

/// Flag prefix of a directory line.
pub const DIR_FLAG: &[u8] = b"+ ";
/// Flag prefix of any other line.
pub const PLAIN_FLAG: &[u8] = b"  ";
/// Width of either flag.
pub const FLAG_WIDTH: usize = 2;
/// One level of indentation.
pub const INDENT: u8 = b'\t';
/// Line terminator.
pub const NEWLINE: u8 = b'\n';

/// Kind of entry a line stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn flag(self) -> &'static [u8] {
        match self {
            EntryKind::File => PLAIN_FLAG,
            EntryKind::Directory => DIR_FLAG,
        }
    }

    /// Kind advertised by the flag of a raw line.
    pub fn of_line(raw: &[u8]) -> Self {
        if raw.starts_with(DIR_FLAG) {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

/// A decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub depth: usize,
    pub name: &'a [u8],
}

/// Append the encoded form of one entry to `out`.
pub fn encode_into(out: &mut Vec<u8>, depth: usize, kind: EntryKind, name: impl AsRef<[u8]>) {
    out.extend_from_slice(kind.flag());
    out.resize(out.len() + depth, INDENT);
    out.extend_from_slice(name.as_ref());
    out.push(NEWLINE);
}

#[cfg(test)]
pub fn encode(depth: usize, kind: EntryKind, name: impl AsRef<[u8]>) -> Vec<u8> {
    let name = name.as_ref();
    let mut out = Vec::with_capacity(FLAG_WIDTH + depth + name.len() + 1);
    encode_into(&mut out, depth, kind, name);
    out
}

/// Decode a raw line, with or without its terminator.
///
/// Lines shorter than the flag (the blank trailer, for one) decode to depth
/// 0 with an empty name.
pub fn decode(raw: &[u8]) -> Line<'_> {
    let raw = raw.strip_suffix(&[NEWLINE]).unwrap_or(raw);
    let Some(rest) = raw.get(FLAG_WIDTH..) else {
        return Line { depth: 0, name: &[] };
    };
    let depth = rest.iter().take_while(|&&b| b == INDENT).count();
    Line {
        depth,
        name: &rest[depth..],
    }
}
