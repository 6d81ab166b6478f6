//! Expand and collapse directory lines in place.
//!
//! Fold state is never stored. A directory line is expanded exactly when
//! the line after it is deeper; a directory on the last line of the body is
//! folded.

use crate::error::Result;
use crate::fs::listing::Block;
use crate::host::{Address, Host, HostResult};

use super::lines::LineReader;

/// What a toggle did to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// A block of `lines` lines was inserted under the directory.
    Expanded { lines: usize },
    /// The directory's block of `lines` lines was removed.
    Collapsed { lines: usize },
    /// The directory lists nothing; the body is untouched and the line
    /// stays folded.
    Empty,
}

pub fn is_folded<H: Host + ?Sized>(reader: &mut LineReader<'_, H>, pos: usize) -> HostResult<bool> {
    let depth = reader.line(pos, 0)?.depth;
    Ok(match reader.try_line(pos, 1)? {
        Some(next) => next.depth <= depth,
        None => true,
    })
}

/// Number of lines under the line at `pos` that are deeper than `depth`.
pub fn block_len<H: Host + ?Sized>(
    reader: &mut LineReader<'_, H>,
    pos: usize,
    depth: usize,
) -> HostResult<usize> {
    let mut count = 0usize;
    loop {
        let offset = isize::try_from(count + 1).unwrap_or(isize::MAX);
        match reader.try_line(pos, offset)? {
            Some(line) if line.depth > depth => count += 1,
            _ => return Ok(count),
        }
    }
}

/// Insert `block` right after the line at `pos`.
pub fn insert_block<H: Host + ?Sized>(host: &mut H, pos: usize, block: &[u8]) -> HostResult<()> {
    host.set_addr(&Address::after_line(pos))?;
    host.write_data(block)
}

/// Delete the `lines` lines following the line at `pos` in one write.
pub fn delete_block<H: Host + ?Sized>(host: &mut H, pos: usize, lines: usize) -> HostResult<()> {
    if lines == 0 {
        return Ok(());
    }
    host.set_addr(&Address::following_lines(pos, lines))?;
    host.write_data(b"")
}

/// Flip the directory line at `pos`.
///
/// `list` produces the block for the directory's children at `depth + 1`;
/// it is only called when the line is folded.
pub fn toggle<H, F>(
    host: &mut H,
    scratch: &mut Vec<u8>,
    pos: usize,
    depth: usize,
    list: F,
) -> Result<Toggle>
where
    H: Host + ?Sized,
    F: FnOnce(usize) -> Result<Block>,
{
    let mut reader = LineReader::new(&mut *host, &mut *scratch);
    if is_folded(&mut reader, pos)? {
        let block = list(depth + 1)?;
        if block.is_empty() {
            return Ok(Toggle::Empty);
        }
        insert_block(host, pos, &block.text)?;
        Ok(Toggle::Expanded { lines: block.lines })
    } else {
        let lines = block_len(&mut reader, pos, depth)?;
        delete_block(host, pos, lines)?;
        Ok(Toggle::Collapsed { lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::codec::{encode_into, EntryKind};
    use crate::host::MemoryHost;

    fn host_with(rows: &[(usize, &str)]) -> (MemoryHost, Vec<usize>) {
        let mut text = Vec::new();
        let mut starts = Vec::new();
        for (depth, name) in rows {
            starts.push(text.len());
            encode_into(&mut text, *depth, EntryKind::Directory, name);
        }
        let mut host = MemoryHost::new();
        host.append_body(&text).unwrap();
        (host, starts)
    }

    fn block(rows: &[(usize, &str)]) -> Block {
        let mut b = Block::default();
        for (depth, name) in rows {
            b.push(*depth, EntryKind::File, name);
        }
        b
    }

    #[test]
    fn folded_when_next_line_is_not_deeper() {
        let (mut host, starts) = host_with(&[(0, "a"), (1, "b"), (1, "c"), (0, "d")]);
        let mut scratch = Vec::new();
        let mut reader = LineReader::new(&mut host, &mut scratch);
        assert!(!is_folded(&mut reader, starts[0]).unwrap());
        assert!(is_folded(&mut reader, starts[1]).unwrap());
        assert!(is_folded(&mut reader, starts[2]).unwrap());
    }

    #[test]
    fn last_line_is_folded() {
        let (mut host, starts) = host_with(&[(0, "a"), (0, "z")]);
        let mut scratch = Vec::new();
        let mut reader = LineReader::new(&mut host, &mut scratch);
        assert!(is_folded(&mut reader, starts[1]).unwrap());
    }

    #[test]
    fn collapse_stops_at_first_line_not_deeper() {
        let (mut host, starts) = host_with(&[
            (0, "top"),
            (1, "a"),
            (2, "a1"),
            (2, "a2"),
            (1, "b"),
            (0, "next"),
            (1, "n1"),
        ]);
        let mut scratch = Vec::new();
        let done = toggle(&mut host, &mut scratch, starts[0], 0, |_| {
            panic!("collapse must not list")
        })
        .unwrap();
        assert_eq!(done, Toggle::Collapsed { lines: 4 });

        let (expect, _) = host_with(&[(0, "top"), (0, "next"), (1, "n1")]);
        assert_eq!(host.body(), expect.body());
    }

    #[test]
    fn collapse_runs_to_end_of_body() {
        let (mut host, starts) = host_with(&[(0, "top"), (1, "a"), (2, "b")]);
        let mut scratch = Vec::new();
        let mut reader = LineReader::new(&mut host, &mut scratch);
        assert_eq!(block_len(&mut reader, starts[0], 0).unwrap(), 2);
        assert_eq!(block_len(&mut reader, starts[1], 1).unwrap(), 1);
        assert_eq!(block_len(&mut reader, starts[2], 2).unwrap(), 0);
    }

    #[test]
    fn expand_inserts_after_line_at_next_depth() {
        let (mut host, starts) = host_with(&[(0, "a"), (0, "b")]);
        let mut scratch = Vec::new();
        let done = toggle(&mut host, &mut scratch, starts[0] + 2, 0, |depth| {
            assert_eq!(depth, 1);
            Ok(block(&[(1, "x"), (1, "y")]))
        })
        .unwrap();
        assert_eq!(done, Toggle::Expanded { lines: 2 });
        assert_eq!(host.body(), b"+ a\n  \tx\n  \ty\n+ b\n");
    }

    #[test]
    fn toggle_twice_restores_body() {
        let (mut host, starts) = host_with(&[(0, "a"), (1, "keep"), (0, "b"), (0, "c")]);
        let before = host.body().to_vec();
        let mut scratch = Vec::new();
        let pos = starts[2];
        toggle(&mut host, &mut scratch, pos, 0, |d| {
            Ok(block(&[(d, "one"), (d + 1, "two"), (d, "three")]))
        })
        .unwrap();
        assert_ne!(host.body(), before.as_slice());
        let done = toggle(&mut host, &mut scratch, pos, 0, |_| unreachable!()).unwrap();
        assert_eq!(done, Toggle::Collapsed { lines: 3 });
        assert_eq!(host.body(), before.as_slice());
    }

    #[test]
    fn empty_listing_leaves_body_untouched() {
        let (mut host, starts) = host_with(&[(0, "a")]);
        let before = host.body().to_vec();
        let mut scratch = Vec::new();
        let done = toggle(&mut host, &mut scratch, starts[0], 0, |_| Ok(Block::default())).unwrap();
        assert_eq!(done, Toggle::Empty);
        assert_eq!(host.body(), before.as_slice());
    }
}
