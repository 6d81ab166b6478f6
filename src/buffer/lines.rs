use crate::host::{Address, Host, HostError, HostResult};

use super::codec::{self, Line};

/// Size of one read from the host.
pub const READ_CHUNK: usize = 512;

/// Reads whole lines out of the host body relative to a byte position.
///
/// Every read lands in the same scratch buffer, and the decoded line
/// borrows from it, so a line must be dropped (or its name copied) before
/// the next read.
pub struct LineReader<'a, H: Host + ?Sized> {
    host: &'a mut H,
    scratch: &'a mut Vec<u8>,
}

impl<'a, H: Host + ?Sized> LineReader<'a, H> {
    pub fn new(host: &'a mut H, scratch: &'a mut Vec<u8>) -> Self {
        Self { host, scratch }
    }

    /// Read the full addressed range.
    pub fn read(&mut self, addr: &Address) -> HostResult<&[u8]> {
        self.host.set_addr(addr)?;
        self.scratch.clear();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = self.host.read_data(&mut chunk)?;
            if n == 0 {
                break;
            }
            self.scratch.extend_from_slice(&chunk[..n]);
        }
        Ok(self.scratch.as_slice())
    }

    /// The line `offset` lines away from the one containing `pos`.
    pub fn line(&mut self, pos: usize, offset: isize) -> HostResult<Line<'_>> {
        let raw = self.read(&Address::line_at(pos, offset))?;
        Ok(codec::decode(raw))
    }

    /// Like [`line`](Self::line), with running off the buffer reported as `None`.
    pub fn try_line(&mut self, pos: usize, offset: isize) -> HostResult<Option<Line<'_>>> {
        match self.read(&Address::line_at(pos, offset)) {
            Ok(raw) => Ok(Some(codec::decode(raw))),
            Err(HostError::OutOfRange(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn reads_lines_around_a_position() {
        let mut host = MemoryHost::new();
        host.append_body(b"+ a\n  \tb\n  c\n").unwrap();
        let mut scratch = Vec::new();
        let mut reader = LineReader::new(&mut host, &mut scratch);

        let line = reader.line(5, 0).unwrap();
        assert_eq!((line.depth, line.name), (1, &b"b"[..]));
        let line = reader.line(5, -1).unwrap();
        assert_eq!((line.depth, line.name), (0, &b"a"[..]));
        assert!(reader.try_line(5, 2).unwrap().is_none());
        assert!(reader.line(5, -2).is_err());
    }

    #[test]
    fn long_lines_span_several_chunks() {
        let name = "n".repeat(READ_CHUNK * 3);
        let mut host = MemoryHost::new();
        host.append_body(&codec::encode(0, codec::EntryKind::File, &name))
            .unwrap();
        let mut scratch = Vec::new();
        let mut reader = LineReader::new(&mut host, &mut scratch);
        assert_eq!(reader.line(0, 0).unwrap().name, name.as_bytes());
    }
}
