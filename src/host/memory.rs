use super::{Address, Ctl, Host, HostError, HostEvent, HostResult, Span};

/// A window kept entirely in memory.
///
/// Backs the terminal front end and the tests. Address, read and write
/// semantics follow the [`Host`] contract exactly, so the explorer cannot
/// tell it apart from a remote host.
#[derive(Debug, Default)]
pub struct MemoryHost {
    title: String,
    tag: String,
    body: Vec<u8>,
    addr: Span,
    dirty: bool,
    deleted: bool,
    forwarded: Vec<HostEvent>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The current address.
    #[cfg(test)]
    pub fn addr(&self) -> Span {
        self.addr
    }

    /// Whether the body changed since the last `Ctl::Clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[cfg(test)]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Drain the events handed back with `write_event`.
    pub fn take_forwarded(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.forwarded)
    }

    fn ensure_open(&self) -> HostResult<()> {
        if self.deleted {
            Err(HostError::Closed)
        } else {
            Ok(())
        }
    }

    /// The current address clamped to the body, which may have shrunk.
    fn clamped(&self) -> Span {
        let q1 = self.addr.q1.min(self.body.len());
        Span::new(self.addr.q0.min(q1), q1)
    }
}

impl Host for MemoryHost {
    fn set_title(&mut self, title: &str) -> HostResult<()> {
        self.ensure_open()?;
        self.title = title.to_string();
        Ok(())
    }

    fn write_tag(&mut self, text: &str) -> HostResult<()> {
        self.ensure_open()?;
        self.tag.push_str(text);
        Ok(())
    }

    fn append_body(&mut self, bytes: &[u8]) -> HostResult<()> {
        self.ensure_open()?;
        self.body.extend_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }

    fn set_addr(&mut self, addr: &Address) -> HostResult<()> {
        self.ensure_open()?;
        self.addr = addr.evaluate(&self.body)?;
        Ok(())
    }

    fn read_data(&mut self, buf: &mut [u8]) -> HostResult<usize> {
        self.ensure_open()?;
        let span = self.clamped();
        let n = span.len().min(buf.len());
        buf[..n].copy_from_slice(&self.body[span.q0..span.q0 + n]);
        self.addr = Span::new(span.q0 + n, span.q1);
        Ok(n)
    }

    fn write_data(&mut self, bytes: &[u8]) -> HostResult<()> {
        self.ensure_open()?;
        let span = self.clamped();
        self.body.splice(span.q0..span.q1, bytes.iter().copied());
        self.addr = Span::point(span.q0 + bytes.len());
        self.dirty = true;
        Ok(())
    }

    fn write_event(&mut self, event: &HostEvent) -> HostResult<()> {
        self.ensure_open()?;
        self.forwarded.push(event.clone());
        Ok(())
    }

    fn ctl(&mut self, ctl: Ctl) -> HostResult<()> {
        self.ensure_open()?;
        match ctl {
            Ctl::Clean => self.dirty = false,
            Ctl::Delete => self.deleted = true,
        }
        Ok(())
    }
}
