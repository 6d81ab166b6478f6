//! The host buffer protocol.
//!
//! The tree never lives in memory: it is text inside a buffer owned by a
//! host. Everything the explorer does goes through the narrow [`Host`]
//! interface below: set an address, read or replace the addressed bytes,
//! and push the occasional event or control message back.

pub mod address;
pub mod memory;

use std::fmt;

use thiserror::Error;

pub use address::{Address, Span};
pub use memory::MemoryHost;

/// Result type for host protocol calls.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Failures reported by the host buffer.
#[derive(Debug, Error)]
pub enum HostError {
    /// The address expression could not be parsed.
    #[error("bad address: {0}")]
    BadAddress(String),

    /// The address is well formed but points outside the buffer.
    #[error("address out of range: {0}")]
    OutOfRange(String),

    /// The window has been deleted.
    #[error("window closed")]
    Closed,

    /// Transport failure talking to the host.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Control messages understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ctl {
    /// Mark the body as unmodified.
    Clean,
    /// Close the window.
    Delete,
}

/// Interaction events delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A word was executed in the tag. `location` is the `name:#q0,#q1`
    /// address of the body selection when one accompanied the command.
    TagExecute {
        text: String,
        location: Option<String>,
    },
    /// The body was executed at `q0`.
    BodyExecute { q0: usize },
    /// The body was looked at. A non-empty `q0..q1` is a text selection.
    BodyLook { q0: usize, q1: usize },
    /// A word was looked at in the tag.
    TagLook { text: String },
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::TagExecute {
                text,
                location: Some(loc),
            } => write!(f, "execute {text} at {loc}"),
            HostEvent::TagExecute { text, .. } => write!(f, "execute {text}"),
            HostEvent::BodyExecute { q0 } => write!(f, "execute body #{q0}"),
            HostEvent::BodyLook { q0, q1 } => write!(f, "look body #{q0},#{q1}"),
            HostEvent::TagLook { text } => write!(f, "look {text}"),
        }
    }
}

/// An editable window: a title, a tag line and a body addressed by byte ranges.
pub trait Host {
    /// Replace the window title.
    fn set_title(&mut self, title: &str) -> HostResult<()>;

    /// Append text to the tag.
    fn write_tag(&mut self, text: &str) -> HostResult<()>;

    /// Append bytes at the end of the body without touching the address.
    fn append_body(&mut self, bytes: &[u8]) -> HostResult<()>;

    /// Evaluate `addr` against the body and make it the current address.
    fn set_addr(&mut self, addr: &Address) -> HostResult<()>;

    /// Read from the start of the current address into `buf`.
    ///
    /// The address start advances past the bytes read; `Ok(0)` means the
    /// addressed range is exhausted.
    fn read_data(&mut self, buf: &mut [u8]) -> HostResult<usize>;

    /// Replace the current address with `bytes`. Afterwards the address is
    /// the empty range just past the written text, so consecutive writes
    /// append.
    fn write_data(&mut self, bytes: &[u8]) -> HostResult<()>;

    /// Hand an event back to the host for its default handling.
    fn write_event(&mut self, event: &HostEvent) -> HostResult<()>;

    /// Send a control message.
    fn ctl(&mut self, ctl: Ctl) -> HostResult<()>;
}
