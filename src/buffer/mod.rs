//! Tree semantics recovered from the flat body text.

pub mod codec;
pub mod fold;
pub mod lines;
pub mod resolver;
