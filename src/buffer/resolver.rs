//! Path reconstruction by scanning backwards through the body.
//!
//! A line's parent is the nearest earlier line that is strictly shallower.
//! Every line in between is a sibling or belongs to a sibling's block, so
//! the first shallower line found walking backwards is always the parent.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::fs::name;
use crate::host::{Host, HostResult};

use super::lines::LineReader;

/// A resolved body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub depth: usize,
    pub name: OsString,
    pub path: PathBuf,
}

/// Path of the directories enclosing the line at `pos`, relative to the root.
pub fn resolve_ancestors<H: Host + ?Sized>(
    reader: &mut LineReader<'_, H>,
    pos: usize,
    depth: usize,
) -> HostResult<PathBuf> {
    ancestors_above(reader, pos, depth, 1)
}

fn ancestors_above<H: Host + ?Sized>(
    reader: &mut LineReader<'_, H>,
    pos: usize,
    depth: usize,
    mut back: usize,
) -> HostResult<PathBuf> {
    if depth == 0 {
        return Ok(PathBuf::new());
    }
    loop {
        let offset = isize::try_from(back).unwrap_or(isize::MAX);
        let line = reader.line(pos, -offset)?;
        if line.depth < depth {
            let parent_depth = line.depth;
            let name = name::from_bytes(line.name);
            let mut prefix = ancestors_above(reader, pos, parent_depth, back + 1)?;
            prefix.push(name);
            return Ok(prefix);
        }
        back += 1;
    }
}

/// Resolve the line containing `pos` to an absolute path under `root`.
pub fn resolve<H: Host + ?Sized>(
    reader: &mut LineReader<'_, H>,
    root: &Path,
    pos: usize,
) -> HostResult<Target> {
    let line = reader.line(pos, 0)?;
    let depth = line.depth;
    let name = name::from_bytes(line.name);

    let ancestors = resolve_ancestors(reader, pos, depth)?;
    let mut path = root.to_path_buf();
    path.extend(ancestors.iter());
    if !name.is_empty() {
        path.push(&name);
    }
    Ok(Target { depth, name, path })
}
