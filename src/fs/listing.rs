use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::buffer::codec::{encode_into, EntryKind};
use crate::fs::name::{self, is_hidden};

/// A run of encoded lines ready to be written to the body in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub text: Vec<u8>,
    pub lines: usize,
}

impl Block {
    pub fn push(&mut self, depth: usize, kind: EntryKind, name: impl AsRef<[u8]>) {
        encode_into(&mut self.text, depth, kind, name);
        self.lines += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

/// A directory entry that survived filtering and probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: Vec<u8>,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Read, filter, sort and classify the entries of `dir`.
///
/// Names sort by byte order. Entries whose target has vanished (dangling
/// symlinks, races with deletion) are skipped with a warning; any other
/// probe failure aborts the listing.
pub fn read_entries(dir: &Path, show_hidden: bool) -> io::Result<Vec<Entry>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        let name = name::to_bytes(&entry.file_name()).into_owned();
        if !show_hidden && is_hidden(&name) {
            continue;
        }
        names.push((name, entry.path()));
    }
    names.sort_by(|a, b| a.0.cmp(&b.0));

    let mut entries = Vec::with_capacity(names.len());
    for (name, path) in names {
        let kind = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("skipping {}: {}", path.display(), err);
                continue;
            }
            Err(err) => return Err(err),
        };
        entries.push(Entry { name, path, kind });
    }
    Ok(entries)
}

/// Turns directories into blocks of lines.
#[derive(Debug, Clone, Copy)]
pub struct ListingGenerator {
    show_hidden: bool,
}

impl ListingGenerator {
    /// A generator bound to the hidden-file setting in force right now.
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }

    /// Render the entries of `dir` at `depth`.
    ///
    /// A directory whose only entry is itself a directory is expanded
    /// inline, so chains like `a/b/c` show up in one go.
    pub fn render(&self, dir: &Path, depth: usize) -> io::Result<Block> {
        let mut block = Block::default();
        self.render_into(&mut block, dir, depth)?;
        Ok(block)
    }

    fn render_into(&self, block: &mut Block, dir: &Path, depth: usize) -> io::Result<()> {
        let entries = read_entries(dir, self.show_hidden)?;
        for entry in &entries {
            block.push(depth, entry.kind, &entry.name);
        }
        if let [only] = entries.as_slice() {
            if only.kind == EntryKind::Directory {
                log::debug!("expanding single child {}", only.path.display());
                // What was listed so far stays; the child just remains folded
                if let Err(err) = self.render_into(block, &only.path, depth + 1) {
                    log::warn!("not expanding {}: {}", only.path.display(), err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::codec::decode;
    use std::fs::File;
    use tempfile::TempDir;

    fn rows(block: &Block) -> Vec<(usize, EntryKind, String)> {
        block
            .text
            .split_inclusive(|&b| b == b'\n')
            .map(|raw| {
                let line = decode(raw);
                let name = String::from_utf8_lossy(line.name).into_owned();
                (line.depth, EntryKind::of_line(raw), name)
            })
            .collect()
    }

    fn row(depth: usize, kind: EntryKind, name: &str) -> (usize, EntryKind, String) {
        (depth, kind, name.to_string())
    }

    #[test]
    fn sorted_by_byte_order_with_kinds() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("bravo")).unwrap();
        File::create(dir.path().join("alpha.txt")).unwrap();
        File::create(dir.path().join("Zulu")).unwrap();

        let block = ListingGenerator::new(false).render(dir.path(), 0).unwrap();
        assert_eq!(
            rows(&block),
            vec![
                row(0, EntryKind::File, "Zulu"),
                row(0, EntryKind::File, "alpha.txt"),
                row(0, EntryKind::Directory, "bravo"),
            ]
        );
        assert_eq!(block.lines, 3);
    }

    #[test]
    fn hidden_entries_follow_the_flag() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("x")).unwrap();
        File::create(dir.path().join(".y")).unwrap();

        let names = |show| -> Vec<String> {
            rows(&ListingGenerator::new(show).render(dir.path(), 0).unwrap())
                .into_iter()
                .map(|r| r.2)
                .collect()
        };
        let mut show = false;
        let original = names(show);
        assert_eq!(original, vec!["x"]);
        show = !show;
        assert_eq!(names(show), vec![".y", "x"]);
        show = !show;
        assert_eq!(names(show), original);
    }

    #[test]
    fn single_directory_chains_expand_inline() {
        let dir = TempDir::new().unwrap();
        let c = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&c).unwrap();
        File::create(c.join("d.txt")).unwrap();

        let block = ListingGenerator::new(false).render(dir.path(), 0).unwrap();
        assert_eq!(
            rows(&block),
            vec![
                row(0, EntryKind::Directory, "a"),
                row(1, EntryKind::Directory, "b"),
                row(2, EntryKind::Directory, "c"),
                row(3, EntryKind::File, "d.txt"),
            ]
        );
    }

    #[test]
    fn two_entries_do_not_expand() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a").join("inner")).unwrap();
        File::create(dir.path().join("b")).unwrap();

        let block = ListingGenerator::new(false).render(dir.path(), 2).unwrap();
        assert_eq!(
            rows(&block),
            vec![row(2, EntryKind::Directory, "a"), row(2, EntryKind::File, "b")]
        );
    }

    #[test]
    fn hidden_siblings_do_not_block_auto_expansion() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("only").join("leaf")).unwrap();
        File::create(dir.path().join(".git")).unwrap();

        let block = ListingGenerator::new(false).render(dir.path(), 0).unwrap();
        assert_eq!(
            rows(&block),
            vec![
                row(0, EntryKind::Directory, "only"),
                row(1, EntryKind::Directory, "leaf"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlinks_are_skipped() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let block = ListingGenerator::new(false).render(dir.path(), 0).unwrap();
        assert_eq!(rows(&block), vec![row(0, EntryKind::File, "real")]);
    }

    #[cfg(unix)]
    #[test]
    fn failed_auto_expansion_keeps_the_listing() {
        // `loop` holds nothing but a link back to itself, so expansion
        // descends until the kernel refuses to follow more links
        let dir = TempDir::new().unwrap();
        let looped = dir.path().join("loop");
        fs::create_dir(&looped).unwrap();
        std::os::unix::fs::symlink(".", looped.join("self")).unwrap();

        let block = ListingGenerator::new(false).render(&looped, 1).unwrap();
        let listed = rows(&block);
        assert_eq!(listed[0], row(1, EntryKind::Directory, "self"));
        for (i, r) in listed.iter().enumerate() {
            assert_eq!(*r, row(1 + i, EntryKind::Directory, "self"));
        }
        assert_eq!(block.lines, listed.len());
    }

    #[cfg(unix)]
    #[test]
    fn names_that_are_not_utf8_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let dir = TempDir::new().unwrap();
        let raw = b"caf\xe9.txt";
        File::create(dir.path().join(std::ffi::OsStr::from_bytes(raw))).unwrap();

        let entries = read_entries(dir.path(), false).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, raw);

        let block = ListingGenerator::new(false).render(dir.path(), 0).unwrap();
        assert_eq!(block.text, b"  caf\xe9.txt\n");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ListingGenerator::new(false).render(&dir.path().join("nope"), 0);
        assert!(result.is_err());
    }
}
