use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::buffer::fold::{self, Toggle};
use crate::buffer::lines::LineReader;
use crate::buffer::resolver::{self, Target};
use crate::error::Result;
use crate::fs::listing::ListingGenerator;
use crate::handler::Command;
use crate::host::{Address, Ctl, Host};
use crate::launch::{LaunchTarget, Launcher};

/// Commands offered in the window tag.
pub const TAG_TOKENS: &str = "DotDot Win Dirfold Hidden";

/// Prefix of the window title; the root path follows it.
pub const TITLE_PREFIX: &str = "dirfold-";

/// Blank lines appended after the root listing.
pub const TRAILER: &[u8] = b"\n\n\n";

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Mutable state shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub root: PathBuf,
    pub show_hidden: bool,
}

/// What a look at a body line did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A non-directory was handed to the opener.
    Opened(PathBuf),
    /// A directory line was folded or unfolded.
    Toggled { path: PathBuf, toggle: Toggle },
    /// The line was blank.
    Ignored,
}

/// A program waiting to take over the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foreground {
    pub target: LaunchTarget,
    pub cwd: PathBuf,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Parent of `path`, or `path` itself at the filesystem root.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().unwrap_or(path).to_path_buf()
}

/// Main application state.
pub struct App<H: Host, L: Launcher> {
    pub host: H,
    pub session: Session,
    launcher: L,
    scratch: Vec<u8>,
    foreground: Option<Foreground>,
    pub should_quit: bool,
    pub status_message: Option<StatusMessage>,
}

impl<H: Host, L: Launcher> App<H, L> {
    /// Create a new App rooted at the given path. Nothing is drawn until
    /// [`App::init`].
    pub fn new(host: H, root: &Path, show_hidden: bool, launcher: L) -> Self {
        Self {
            host,
            session: Session {
                root: root.to_path_buf(),
                show_hidden,
            },
            launcher,
            scratch: Vec::new(),
            foreground: None,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn title(&self) -> String {
        format!("{}{}", TITLE_PREFIX, self.session.root.display())
    }

    /// Write the tag and draw the root listing.
    pub fn init(&mut self) -> Result<()> {
        self.host.write_tag(TAG_TOKENS)?;
        let root = self.session.root.clone();
        self.draw_root(root)
    }

    fn generator(&self) -> ListingGenerator {
        ListingGenerator::new(self.session.show_hidden)
    }

    /// Replace the whole body with the listing of `root`.
    ///
    /// The listing is read before anything is cleared, so a directory that
    /// cannot be read leaves the window as it was.
    fn draw_root(&mut self, root: PathBuf) -> Result<()> {
        let block = self.generator().render(&root, 0)?;
        self.session.root = root;
        self.host.set_title(&self.title())?;
        self.host.set_addr(&Address::all())?;
        self.host.write_data(&block.text)?;
        self.host.append_body(TRAILER)?;
        self.host.ctl(Ctl::Clean)?;
        log::info!("root is {}", self.session.root.display());
        Ok(())
    }

    /// Re-root at the parent directory. Folding state is discarded.
    pub fn go_to_parent(&mut self) -> Result<()> {
        let parent = parent_dir(&self.session.root);
        self.draw_root(parent)
    }

    /// Flip the hidden-file setting. Only later listings are affected.
    pub fn toggle_hidden(&mut self) -> bool {
        self.session.show_hidden = !self.session.show_hidden;
        self.session.show_hidden
    }

    /// Resolve the body line containing `pos`.
    pub fn resolve(&mut self, pos: usize) -> Result<Target> {
        let mut reader = LineReader::new(&mut self.host, &mut self.scratch);
        Ok(resolver::resolve(&mut reader, &self.session.root, pos)?)
    }

    /// Open the entry at `pos`, or fold/unfold it if it is a directory.
    pub fn activate(&mut self, pos: usize) -> Result<Activation> {
        let target = self.resolve(pos)?;
        if target.name.is_empty() {
            return Ok(Activation::Ignored);
        }

        if !fs::metadata(&target.path)?.is_dir() {
            self.launcher.open(&target.path)?;
            self.host.ctl(Ctl::Clean)?;
            return Ok(Activation::Opened(target.path));
        }

        let generator = self.generator();
        let dir = target.path.as_path();
        let toggle = fold::toggle(
            &mut self.host,
            &mut self.scratch,
            pos,
            target.depth,
            |depth| Ok(generator.render(dir, depth)?),
        )?;
        self.host.ctl(Ctl::Clean)?;
        log::debug!("{}: {:?}", target.path.display(), toggle);
        Ok(Activation::Toggled {
            path: target.path,
            toggle,
        })
    }

    /// Full path of the entry at `pos`, or `None` for a blank line.
    pub fn print_path(&mut self, pos: usize) -> Result<Option<PathBuf>> {
        let target = self.resolve(pos)?;
        if target.name.is_empty() {
            return Ok(None);
        }
        log::info!("{}", target.path.display());
        Ok(Some(target.path))
    }

    /// Start `target` in the root, or in the directory of the line at `at`.
    ///
    /// A target that draws on this terminal is only queued; the event loop
    /// hands the terminal over with [`App::run_foreground`].
    pub fn launch(&mut self, target: LaunchTarget, at: Option<usize>) -> Result<PathBuf> {
        let cwd = match at {
            None => self.session.root.clone(),
            Some(pos) => {
                let resolved = self.resolve(pos)?;
                if fs::metadata(&resolved.path)?.is_dir() {
                    resolved.path
                } else {
                    parent_dir(&resolved.path)
                }
            }
        };
        if target.shares_terminal() {
            self.foreground = Some(Foreground {
                target,
                cwd: cwd.clone(),
            });
        } else {
            self.launcher.spawn(target, &cwd)?;
        }
        Ok(cwd)
    }

    pub fn take_foreground(&mut self) -> Option<Foreground> {
        self.foreground.take()
    }

    /// Run a queued program and wait for it to finish.
    pub fn run_foreground(&mut self, job: &Foreground) -> Result<String> {
        self.launcher.run(job.target, &job.cwd)?;
        Ok(format!(
            "{} in {} finished",
            job.target.name(),
            job.cwd.display()
        ))
    }

    /// Run a routed command. Returns a message worth showing, if any.
    pub fn run(&mut self, command: Command) -> Result<Option<String>> {
        match command {
            Command::Parent => {
                self.go_to_parent()?;
                Ok(None)
            }
            Command::ToggleHidden => {
                let msg = if self.toggle_hidden() {
                    "showing hidden files"
                } else {
                    "hiding hidden files"
                };
                Ok(Some(msg.to_string()))
            }
            Command::Launch { target, at } => {
                let cwd = self.launch(target, at)?;
                if target.shares_terminal() {
                    return Ok(None);
                }
                Ok(Some(format!("started {} in {}", target.name(), cwd.display())))
            }
            Command::PrintPath { q0 } => Ok(self.print_path(q0)?.map(|p| p.display().to_string())),
            Command::Activate { q0 } => Ok(match self.activate(q0)? {
                Activation::Opened(path) => Some(format!("opened {}", path.display())),
                Activation::Toggled {
                    path,
                    toggle: Toggle::Empty,
                } => Some(format!("{} is empty", path.display())),
                _ => None,
            }),
        }
    }

    /// Close the window and stop the event loop.
    pub fn close(&mut self) {
        if let Err(e) = self.host.ctl(Ctl::Delete) {
            log::warn!("closing window: {}", e);
        }
        self.should_quit = true;
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: false,
            created: Instant::now(),
        });
    }

    pub fn set_error_message(&mut self, text: String) {
        self.status_message = Some(StatusMessage {
            text,
            is_error: true,
            created: Instant::now(),
        });
    }

    /// Periodic housekeeping between events.
    pub fn tick(&mut self) {
        self.clear_expired_status();
        self.launcher.reap();
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed() >= STATUS_TTL {
                self.status_message = None;
            }
        }
    }
}
