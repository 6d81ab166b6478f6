//! Maps host events onto explorer commands.

use crate::app::App;
use crate::host::{Address, Host, HostEvent};
use crate::launch::{LaunchTarget, Launcher};

pub const TOKEN_PARENT: &str = "DotDot";
pub const TOKEN_HIDDEN: &str = "Hidden";
pub const TOKEN_WIN: &str = "Win";
pub const TOKEN_EXPLORER: &str = "Dirfold";
pub const TOKEN_CLOSE: &str = "Del";

/// Something the explorer does in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Parent,
    ToggleHidden,
    /// Start a program, in the directory of the line at `at` if given.
    Launch {
        target: LaunchTarget,
        at: Option<usize>,
    },
    PrintPath {
        q0: usize,
    },
    Activate {
        q0: usize,
    },
}

/// Where an event ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Run(Command),
    /// Not ours; hand it back to the host's default handling.
    Forward(HostEvent),
    Close,
    /// Dropped silently.
    Ignore,
}

/// Start offset of a `name:#q0,#q1` event location.
pub fn location_offset(loc: &str) -> Option<usize> {
    let (_, addr) = loc.rsplit_once(':')?;
    match addr.parse::<Address>().ok()? {
        Address::Char(q0) => Some(q0),
        Address::Range(start, _) => match *start {
            Address::Char(q0) => Some(q0),
            _ => None,
        },
        _ => None,
    }
}

pub fn route(event: HostEvent) -> Routed {
    match event {
        HostEvent::TagExecute { text, location } => {
            let at = location.as_deref().and_then(location_offset);
            let command = match text.trim() {
                TOKEN_PARENT => Some(Command::Parent),
                TOKEN_HIDDEN => Some(Command::ToggleHidden),
                TOKEN_WIN => Some(Command::Launch {
                    target: LaunchTarget::Shell,
                    at,
                }),
                TOKEN_EXPLORER => Some(Command::Launch {
                    target: LaunchTarget::Explorer,
                    at,
                }),
                TOKEN_CLOSE => return Routed::Close,
                _ => None,
            };
            match command {
                Some(command) => Routed::Run(command),
                None => Routed::Forward(HostEvent::TagExecute { text, location }),
            }
        }
        HostEvent::BodyExecute { q0 } => Routed::Run(Command::PrintPath { q0 }),
        // A selection is a look at text, not at an entry
        HostEvent::BodyLook { q0, q1 } if q0 != q1 => Routed::Ignore,
        HostEvent::BodyLook { q0, .. } => Routed::Run(Command::Activate { q0 }),
        event @ HostEvent::TagLook { .. } => Routed::Forward(event),
    }
}

/// Route one event and carry it out.
///
/// Failures are logged and surfaced in the status bar; the loop keeps going.
pub fn handle_host_event<H: Host, L: Launcher>(app: &mut App<H, L>, event: HostEvent) {
    log::debug!("event: {}", event);
    match route(event) {
        Routed::Run(command) => match app.run(command) {
            Ok(Some(msg)) => app.set_status_message(msg),
            Ok(None) => {}
            Err(e) => {
                log::warn!("{}", e);
                app.set_error_message(e.to_string());
            }
        },
        Routed::Forward(event) => {
            if let Err(e) = app.host.write_event(&event) {
                log::warn!("forwarding {}: {}", event, e);
            }
        }
        Routed::Close => app.close(),
        Routed::Ignore => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::launch::RecordingLauncher;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn tag(text: &str) -> HostEvent {
        HostEvent::TagExecute {
            text: text.to_string(),
            location: None,
        }
    }

    fn app_in(dir: &TempDir) -> App<MemoryHost, RecordingLauncher> {
        let mut app = App::new(
            MemoryHost::new(),
            dir.path(),
            false,
            RecordingLauncher::default(),
        );
        app.init().unwrap();
        app
    }

    #[test]
    fn tag_tokens_map_to_commands() {
        assert_eq!(route(tag("DotDot")), Routed::Run(Command::Parent));
        assert_eq!(route(tag("Hidden")), Routed::Run(Command::ToggleHidden));
        assert_eq!(route(tag("Del")), Routed::Close);
        assert_eq!(
            route(tag("Win")),
            Routed::Run(Command::Launch {
                target: LaunchTarget::Shell,
                at: None
            })
        );
    }

    #[test]
    fn location_travels_with_launch() {
        let event = HostEvent::TagExecute {
            text: "Dirfold".to_string(),
            location: Some("/tmp/x:#12,#15".to_string()),
        };
        assert_eq!(
            route(event),
            Routed::Run(Command::Launch {
                target: LaunchTarget::Explorer,
                at: Some(12)
            })
        );
    }

    #[test]
    fn location_offsets() {
        assert_eq!(location_offset("dirfold-/tmp:#3,#9"), Some(3));
        assert_eq!(location_offset("a:b:#7"), Some(7));
        assert_eq!(location_offset("no address"), None);
        assert_eq!(location_offset("x:5"), None);
    }

    #[test]
    fn unknown_words_are_forwarded() {
        assert_eq!(route(tag("Snarf")), Routed::Forward(tag("Snarf")));
        let look = HostEvent::TagLook {
            text: "Win".to_string(),
        };
        assert_eq!(route(look.clone()), Routed::Forward(look));
    }

    #[test]
    fn body_events() {
        assert_eq!(
            route(HostEvent::BodyLook { q0: 4, q1: 4 }),
            Routed::Run(Command::Activate { q0: 4 })
        );
        assert_eq!(route(HostEvent::BodyLook { q0: 4, q1: 9 }), Routed::Ignore);
        assert_eq!(
            route(HostEvent::BodyExecute { q0: 2 }),
            Routed::Run(Command::PrintPath { q0: 2 })
        );
    }

    #[test]
    fn forwarded_events_reach_the_host() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        handle_host_event(&mut app, tag("Snarf"));
        assert_eq!(app.host.take_forwarded(), vec![tag("Snarf")]);
    }

    #[test]
    fn del_closes_the_window() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        handle_host_event(&mut app, tag("Del"));
        assert!(app.should_quit);
        assert!(app.host.is_deleted());
    }

    #[test]
    fn failures_become_error_messages() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("f")).unwrap();
        let mut app = app_in(&dir);

        handle_host_event(&mut app, HostEvent::BodyLook { q0: 10_000, q1: 10_000 });
        let msg = app.status_message.as_ref().unwrap();
        assert!(msg.is_error);
        assert!(!app.should_quit);
    }

    #[test]
    fn look_unfolds_a_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        File::create(dir.path().join("d").join("inner")).unwrap();
        File::create(dir.path().join("f")).unwrap();
        let mut app = app_in(&dir);

        handle_host_event(&mut app, HostEvent::BodyLook { q0: 0, q1: 0 });
        assert_eq!(app.host.body(), b"+ d\n  \tinner\n  f\n\n\n\n");
    }
}
