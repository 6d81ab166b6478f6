mod app;
mod buffer;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod host;
mod launch;
mod theme;
mod tui;
mod ui;
mod view;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig};
use crate::error::AppError;
use crate::event::{Event, EventHandler};
use crate::host::MemoryHost;
use crate::launch::SystemLauncher;
use crate::tui::{install_panic_hook, Tui};
use crate::view::BodyView;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Browse a directory tree as an indented, foldable listing.
#[derive(Parser, Debug)]
#[command(name = "dirfold", version, about)]
struct Cli {
    /// Directory to explore (defaults to current directory)
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show hidden entries from the start
    #[arg(long)]
    hidden: bool,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,

    /// Append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags that were given, as a partial config.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.hidden.then_some(true),
                mouse: self.no_mouse.then_some(false),
                log_file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
            ..Default::default()
        }
    }
}

/// Log to `log_file` when given. Stderr belongs to the full-screen UI, so
/// without a file nothing is logged unless `RUST_LOG` asks for it.
fn init_logger(log_file: Option<&Path>) -> error::Result<()> {
    let (default_filter, target) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            ("info", env_logger::Target::Pipe(Box::new(file)))
        }
        None => ("off", env_logger::Target::Stderr),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(target)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    init_logger(config.log_file())?;

    let requested = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let root = requested.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;
    if !root.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut app = App::new(
        MemoryHost::new(),
        &root,
        config.show_hidden(),
        SystemLauncher::from_config(&config),
    );
    app.init()?;
    let theme = theme::resolve_theme(&config.theme);
    log::debug!("theme {}", config.theme_scheme());

    install_panic_hook();
    let mut tui = Tui::new(config.mouse_enabled())?;
    let input_paused = Arc::new(AtomicBool::new(false));
    let mut events = EventHandler::spawn(event::terminal_source(
        TICK_RATE,
        Arc::clone(&input_paused),
    ));
    let mut view = BodyView::default();

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&app, &mut view, &theme, frame);
        })?;

        match events.next().await? {
            Event::Input(input) => {
                let host = &app.host;
                if let Some(event) = view.translate(&input, host.title(), host.tag(), host.body())
                {
                    handler::handle_host_event(&mut app, event);
                }
            }
            Event::Tick => app.tick(),
        }

        if let Some(job) = app.take_foreground() {
            input_paused.store(true, Ordering::SeqCst);
            // let a poll already in flight run out before the child reads
            tokio::time::sleep(TICK_RATE).await;
            tui.suspend()?;
            let result = app.run_foreground(&job);
            tui.resume()?;
            input_paused.store(false, Ordering::SeqCst);
            match result {
                Ok(msg) => app.set_status_message(msg),
                Err(e) => {
                    log::warn!("{}", e);
                    app.set_error_message(e.to_string());
                }
            }
        }

        // The terminal has no default handling of its own to fall back on
        for event in app.host.take_forwarded() {
            log::info!("unhandled {}", event);
            app.set_status_message(format!("unhandled: {}", event));
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
