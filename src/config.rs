//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--hidden`, `--no-mouse`, `--log-file`)
//! 2. `--config <file>`
//! 3. `$DIRFOLD_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dirfold.toml` in the current working directory
//! 5. Global `~/.config/dirfold/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Show hidden entries in the first listing.
    pub show_hidden: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Write log records to this file instead of stderr.
    pub log_file: Option<String>,
}

/// Child window settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LaunchConfig {
    /// Program started by `Win`. Defaults to `$PLAN9/bin/win`.
    pub win_command: Option<String>,
}

/// External file opener settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenerConfig {
    /// Program that receives open requests.
    pub command: Option<String>,
    /// Source tag put on every request.
    pub source: Option<String>,
}

/// Color overrides for a custom theme.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tag_bg: Option<String>,
    pub tag_fg: Option<String>,
    pub title_fg: Option<String>,
    pub body_bg: Option<String>,
    pub body_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub cursor_bg: Option<String>,
    pub status_fg: Option<String>,
    pub error_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub launch: LaunchConfig,
    pub opener: OpenerConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default external opener.
pub const DEFAULT_OPENER: &str = "plumb";
/// Default source tag on open requests.
pub const DEFAULT_SOURCE: &str = "dirfold";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DIRFOLD_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dirfold.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dirfold").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::warn!("failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                mouse: other.general.mouse.or(self.general.mouse),
                log_file: other.general.log_file.clone().or(self.general.log_file),
            },
            launch: LaunchConfig {
                win_command: other
                    .launch
                    .win_command
                    .clone()
                    .or(self.launch.win_command),
            },
            opener: OpenerConfig {
                command: other.opener.command.clone().or(self.opener.command),
                source: other.opener.source.clone().or(self.opener.source),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether the first listing shows hidden entries.
    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.general.log_file.as_deref().map(Path::new)
    }

    /// Shell window program, falling back to `$PLAN9/bin/win`.
    pub fn win_command(&self) -> Option<PathBuf> {
        self.launch.win_command.as_ref().map(PathBuf::from).or_else(|| {
            std::env::var_os("PLAN9")
                .filter(|p| !p.is_empty())
                .map(|p| PathBuf::from(p).join("bin").join("win"))
        })
    }

    pub fn opener_command(&self) -> &str {
        self.opener.command.as_deref().unwrap_or(DEFAULT_OPENER)
    }

    pub fn opener_source(&self) -> &str {
        self.opener.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
