//! Theme data model: built-in palettes and resolution from config.
//!
//! Two palettes ship with the binary: a dark one, and a light one in the
//! pale yellow body / pale blue tag colors of plan 9 windows. A custom
//! scheme starts from dark and applies hex overrides from the config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tag row
    pub tag_bg: Color,
    pub tag_fg: Color,
    pub title_fg: Color,

    // Body
    pub body_bg: Color,
    pub body_fg: Color,
    pub dir_fg: Color,
    pub cursor_bg: Color,

    // Status bar
    pub status_fg: Color,
    pub error_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha colors.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tag_bg: Color::Rgb(49, 50, 68),      // #313244 (surface0)
        tag_fg: Color::Rgb(205, 214, 244),   // #cdd6f4 (text)
        title_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)

        body_bg: Color::Reset,
        body_fg: Color::Rgb(205, 214, 244),
        dir_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        cursor_bg: Color::Rgb(69, 71, 90),   // #45475a (surface1)

        status_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        error_fg: Color::Rgb(243, 139, 168),  // #f38ba8 (red)
    }
}

/// Light theme in plan 9 window colors.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tag_bg: Color::Rgb(234, 255, 255), // #eaffff
        tag_fg: Color::Rgb(0, 0, 0),
        title_fg: Color::Rgb(0, 0, 153),   // #000099

        body_bg: Color::Rgb(255, 255, 234), // #ffffea
        body_fg: Color::Rgb(0, 0, 0),
        dir_fg: Color::Rgb(0, 0, 153),
        cursor_bg: Color::Rgb(238, 238, 158), // #eeee9e

        status_fg: Color::Rgb(68, 136, 68), // #448844
        error_fg: Color::Rgb(187, 85, 85),  // #bb5555
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Overwrite `slot` when `hex` is present and valid.
fn override_color(slot: &mut Color, hex: Option<&str>) {
    if let Some(color) = hex.and_then(parse_hex_color) {
        *slot = color;
    }
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.tag_bg, custom.tag_bg.as_deref());
    override_color(&mut theme.tag_fg, custom.tag_fg.as_deref());
    override_color(&mut theme.title_fg, custom.title_fg.as_deref());
    override_color(&mut theme.body_bg, custom.body_bg.as_deref());
    override_color(&mut theme.body_fg, custom.body_fg.as_deref());
    override_color(&mut theme.dir_fg, custom.dir_fg.as_deref());
    override_color(&mut theme.cursor_bg, custom.cursor_bg.as_deref());
    override_color(&mut theme.status_fg, custom.status_fg.as_deref());
    override_color(&mut theme.error_fg, custom.error_fg.as_deref());
}

// ── Tests ────────────────────────────────────────────────────────────────────
