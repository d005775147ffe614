//! Color theme system for crlabel.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every surface
//! crlabel paints. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB.

use ratatui::style::Color;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Diff view
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    /// Line-number gutter.
    pub diff_gutter: Color,
    /// Background of lines covered by the review comment.
    pub comment_range_bg: Color,
    /// Review comment note text and frame.
    pub note_fg: Color,

    // Label bar
    pub label_enabled: Color,
    pub label_disabled: Color,
    pub label_skip: Color,
    /// Background of the keyboard cursor button.
    pub label_cursor_bg: Color,

    // Stat bar
    pub stat_bar_bg: Color,
    pub stat_bar_fg: Color,
    pub identity: Color,

    // Status
    pub error: Color,
    pub lock_pending: Color,
}

impl Theme {
    /// Built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            diff_gutter: Color::DarkGray,
            comment_range_bg: Color::Indexed(236),
            note_fg: Color::Yellow,

            label_enabled: Color::White,
            label_disabled: Color::DarkGray,
            label_skip: Color::Magenta,
            label_cursor_bg: Color::Blue,

            stat_bar_bg: Color::DarkGray,
            stat_bar_fg: Color::White,
            identity: Color::Cyan,

            error: Color::Red,
            lock_pending: Color::Yellow,
        }
    }

    /// Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            diff_gutter: overlay0,
            comment_range_bg: surface0,
            note_fg: yellow,

            label_enabled: text,
            label_disabled: overlay0,
            label_skip: mauve,
            label_cursor_bg: surface1,

            stat_bar_bg: surface1,
            stat_bar_fg: text,
            identity: teal,

            error: red,
            lock_pending: peach,
        }
    }

    /// Resolves a theme name to a built-in theme. Unknown names fall back to
    /// `dark()` so a typo in config never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
