// GrepMark - ui/theme.rs
//
// Highlight colour palettes and result page colours.
// No dependencies on app state or business logic.

use crate::util::constants::NO_COLOR;
use std::fmt;
use std::str::FromStr;

/// Highlight colours offered on light backgrounds. Index 0 is "no highlight".
pub const LIGHT_PALETTE: &[&str] = &[
    NO_COLOR,
    "lightyellow",
    "khaki",
    "gold",
    "lightsalmon",
    "salmon",
    "lightcoral",
    "pink",
    "hotpink",
    "lightgreen",
    "lime",
    "aquamarine",
    "skyblue",
    "dodgerblue",
    "fuchsia",
];

/// Highlight colours offered on dark backgrounds. Index 0 is "no highlight".
pub const DARK_PALETTE: &[&str] = &[
    NO_COLOR,
    "dimgray",
    "slategray",
    "darkolivegreen",
    "olive",
    "darkgreen",
    "seagreen",
    "teal",
    "cadetblue",
    "navy",
    "indigo",
    "purple",
    "darkred",
    "firebrick",
    "chocolate",
    "sienna",
    "darkgoldenrod",
];

/// Result page theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Highlight palette, starting with the "none" entry.
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Self::Light => LIGHT_PALETTE,
            Self::Dark => DARK_PALETTE,
        }
    }

    /// Colour for the `index`-th highlight word given without one.
    /// Cycles through the palette, never returning "none".
    pub fn auto_color(self, index: usize) -> &'static str {
        let palette = self.palette();
        palette[index % (palette.len() - 1) + 1]
    }

    /// Page (background, foreground) colours.
    pub fn page_colours(self) -> (&'static str, &'static str) {
        match self {
            Self::Light => ("#ffffff", "#1f2937"),
            Self::Dark => ("#1e1e1e", "#d4d4d4"),
        }
    }

    /// Background of a line selected in trim mode.
    pub fn selection_colour(self) -> &'static str {
        match self {
            Self::Light => "#cce5ff",
            Self::Dark => "#264f78",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}
