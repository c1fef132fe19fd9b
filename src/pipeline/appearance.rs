//! Appearance adapter: theme selection to chart styling.
//!
//! [`AppearanceProfile::for_theme`] is a pure function. The adapter holds the
//! current profile behind an `Arc` that is swapped wholesale on every theme
//! change, so readers only ever see a complete profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Theme selector observed from the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Resolved chart colors shared by every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppearanceProfile {
    pub background: Rgba,
    pub line: Rgba,
    pub text: Rgba,
    pub grid: Rgba,
}

impl AppearanceProfile {
    /// Profile for a theme. Deterministic.
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Rgba::rgb(2, 8, 23),
                line: Rgba::rgba(0, 255, 0, 204),
                text: Rgba::rgb(255, 255, 255),
                grid: Rgba::rgb(0x33, 0x33, 0x33),
            },
            Theme::Light => Self {
                background: Rgba::rgb(255, 255, 255),
                line: Rgba::rgba(0, 100, 0, 204),
                text: Rgba::rgb(0, 0, 0),
                grid: Rgba::rgb(0xcc, 0xcc, 0xcc),
            },
        }
    }
}

/// Tracks the active theme and its profile.
#[derive(Debug, Clone)]
pub struct AppearanceAdapter {
    theme: Theme,
    profile: Arc<AppearanceProfile>,
}

impl AppearanceAdapter {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            profile: Arc::new(AppearanceProfile::for_theme(theme)),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Shared handle to the current profile.
    pub fn profile(&self) -> Arc<AppearanceProfile> {
        Arc::clone(&self.profile)
    }

    /// Switch to `theme`, replacing the profile. Returns whether the theme
    /// actually changed; the new profile is installed either way.
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        let changed = theme != self.theme;
        self.theme = theme;
        self.profile = Arc::new(AppearanceProfile::for_theme(theme));
        changed
    }
}

impl Default for AppearanceAdapter {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
