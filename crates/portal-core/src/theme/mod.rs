//! Theme state derived from the root class marker.
//!
//! - [`ThemeState`]: the decoded light/dark signal
//! - [`codec`]: turning the raw marker into theme tags
//! - [`observer`]: live republication of the decoded state
//!
//! The marker itself belongs to the style surface; everything here only
//! reads it, except [`apply_theme`] which the shell uses to honor an
//! explicit user or OS request.

pub mod codec;
pub mod observer;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::StyleSurface;

pub use codec::{ClassMarkerCodec, RawTheme, ThemeCodec, decode_or_light};
pub use observer::ThemeObserver;

/// Tag produced by a codec for dark appearance.
pub const DARK_TAG: &str = "dark";

/// Tag produced by a codec for light appearance.
pub const LIGHT_TAG: &str = "light";

// =============================================================================
// THEME STATE
// =============================================================================

/// Decoded appearance.
///
/// Derived, never authoritative: the class marker on the style surface is
/// the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeState {
    #[default]
    Light,
    Dark,
}

impl ThemeState {
    /// Derive the state from decoded tags: `"dark"` wins, anything else is light.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        if tags.iter().any(|tag| tag.as_ref() == DARK_TAG) {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Check if this is the dark state.
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    /// The opposite state.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

impl fmt::Display for ThemeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// MARKERS
// =============================================================================

/// Class names used as theme markers on the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeMarkers {
    /// Class present while dark appearance is active.
    pub dark: String,
    /// Class present while light appearance is explicitly requested.
    pub light: String,
}

impl Default for ThemeMarkers {
    fn default() -> Self {
        Self {
            dark: "dark-mode".to_string(),
            light: "light-mode".to_string(),
        }
    }
}

/// Write the marker classes for `state` onto the surface.
///
/// Removes the opposite marker first, so observers see the old marker go
/// away before the new one arrives.
pub fn apply_theme<S: StyleSurface + ?Sized>(surface: &S, state: ThemeState, markers: &ThemeMarkers) {
    match state {
        ThemeState::Dark => {
            surface.remove_class(&markers.light);
            surface.add_class(&markers.dark);
        }
        ThemeState::Light => {
            surface.remove_class(&markers.dark);
            surface.add_class(&markers.light);
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Theme decoding failures. Never surfaced to the UI; they resolve to light.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ThemeError {
    /// No theme marker data at all.
    #[error("theme marker is missing")]
    Missing,

    /// Marker data present but not understood.
    #[error("unrecognized theme marker: {0}")]
    Unrecognized(String),
}
