//! Loading placeholder shown while a route is suspended.
//!
//! The renderer holds no knowledge of which module is pending. It only
//! tracks the published theme so a mounted placeholder flips its colors
//! when the theme changes mid-load.

use tokio::sync::watch;

use crate::theme::{ThemeObserver, ThemeState};

/// Caption shown under the loading indicator.
pub const LOADING_CAPTION: &str = "Loading...";

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A translucent color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS notation: `#rrggbb` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Background and foreground pair for the placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackPalette {
    pub background: Rgba,
    pub foreground: Rgba,
}

impl FallbackPalette {
    pub const DARK: Self = Self {
        background: Rgba::rgb(0x12, 0x12, 0x12),
        foreground: Rgba::rgba(255, 255, 255, 0.6),
    };

    pub const LIGHT: Self = Self {
        background: Rgba::rgb(0xff, 0xff, 0xff),
        foreground: Rgba::rgb(0x27, 0x2e, 0x3b),
    };

    /// Palette for a theme.
    pub fn for_theme(theme: ThemeState) -> Self {
        match theme {
            ThemeState::Dark => Self::DARK,
            ThemeState::Light => Self::LIGHT,
        }
    }
}

/// A mounted loading placeholder.
///
/// Mounting reads the observer's last value synchronously; afterwards the
/// renderer follows the observer's watch channel until it is dropped.
#[derive(Debug)]
pub struct FallbackRenderer {
    rendered: ThemeState,
    receiver: watch::Receiver<ThemeState>,
}

impl FallbackRenderer {
    /// Mount against a live observer.
    pub fn mount(observer: &ThemeObserver) -> Self {
        let mut receiver = observer.watch();
        let rendered = *receiver.borrow_and_update();
        Self { rendered, receiver }
    }

    /// Latest published theme.
    pub fn theme(&self) -> ThemeState {
        *self.receiver.borrow()
    }

    /// Colors for the latest published theme.
    pub fn palette(&self) -> FallbackPalette {
        FallbackPalette::for_theme(self.theme())
    }

    /// Theme used for the last render.
    pub fn rendered_theme(&self) -> ThemeState {
        self.rendered
    }

    /// Whether a re-render is due. Marks the latest value as rendered.
    ///
    /// Returns `false` once the observer is gone; the last value stays.
    pub fn poll_changed(&mut self) -> bool {
        match self.receiver.has_changed() {
            Ok(true) => {
                let next = *self.receiver.borrow_and_update();
                let changed = next != self.rendered;
                self.rendered = next;
                changed
            }
            _ => false,
        }
    }

    /// Wait for the next theme change, or `None` when the observer is gone.
    pub async fn changed(&mut self) -> Option<ThemeState> {
        self.receiver.changed().await.ok()?;
        let next = *self.receiver.borrow_and_update();
        self.rendered = next;
        Some(next)
    }
}
