//! Theme codec: raw marker data in, theme tags out.

use crate::surface::{DocumentStyle, StyleSurface};

use super::{DARK_TAG, LIGHT_TAG, ThemeError, ThemeMarkers, ThemeState};

/// Raw, undecoded theme marker text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTheme(pub String);

impl RawTheme {
    /// Wrap raw marker text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reads and decodes theme marker data.
pub trait ThemeCodec: Send + Sync {
    /// Read the current raw theme.
    fn init_theme(&self) -> RawTheme;

    /// Decode raw theme data into a sequence of tags.
    fn decode_theme(&self, raw: &RawTheme) -> Result<Vec<String>, ThemeError>;
}

/// Decode `raw`, resolving every failure to [`ThemeState::Light`].
pub fn decode_or_light(codec: &dyn ThemeCodec, raw: &RawTheme) -> ThemeState {
    match codec.decode_theme(raw) {
        Ok(tags) => ThemeState::from_tags(&tags),
        Err(err) => {
            tracing::debug!("Theme decode failed, using light: {}", err);
            ThemeState::Light
        }
    }
}

/// Codec over the root class attribute of a style surface.
///
/// The dark marker class decodes to the `"dark"` tag, the light marker class
/// to `"light"`; other classes are ignored.
#[derive(Debug, Clone)]
pub struct ClassMarkerCodec<S = DocumentStyle> {
    surface: S,
    markers: ThemeMarkers,
}

impl<S: StyleSurface> ClassMarkerCodec<S> {
    /// Create a codec with the default `dark-mode` / `light-mode` markers.
    pub fn new(surface: S) -> Self {
        Self::with_markers(surface, ThemeMarkers::default())
    }

    /// Create a codec with custom marker classes.
    pub fn with_markers(surface: S, markers: ThemeMarkers) -> Self {
        Self { surface, markers }
    }

    /// Marker classes in use.
    pub fn markers(&self) -> &ThemeMarkers {
        &self.markers
    }
}

impl<S: StyleSurface> ThemeCodec for ClassMarkerCodec<S> {
    fn init_theme(&self) -> RawTheme {
        RawTheme::new(self.surface.class_attribute())
    }

    fn decode_theme(&self, raw: &RawTheme) -> Result<Vec<String>, ThemeError> {
        let raw_text = raw.as_str().trim();
        if raw_text.is_empty() {
            return Err(ThemeError::Missing);
        }

        let tags: Vec<String> = raw_text
            .split_whitespace()
            .filter_map(|token| {
                if token == self.markers.dark {
                    Some(DARK_TAG.to_string())
                } else if token == self.markers.light {
                    Some(LIGHT_TAG.to_string())
                } else {
                    None
                }
            })
            .collect();

        if tags.is_empty() {
            return Err(ThemeError::Unrecognized(raw_text.to_string()));
        }
        Ok(tags)
    }
}
