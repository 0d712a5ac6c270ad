//! Configuration types for the background refresh.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Image provider used by default for both viewport classes.
pub const DEFAULT_ENDPOINT: &str = "https://www.loliapi.com/acg/";

/// Widths at or below this are treated as mobile.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// Style variable receiving the chosen image.
pub const DEFAULT_CSS_VARIABLE: &str = "--bg-url";

/// Which provider endpoint a viewport width selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Desktop,
    Mobile,
}

impl EndpointKind {
    /// Select the endpoint class for a viewport width.
    #[must_use]
    pub const fn for_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// User settings for the background refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSettings {
    /// Whether the decorative background is fetched at all.
    pub enabled: bool,

    /// Provider used above the breakpoint.
    pub desktop_endpoint: String,

    /// Provider used at or below the breakpoint.
    pub mobile_endpoint: String,

    /// Viewport width (logical pixels) separating mobile from desktop.
    pub mobile_breakpoint: u32,

    /// Style variable the image URL is written to.
    pub css_variable: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            desktop_endpoint: DEFAULT_ENDPOINT.to_string(),
            mobile_endpoint: DEFAULT_ENDPOINT.to_string(),
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            css_variable: DEFAULT_CSS_VARIABLE.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl BackdropSettings {
    /// Endpoint class and URL for a viewport width.
    #[must_use]
    pub fn endpoint_for(&self, width: u32) -> (EndpointKind, &str) {
        let kind = EndpointKind::for_width(width, self.mobile_breakpoint);
        let url = match kind {
            EndpointKind::Desktop => self.desktop_endpoint.as_str(),
            EndpointKind::Mobile => self.mobile_endpoint.as_str(),
        };
        (kind, url)
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert_eq!(EndpointKind::for_width(768, 768), EndpointKind::Mobile);
        assert_eq!(EndpointKind::for_width(769, 768), EndpointKind::Desktop);
        assert_eq!(EndpointKind::for_width(0, 768), EndpointKind::Mobile);
    }

    #[test]
    fn test_endpoint_for_branches_with_distinct_urls() {
        let settings = BackdropSettings {
            desktop_endpoint: "https://img.test/wide".to_string(),
            mobile_endpoint: "https://img.test/narrow".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.endpoint_for(1024),
            (EndpointKind::Desktop, "https://img.test/wide")
        );
        assert_eq!(
            settings.endpoint_for(500),
            (EndpointKind::Mobile, "https://img.test/narrow")
        );
    }

    #[test]
    fn test_defaults() {
        let settings = BackdropSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.desktop_endpoint, settings.mobile_endpoint);
        assert_eq!(settings.css_variable, "--bg-url");
        assert_eq!(settings.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: BackdropSettings =
            serde_json::from_str(r#"{"enabled": false, "mobile_breakpoint": 600}"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.mobile_breakpoint, 600);
        assert_eq!(settings.desktop_endpoint, DEFAULT_ENDPOINT);
    }
}
