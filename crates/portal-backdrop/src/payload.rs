//! Provider payload parsing and image selection.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::{BackdropError, Result};

/// Accepted response shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageList {
    Bare(Vec<String>),
    Wrapped { urls: Vec<String> },
}

/// Parse a provider response into image URLs.
///
/// Accepts a bare JSON array of strings or an object with a `urls` array.
pub fn parse_image_list(body: &str) -> Result<Vec<String>> {
    let list: ImageList = serde_json::from_str(body)?;
    Ok(match list {
        ImageList::Bare(urls) | ImageList::Wrapped { urls } => urls,
    })
}

/// Pick one URL uniformly at random.
pub fn pick_url<'a, R: Rng + ?Sized>(urls: &'a [String], rng: &mut R) -> Result<&'a str> {
    urls.choose(rng)
        .map(String::as_str)
        .ok_or(BackdropError::EmptyList)
}

/// Style value for an image URL.
#[must_use]
pub fn css_url_value(url: &str) -> String {
    format!("url('{url}')")
}

/// URL inside a `url(...)` style value, quoted or not.
pub fn url_from_css_value(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(inner);
    (!inner.is_empty()).then_some(inner)
}
