//! Decorative background refresh for Portal.
//!
//! A best-effort side channel: on mount and on every viewport resize the
//! shell asks a public image provider for a list of URLs, picks one at
//! random and writes it to a style variable. Nothing is returned to the
//! rest of the shell and no failure ever reaches the render tree.
//!
//! # Architecture
//!
//! - [`BackdropSettings`] - endpoints, breakpoint and style variable
//! - [`ImageFetcher`] - the HTTP seam; [`HttpFetcher`] uses reqwest
//! - [`BackgroundRefresher`] - one fetch/parse/pick/write pass per trigger,
//!   awaited directly with [`run`](BackgroundRefresher::run) (use with
//!   `Task::perform()`) or detached with [`spawn`](BackgroundRefresher::spawn)
//!
//! # Example
//!
//! ```no_run
//! use portal_backdrop::{BackdropSettings, BackgroundRefresher, HttpFetcher};
//! use portal_core::DocumentStyle;
//!
//! async fn on_mount(surface: DocumentStyle) -> portal_backdrop::Result<()> {
//!     let settings = BackdropSettings::default();
//!     let refresher = BackgroundRefresher::new(HttpFetcher::new(&settings)?, surface, settings);
//!     let outcome = refresher.run(1024).await;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod refresh;

pub use client::{HttpFetcher, ImageFetcher};
pub use config::{BackdropSettings, DEFAULT_ENDPOINT, EndpointKind};
pub use error::{BackdropError, Result};
pub use payload::{css_url_value, parse_image_list, pick_url, url_from_css_value};
pub use refresh::{AppliedBackground, BackgroundRefresher, RefreshJob, RefreshOutcome};
