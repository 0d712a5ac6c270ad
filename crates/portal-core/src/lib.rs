//! Composition core for the Portal shell.
//!
//! This crate holds everything the shell decides on its own, independent of
//! any GUI toolkit:
//!
//! - **surface**: the observable style surface (root class marker and
//!   style variables) with scoped subscriptions
//! - **theme**: theme codec, decoded [`ThemeState`] and the live
//!   [`ThemeObserver`]
//! - **deferred**: the deferred module registry, one in-flight load per ref
//! - **route**: the declarative route tree and its path matcher
//! - **suspense**: the suspension boundary deciding between page content,
//!   fallback and failure
//! - **fallback**: the theme-aware loading placeholder
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use portal_core::{ClassMarkerCodec, DocumentStyle, FallbackRenderer, StyleSurface, ThemeObserver, ThemeState};
//!
//! let surface = DocumentStyle::new();
//! let codec = Arc::new(ClassMarkerCodec::new(surface.clone()));
//! let observer = ThemeObserver::activate(&surface, codec);
//! let mut fallback = FallbackRenderer::mount(&observer);
//! assert_eq!(fallback.theme(), ThemeState::Light);
//!
//! surface.toggle_class("dark-mode");
//! assert!(fallback.poll_changed());
//! assert_eq!(fallback.palette().background.to_css(), "#121212");
//! ```

#![warn(clippy::all)]

pub mod deferred;
pub mod fallback;
pub mod route;
pub mod surface;
pub mod suspense;
pub mod theme;

pub use deferred::{
    LoadError, ModuleLoader, ModuleRegistry, ModuleStatus, PendingLoad, RegistryError, Resolution,
};
pub use fallback::{FallbackPalette, FallbackRenderer, LOADING_CAPTION, Rgba};
pub use route::{RouteError, RouteMatch, RouteNode, RouteTree, Router};
pub use surface::{DocumentStyle, Mutation, MutationKind, StyleSurface, SurfaceSubscription};
pub use suspense::{Boundary, SuspenseBoundary};
pub use theme::{
    ClassMarkerCodec, RawTheme, ThemeCodec, ThemeError, ThemeMarkers, ThemeObserver, ThemeState,
    apply_theme,
};
