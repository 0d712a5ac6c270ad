//! Shell state: style surface, theme, loaded pages and the active route.
//!
//! All methods here are synchronous. Methods that may start page loads
//! return the freshly started loads; the app turns each into one
//! `Task::perform`.

use std::sync::Arc;

use portal_backdrop::{
    AppliedBackground, BackgroundRefresher, HttpFetcher, RefreshOutcome, url_from_css_value,
};
use portal_core::{
    Boundary, ClassMarkerCodec, DocumentStyle, FallbackPalette, FallbackRenderer, LoadError,
    ModuleRegistry, PendingLoad, RouteMatch, RouteTree, Router, SuspenseBoundary, ThemeObserver,
    StyleSurface, ThemeState, apply_theme,
};

use super::Settings;
use crate::page::{self, PageId, PageModule};

/// What the content area shows for the current path.
#[derive(Debug, Clone)]
pub enum RouteView {
    /// At least one page module is loading; the fallback is mounted.
    Pending,
    /// Page modules of the matched route, outermost first.
    Ready(Vec<Arc<PageModule>>),
    /// A page module failed to load.
    Failed(LoadError),
    /// No route matches the path.
    NotFound,
}

/// All shell state.
pub struct AppState {
    /// Persisted preferences.
    pub settings: Settings,

    /// Root class marker and style variables.
    pub surface: DocumentStyle,

    /// Live theme decoded from the surface.
    pub observer: ThemeObserver,

    /// Deferred page modules.
    pub registry: ModuleRegistry<PageId, PageModule>,

    /// Route table.
    pub routes: RouteTree<PageId>,

    /// Current path as navigated to.
    pub path: String,

    /// Match for the current path.
    pub current: Option<RouteMatch<PageId>>,

    /// Content area state.
    pub view: RouteView,

    /// Mounted while the view is pending.
    pub fallback: Option<FallbackRenderer>,

    /// Last known viewport width in logical pixels.
    pub viewport_width: u32,

    /// Background refresh, absent when the HTTP client could not be built.
    pub backdrop: Option<BackgroundRefresher<HttpFetcher, DocumentStyle>>,

    /// Last background written to the surface.
    pub background: Option<AppliedBackground>,
}

impl AppState {
    /// Build the shell state from settings.
    ///
    /// Applies the configured theme to a fresh surface before the observer
    /// is activated, so the first decoded value is the configured one.
    pub fn new(settings: Settings) -> Self {
        let surface = DocumentStyle::new();
        apply_theme(&surface, settings.appearance.theme, &settings.appearance.markers);

        let codec = ClassMarkerCodec::with_markers(surface.clone(), settings.appearance.markers.clone());
        let observer = ThemeObserver::activate(&surface, Arc::new(codec));

        let mut registry = ModuleRegistry::new();
        page::register_pages(&mut registry);

        let routes = page::routes().unwrap_or_else(|err| {
            tracing::error!("Invalid route table: {}", err);
            RouteTree::default()
        });

        Self {
            viewport_width: settings.window.width.max(0.0) as u32,
            settings,
            surface,
            observer,
            registry,
            routes,
            path: String::new(),
            current: None,
            view: RouteView::NotFound,
            fallback: None,
            backdrop: None,
            background: None,
        }
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    /// Navigate to `path`.
    pub fn navigate(&mut self, path: &str) -> Vec<PendingLoad<PageModule>> {
        tracing::info!("Navigate to {}", path);
        self.path = path.to_string();
        self.current = self.routes.match_path(path);
        self.evaluate()
    }

    /// Record a finished page load and re-evaluate the current route.
    pub fn module_loaded(
        &mut self,
        page: PageId,
        generation: u64,
        result: Result<Arc<PageModule>, LoadError>,
    ) -> Vec<PendingLoad<PageModule>> {
        if !self.registry.settle(page, generation, result) {
            tracing::debug!("Load of {} (generation {}) already settled or superseded", page, generation);
        }
        let affects_current = self
            .current
            .as_ref()
            .is_some_and(|matched| matched.chain.contains(&page));
        if affects_current {
            self.evaluate()
        } else {
            Vec::new()
        }
    }

    /// Reset failed pages and try the current route again.
    pub fn retry(&mut self) -> Vec<PendingLoad<PageModule>> {
        let reset = self.registry.reset_failed();
        tracing::info!("Retrying route {} ({} failed modules reset)", self.path, reset.len());
        self.evaluate()
    }

    /// Innermost page of the current route.
    pub fn current_page(&self) -> Option<PageId> {
        self.current.as_ref().and_then(RouteMatch::leaf)
    }

    fn evaluate(&mut self) -> Vec<PendingLoad<PageModule>> {
        let Some(matched) = &self.current else {
            self.view = RouteView::NotFound;
            self.unmount_fallback();
            return Vec::new();
        };

        match SuspenseBoundary::evaluate(&mut self.registry, matched) {
            Boundary::Ready(modules) => {
                self.view = RouteView::Ready(modules);
                self.unmount_fallback();
                Vec::new()
            }
            Boundary::Suspended { started } => {
                self.view = RouteView::Pending;
                if self.fallback.is_none() {
                    self.fallback = Some(FallbackRenderer::mount(&self.observer));
                    tracing::debug!("Fallback mounted");
                }
                started
            }
            Boundary::Failed { error, started } => {
                self.view = RouteView::Failed(error);
                self.unmount_fallback();
                started
            }
        }
    }

    fn unmount_fallback(&mut self) {
        if self.fallback.take().is_some() {
            tracing::debug!("Fallback unmounted");
        }
    }

    // =========================================================================
    // THEME
    // =========================================================================

    /// Current decoded theme.
    pub fn theme(&self) -> ThemeState {
        self.observer.current()
    }

    /// Colors for the loading placeholder.
    pub fn fallback_palette(&self) -> FallbackPalette {
        self.fallback
            .as_ref()
            .map_or_else(|| FallbackPalette::for_theme(self.theme()), FallbackRenderer::palette)
    }

    /// Flip the theme marker. Returns the new theme.
    pub fn toggle_theme(&mut self) -> ThemeState {
        let next = self.theme().toggled();
        self.set_theme(next);
        self.settings.appearance.theme = next;
        next
    }

    /// Follow an OS theme change when enabled. Returns whether it was applied.
    pub fn system_theme_changed(&mut self, dark: bool) -> bool {
        if !self.settings.appearance.follow_system {
            return false;
        }
        let next = if dark { ThemeState::Dark } else { ThemeState::Light };
        self.set_theme(next);
        true
    }

    fn set_theme(&mut self, theme: ThemeState) {
        apply_theme(&self.surface, theme, &self.settings.appearance.markers);
        if let Some(fallback) = &mut self.fallback
            && fallback.poll_changed()
        {
            tracing::debug!("Fallback re-rendered for {} theme", fallback.rendered_theme());
        }
    }

    // =========================================================================
    // BACKGROUND
    // =========================================================================

    /// Record the end of a background refresh pass.
    pub fn background_refreshed(&mut self, outcome: RefreshOutcome) {
        if let RefreshOutcome::Applied(applied) = outcome {
            self.background = Some(applied);
        }
    }

    /// Image URL held by the background style variable, if any.
    pub fn background_url(&self) -> Option<String> {
        let value = self.surface.property(&self.settings.backdrop.css_variable)?;
        url_from_css_value(&value).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use portal_core::ModuleStatus;

    use super::*;

    fn state() -> AppState {
        let mut settings = Settings::default();
        settings.backdrop.enabled = false;
        AppState::new(settings)
    }

    async fn finish(state: &mut AppState, loads: Vec<PendingLoad<PageModule>>) {
        for load in loads {
            let page = PageId::for_module(load.module()).unwrap();
            let generation = load.generation();
            let result = load.wait().await;
            state.module_loaded(page, generation, result);
        }
    }

    #[tokio::test]
    async fn test_navigate_suspends_then_renders() {
        let mut state = state();
        let loads = state.navigate("/admin/categories");
        assert!(matches!(state.view, RouteView::Pending));
        assert!(state.fallback.is_some());
        assert_eq!(state.fallback_palette(), FallbackPalette::LIGHT);
        assert_eq!(loads.len(), 2);

        // A second navigation while pending starts nothing new.
        assert!(state.navigate("/admin/categories").is_empty());

        finish(&mut state, loads).await;
        let RouteView::Ready(modules) = &state.view else {
            panic!("expected ready view");
        };
        let ids: Vec<PageId> = modules.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![PageId::Admin, PageId::Catalog]);
        assert!(state.fallback.is_none());
        assert_eq!(state.registry.loads_started(PageId::Catalog), 1);
        assert_eq!(state.current_page(), Some(PageId::Catalog));
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let mut state = state();
        assert!(state.navigate("/nowhere").is_empty());
        assert!(matches!(state.view, RouteView::NotFound));
    }

    #[test]
    fn test_toggle_flips_mounted_fallback() {
        let mut state = state();
        state.navigate("/login");
        assert_eq!(state.theme(), ThemeState::Light);

        assert_eq!(state.toggle_theme(), ThemeState::Dark);
        assert!(state.surface.has_class("dark-mode"));
        assert_eq!(state.fallback_palette(), FallbackPalette::DARK);
        assert_eq!(
            state.fallback.as_ref().map(FallbackRenderer::rendered_theme),
            Some(ThemeState::Dark)
        );
        assert_eq!(state.settings.appearance.theme, ThemeState::Dark);
    }

    #[test]
    fn test_configured_theme_applied_at_start() {
        let mut settings = Settings::default();
        settings.appearance.theme = ThemeState::Dark;
        let state = AppState::new(settings);
        assert_eq!(state.theme(), ThemeState::Dark);
    }

    #[test]
    fn test_system_theme_respects_follow_setting() {
        let mut state = state();
        assert!(state.system_theme_changed(true));
        assert_eq!(state.theme(), ThemeState::Dark);

        state.settings.appearance.follow_system = false;
        assert!(!state.system_theme_changed(false));
        assert_eq!(state.theme(), ThemeState::Dark);
    }

    #[test]
    fn test_failed_load_shows_error_then_retry_reloads() {
        let mut state = state();
        let first = state.navigate("/login");
        let generation = first[0].generation();
        state.module_loaded(PageId::Login, generation, Err(LoadError::new("Login", "offline")));
        assert!(matches!(state.view, RouteView::Failed(ref e) if e.module == "Login"));
        assert!(state.fallback.is_none());

        let loads = state.retry();
        assert_eq!(loads.len(), 1);
        assert!(matches!(state.view, RouteView::Pending));
        assert_eq!(state.registry.status(PageId::Login), Some(ModuleStatus::Loading));

        // A late result from the first attempt leaves the retry in flight.
        let stale = Arc::new(PageModule::new(PageId::Login));
        state.module_loaded(PageId::Login, generation, Ok(stale));
        assert!(matches!(state.view, RouteView::Pending));
        assert_eq!(state.registry.status(PageId::Login), Some(ModuleStatus::Loading));
    }

    #[test]
    fn test_background_only_recorded_when_applied() {
        let mut state = state();
        state.background_refreshed(RefreshOutcome::Skipped);
        assert!(state.background.is_none());
    }

    #[test]
    fn test_background_url_follows_style_variable() {
        let state = state();
        assert_eq!(state.background_url(), None);

        state
            .surface
            .set_property("--bg-url", "url('https://img.test/wide.jpg')");
        assert_eq!(state.background_url().as_deref(), Some("https://img.test/wide.jpg"));

        state.surface.remove_property("--bg-url");
        assert_eq!(state.background_url(), None);
    }
}
