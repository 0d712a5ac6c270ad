//! Main application module for Portal.
//!
//! This module implements the Iced 0.14.0 application using the builder pattern.
//! The architecture follows the Elm pattern: State → Message → Update → View.
//!
//! # Key Design Principles
//!
//! - **All state changes happen in `update()`** - Views are pure functions
//! - **No channels/polling** - Page loads and background refreshes are
//!   `Task::perform` futures whose results come back as messages
//! - **One load per page** - only freshly started loads are scheduled

mod keyboard;
pub mod subscription;

use iced::widget::{column, container};
use iced::{Element, Length, Subscription, Task, Theme};
use portal_backdrop::{BackgroundRefresher, HttpFetcher};
use portal_core::{PendingLoad, ThemeState};

use crate::message::Message;
use crate::page::{PageId, PageModule};
use crate::state::{AppState, RouteView, Settings};
use crate::view::{view_error_boundary, view_fallback, view_footer, view_nav_bar, view_not_found, view_page};

// =============================================================================
// APPLICATION
// =============================================================================

/// Main application struct.
pub struct App {
    /// All application state.
    pub state: AppState,
}

impl App {
    /// Create a new application instance.
    ///
    /// Loads settings, navigates to `/` and starts the first background
    /// refresh at the configured window width.
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let mut state = AppState::new(settings);

        match HttpFetcher::new(&state.settings.backdrop) {
            Ok(fetcher) => {
                state.backdrop = Some(BackgroundRefresher::new(
                    fetcher,
                    state.surface.clone(),
                    state.settings.backdrop.clone(),
                ));
            }
            Err(err) => tracing::warn!("Background refresh unavailable: {}", err),
        }

        let mut app = Self { state };
        let loads = app.state.navigate("/");
        let startup = Task::batch([
            schedule_loads(loads),
            app.refresh_background(app.state.viewport_width),
        ]);
        (app, startup)
    }

    /// Update application state in response to a message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // =================================================================
            // Routing
            // =================================================================
            Message::Navigate(path) => schedule_loads(self.state.navigate(&path)),

            Message::ModuleLoaded {
                page,
                generation,
                result,
            } => schedule_loads(self.state.module_loaded(page, generation, result)),

            Message::RetryRoute => schedule_loads(self.state.retry()),

            // =================================================================
            // Theme
            // =================================================================
            Message::ToggleTheme => {
                let theme = self.state.toggle_theme();
                tracing::info!("Theme set to {}", theme);
                if let Err(err) = self.state.settings.save() {
                    tracing::warn!("Failed to save settings: {:#}", err);
                }
                Task::none()
            }

            Message::SystemThemeChanged(mode) => {
                let dark = matches!(mode, iced::theme::Mode::Dark);
                if self.state.system_theme_changed(dark) {
                    tracing::info!("Following system theme ({})", self.state.theme());
                }
                Task::none()
            }

            Message::KeyPressed(key, modifiers) => self.handle_key_press(key, modifiers),

            // =================================================================
            // Background
            // =================================================================
            Message::WindowResized(size) => {
                self.state.viewport_width = size.width.max(0.0) as u32;
                self.refresh_background(self.state.viewport_width)
            }

            Message::BackgroundRefreshed(outcome) => {
                self.state.background_refreshed(outcome);
                Task::none()
            }

            Message::Noop => Task::none(),
        }
    }

    /// Render the current state.
    pub fn view(&self) -> Element<'_, Message> {
        let content = match &self.state.view {
            RouteView::Pending => view_fallback(self.state.fallback_palette()),
            RouteView::Ready(modules) => view_page(modules),
            RouteView::Failed(err) => view_error_boundary(err),
            RouteView::NotFound => view_not_found(&self.state.path),
        };

        let body = column![
            view_nav_bar(self.state.current_page(), self.state.theme()),
            container(content).width(Length::Fill).height(Length::Fill),
            view_footer(
                self.state.background.as_ref().map(|applied| applied.kind),
                self.state.background_url(),
            ),
        ];

        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window title.
    pub fn title(&self) -> String {
        match &self.state.view {
            RouteView::Pending => "Portal - Loading".to_string(),
            RouteView::NotFound => "Portal - Not Found".to_string(),
            RouteView::Failed(_) => "Portal - Error".to_string(),
            RouteView::Ready(_) => match self.state.current_page() {
                Some(PageId::Home) | None => "Portal".to_string(),
                Some(page) => format!("Portal - {page}"),
            },
        }
    }

    /// Iced theme following the decoded theme marker.
    pub fn theme(&self) -> Theme {
        match self.state.theme() {
            ThemeState::Dark => Theme::Dark,
            ThemeState::Light => Theme::Light,
        }
    }

    /// Subscribe to runtime events.
    pub fn subscription(&self) -> Subscription<Message> {
        subscription::create_subscription(&self.state)
    }

    /// Run one background refresh pass for `width`.
    fn refresh_background(&self, width: u32) -> Task<Message> {
        match &self.state.backdrop {
            Some(refresher) => {
                let refresher = refresher.clone();
                Task::perform(
                    async move { refresher.run(width).await },
                    Message::BackgroundRefreshed,
                )
            }
            None => Task::none(),
        }
    }
}

/// Turn freshly started page loads into tasks, one per load.
fn schedule_loads(loads: Vec<PendingLoad<PageModule>>) -> Task<Message> {
    Task::batch(loads.into_iter().filter_map(|load| {
        let Some(page) = PageId::for_module(load.module()) else {
            tracing::error!("Load started for unknown page {}", load.module());
            return None;
        };
        let generation = load.generation();
        Some(Task::perform(load.wait(), move |result| {
            Message::ModuleLoaded {
                page,
                generation,
                result,
            }
        }))
    }))
}
