//! Application messages.

use std::sync::Arc;

use iced::keyboard;
use iced::{Size, theme};
use portal_backdrop::RefreshOutcome;
use portal_core::LoadError;

use crate::page::{PageId, PageModule};

/// Every event the shell reacts to.
#[derive(Debug, Clone)]
pub enum Message {
    /// Go to a path.
    Navigate(String),

    /// A page module load finished.
    ModuleLoaded {
        page: PageId,
        generation: u64,
        result: Result<Arc<PageModule>, LoadError>,
    },

    /// Flip between light and dark.
    ToggleTheme,

    /// The OS switched between light and dark.
    SystemThemeChanged(theme::Mode),

    /// The main window was resized.
    WindowResized(Size),

    /// A background refresh pass ended.
    BackgroundRefreshed(RefreshOutcome),

    /// Reset failed pages and reload the current route.
    RetryRoute,

    /// Global keyboard shortcut.
    KeyPressed(keyboard::Key, keyboard::Modifiers),

    Noop,
}
