//! Application subscriptions.
//!
//! | Subscription | Condition | Purpose |
//! |--------------|-----------|---------|
//! | Keyboard | Always | Global keyboard shortcuts |
//! | Window Resize | Backdrop enabled | Re-select the background endpoint |
//! | System Theme | `follow_system` on | Track OS theme changes |

use iced::Subscription;
use iced::keyboard;
use iced::{system, window};

use crate::message::Message;
use crate::state::AppState;

/// Create all application subscriptions.
pub fn create_subscription(state: &AppState) -> Subscription<Message> {
    Subscription::batch([
        keyboard_subscription(),
        resize_subscription(state),
        system_theme_subscription(state),
    ])
}

/// Keyboard event subscription.
fn keyboard_subscription() -> Subscription<Message> {
    keyboard::listen().map(|event| match event {
        keyboard::Event::KeyPressed { key, modifiers, .. } => Message::KeyPressed(key, modifiers),
        _ => Message::Noop,
    })
}

/// Window resize subscription. Every event triggers a refresh; no debounce.
fn resize_subscription(state: &AppState) -> Subscription<Message> {
    if state.settings.backdrop.enabled {
        window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    } else {
        Subscription::none()
    }
}

/// System theme change subscription.
fn system_theme_subscription(state: &AppState) -> Subscription<Message> {
    if state.settings.appearance.follow_system {
        system::theme_changes().map(Message::SystemThemeChanged)
    } else {
        Subscription::none()
    }
}
