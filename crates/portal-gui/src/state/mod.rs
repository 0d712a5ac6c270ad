//! Application state.

mod app_state;
mod settings;

pub use app_state::{AppState, RouteView};
pub use settings::{AppearanceSettings, Settings, WindowSettings};
