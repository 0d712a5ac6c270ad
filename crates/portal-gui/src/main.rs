//! Portal - Desktop shell entry point.

use iced::Size;
use portal_gui::App;
use portal_gui::state::Settings;

/// Application entry point.
pub fn main() -> iced::Result {
    portal_gui::logging::init();

    tracing::info!("Starting Portal");

    let window = Settings::load().window;

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .subscription(App::subscription)
        .window_size(Size::new(window.width, window.height))
        .run()
}
