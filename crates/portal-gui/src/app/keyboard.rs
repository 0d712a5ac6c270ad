//! Keyboard shortcut handling.
//!
//! - Cmd/Ctrl+D (Toggle theme)
//! - Cmd/Ctrl+R (Retry a failed page)
//! - Cmd/Ctrl+H (Home)

use iced::Task;
use iced::keyboard;

use crate::app::App;
use crate::message::Message;
use crate::state::RouteView;

impl App {
    /// Handle keyboard shortcuts.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle_key_press(
        &mut self,
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
    ) -> Task<Message> {
        match key.as_ref() {
            keyboard::Key::Character("d") if modifiers.command() => Task::done(Message::ToggleTheme),

            keyboard::Key::Character("r") if modifiers.command() => {
                if matches!(self.state.view, RouteView::Failed(_)) {
                    Task::done(Message::RetryRoute)
                } else {
                    Task::none()
                }
            }

            keyboard::Key::Character("h") if modifiers.command() => {
                Task::done(Message::Navigate("/".to_string()))
            }

            _ => Task::none(),
        }
    }
}
