//! Portal desktop shell.
//!
//! Built with Iced 0.14.0 using the Elm architecture (State, Message, Update, View).
//! The shell owns the concrete route table and page modules; the decisions
//! about what to show while pages load live in `portal-core`.

pub mod app;
pub mod logging;
pub mod message;
pub mod page;
pub mod state;
pub mod view;

pub use app::App;
pub use message::Message;
