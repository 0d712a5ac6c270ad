//! View functions.
//!
//! Views are pure functions of state that return `Element<Message>`.

mod error_boundary;
mod fallback;
mod frame;
mod not_found;
mod page;

pub use error_boundary::view_error_boundary;
pub use fallback::{to_color, view_fallback};
pub use frame::{view_footer, view_nav_bar};
pub use not_found::view_not_found;
pub use page::view_page;
