//! Page content.
//!
//! Modules of the matched route are rendered innermost first, each
//! container wrapping the content of the page nested inside it.

use std::sync::Arc;

use iced::widget::{Space, button, column, row, text};
use iced::{Element, Length};

use crate::message::Message;
use crate::page::{ADMIN_TABS, PageModule};

/// Render the modules of a ready route, outermost first.
pub fn view_page(modules: &[Arc<PageModule>]) -> Element<'_, Message> {
    let mut content: Option<Element<'_, Message>> = None;
    for module in modules.iter().rev() {
        content = Some(match content {
            Some(child) if module.id.is_container() => view_container(module, child),
            _ => view_leaf(module),
        });
    }
    content.unwrap_or_else(|| Space::new().into())
}

fn view_leaf(module: &PageModule) -> Element<'_, Message> {
    column![text(module.title).size(24), text(module.summary).size(14)]
        .spacing(8)
        .padding(24)
        .width(Length::Fill)
        .into()
}

fn view_container<'a>(module: &'a PageModule, child: Element<'a, Message>) -> Element<'a, Message> {
    let tabs = ADMIN_TABS.iter().fold(row![].spacing(8), |tabs, (page, path)| {
        tabs.push(
            button(text(page.label()).size(13))
                .on_press(Message::Navigate((*path).to_string()))
                .padding([6.0, 14.0]),
        )
    });

    column![text(module.title).size(28), tabs, child]
        .spacing(16)
        .padding(24)
        .width(Length::Fill)
        .into()
}
