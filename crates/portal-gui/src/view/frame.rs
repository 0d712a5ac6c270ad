//! Navigation bar and footer around the content area.

use iced::widget::{Space, button, container, row, text};
use iced::{Alignment, Element, Length, Theme};
use portal_backdrop::EndpointKind;
use portal_core::ThemeState;

use crate::message::Message;
use crate::page::{NAV_LINKS, PageId};

/// Top navigation with the theme toggle.
pub fn view_nav_bar<'a>(current: Option<PageId>, theme: ThemeState) -> Element<'a, Message> {
    let links = NAV_LINKS.iter().fold(row![].spacing(8), |links, (label, path)| {
        links.push(
            button(text(*label).size(14))
                .on_press(Message::Navigate((*path).to_string()))
                .padding([6.0, 14.0]),
        )
    });

    let location = text(current.map_or("", |page| page.label())).size(13);
    let toggle = button(text(theme.toggled().label()).size(13))
        .on_press(Message::ToggleTheme)
        .padding([6.0, 14.0]);

    container(
        row![links, Space::new().width(Length::Fill), location, toggle]
            .spacing(12)
            .align_y(Alignment::Center),
    )
    .padding([8.0, 16.0])
    .width(Length::Fill)
    .into()
}

/// Footer showing the background image currently set on the surface.
pub fn view_footer<'a>(kind: Option<EndpointKind>, url: Option<String>) -> Element<'a, Message> {
    let label = match (kind, url) {
        (Some(kind), Some(url)) => format!("Background ({kind}): {url}"),
        (None, Some(url)) => format!("Background: {url}"),
        (_, None) => "Background: none".to_string(),
    };

    container(text(label).size(11).style(|theme: &Theme| text::Style {
        color: Some(theme.extended_palette().background.weak.text),
    }))
    .padding([4.0, 16.0])
    .width(Length::Fill)
    .into()
}
