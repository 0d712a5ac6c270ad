//! Error boundary shown when a page module fails to load.

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length, Theme};
use portal_core::LoadError;

use crate::message::Message;

/// Render the failure with a retry button.
pub fn view_error_boundary(err: &LoadError) -> Element<'_, Message> {
    let content = column![
        text("This page could not be loaded").size(18),
        text(err.to_string())
            .size(13)
            .style(|theme: &Theme| text::Style {
                color: Some(theme.extended_palette().danger.base.color),
            }),
        button(text("Retry").size(14))
            .on_press(Message::RetryRoute)
            .padding([8.0, 20.0]),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Shrink)
        .center_y(Length::Shrink)
        .into()
}
