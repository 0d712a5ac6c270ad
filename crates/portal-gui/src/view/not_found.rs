//! Shown when no route matches the path.

use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

use crate::message::Message;

pub fn view_not_found(path: &str) -> Element<'_, Message> {
    let content = column![
        text("Page not found").size(18),
        text(format!("Nothing lives at {path}")).size(13),
        button(text("Go home").size(14))
            .on_press(Message::Navigate("/".to_string()))
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
