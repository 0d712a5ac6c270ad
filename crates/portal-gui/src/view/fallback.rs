//! Loading placeholder.
//!
//! Centered, full size, colored from the fallback palette. The palette is
//! re-read on every render, so a theme toggle while a page loads flips the
//! colors without remounting.

use iced::widget::{column, container, progress_bar, text};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};
use portal_core::{FallbackPalette, LOADING_CAPTION, Rgba};

use crate::message::Message;

/// Convert a core color to an iced color.
pub fn to_color(color: Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

/// Render the loading placeholder.
pub fn view_fallback<'a>(palette: FallbackPalette) -> Element<'a, Message> {
    let background = to_color(palette.background);
    let foreground = to_color(palette.foreground);

    let indicator = container(progress_bar(0.0..=1.0, 0.35).girth(4.0).style(
        move |_theme: &Theme| progress_bar::Style {
            background: Background::Color(Color {
                a: 0.15,
                ..foreground
            }),
            bar: Background::Color(foreground),
            border: Border::default(),
        },
    ))
    .width(Length::Fixed(160.0));

    let content = column![indicator, text(LOADING_CAPTION).size(16)]
        .spacing(16)
        .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Shrink)
        .center_y(Length::Shrink)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(background)),
            text_color: Some(foreground),
            ..Default::default()
        })
        .into()
}
