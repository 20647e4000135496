//! Header component - Application title bar

use gpui::{div, prelude::*, IntoElement};

use crate::ui::Theme;

/// Render the application header
pub struct Header;

impl Header {
    /// Render the header with the given title and subtitle
    pub fn render(title: &str, subtitle: &str, theme: &Theme) -> impl IntoElement {
        div()
            .w_full()
            .h_16()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .bg(theme.bg_header)
            .text_color(gpui::white())
            .child(
                div()
                    .text_lg()
                    .font_weight(gpui::FontWeight::SEMIBOLD)
                    .child(title.to_string()),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(subtitle.to_string()),
            )
    }
}
