//! StatusBar component - Bottom bar with compression stage and action buttons

use gpui::{div, prelude::*, Context, IntoElement, SharedString};

use crate::ui::Theme;

/// Properties for the status bar
pub struct StatusBarProps {
    /// Stage text shown on the left ("Ready", "Compressing...")
    pub status_text: String,
    /// Whether a compression is running (shows Cancel, disables Compress)
    pub is_running: bool,
    pub theme: Theme,
}

/// Render the status bar
///
/// Displays the current stage on the left, Cancel (while running) and
/// Compress buttons on the right.
pub fn render_status_bar<V: 'static>(
    props: StatusBarProps,
    cx: &mut Context<V>,
    on_compress: impl Fn(&mut V, &mut Context<V>) + 'static,
    on_cancel: impl Fn(&mut V, &mut Context<V>) + 'static,
) -> impl IntoElement {
    let StatusBarProps {
        status_text,
        is_running,
        theme,
    } = props;
    let compress_enabled = !is_running;
    let cancel_hover = theme.bg_card_hover;
    let compress_hover = theme.success_hover;

    div()
        .py_4()
        .px_6()
        .flex()
        .items_center()
        .justify_between()
        .border_t_1()
        .border_color(theme.border)
        .text_sm()
        .text_color(theme.text_muted)
        .child(SharedString::from(status_text))
        .child(
            div()
                .flex()
                .gap_2()
                .when(is_running, |el| {
                    el.child(
                        div()
                            .id(SharedString::from("cancel-button"))
                            .px_4()
                            .py_1()
                            .bg(theme.bg_card)
                            .border_1()
                            .border_color(theme.danger)
                            .text_color(theme.danger)
                            .rounded_md()
                            .cursor_pointer()
                            .hover(move |s| s.bg(cancel_hover))
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                on_cancel(view, cx);
                            }))
                            .child("Cancel"),
                    )
                })
                .child(
                    div()
                        .id(SharedString::from("compress-button"))
                        .px_4()
                        .py_1()
                        .bg(if compress_enabled {
                            theme.success
                        } else {
                            theme.disabled
                        })
                        .text_color(gpui::white())
                        .font_weight(gpui::FontWeight::SEMIBOLD)
                        .rounded_md()
                        .when(compress_enabled, |el| {
                            el.cursor_pointer().hover(move |s| s.bg(compress_hover))
                        })
                        .on_click(cx.listener(move |view, _event, _window, cx| {
                            if compress_enabled {
                                on_compress(view, cx);
                            }
                        }))
                        .child("Compress"),
                ),
        )
}
