//! Rendering implementation for CompressorView
//!
//! Contains the Render trait implementation and all rendering helper methods.

use gpui::{
    Context, Div, ExternalPaths, IntoElement, KeyDownEvent, PromptLevel, Render, SharedString,
    Stateful, Window, div, prelude::*, px,
};

use crate::actions::{CancelCompression, Compress, SelectInputFile, SelectOutputFile};
use crate::core::{
    LAME_MAX_BITRATE, LAME_MIN_BITRATE, WindowState, estimate_output_bytes, file_size_label,
    format_duration, format_megabytes, is_within_encoder_range, path_label,
};
use crate::ui::Theme;
use crate::ui::components::header::Header;
use crate::ui::components::status_bar::{StatusBarProps, render_status_bar};

use super::CompressorView;

/// A clickable button; the caller attaches the click handler
fn button(id: &'static str, label: &'static str, enabled: bool, theme: &Theme) -> Stateful<Div> {
    div()
        .id(SharedString::from(id))
        .px_4()
        .py_2()
        .rounded_md()
        .text_sm()
        .text_color(gpui::white())
        .bg(if enabled { theme.accent } else { theme.disabled })
        .when(enabled, |el| {
            let hover = theme.accent_hover;
            el.cursor_pointer().hover(move |s| s.bg(hover))
        })
        .child(label)
}

/// Channel count as shown next to the source details
pub(super) fn channel_label(channels: u8) -> String {
    match channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{} channels", n),
    }
}

impl CompressorView {
    pub(super) fn show_pending_error_dialog(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some((title, message)) = self.pending_error_message.take() {
            let _future = window.prompt(
                PromptLevel::Warning,
                &title,
                Some(&message),
                &["OK"],
                cx,
            );
        }
    }

    pub(super) fn show_pending_info_dialog(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some((title, message)) = self.pending_info_message.take() {
            let _future = window.prompt(
                PromptLevel::Info,
                &title,
                Some(&message),
                &["OK"],
                cx,
            );
        }
    }

    /// Source file panel: picker button, size, path and audio properties
    fn render_source_panel(&self, theme: &Theme, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let enabled = !self.is_compressing();
        let details = self.source_info.as_ref().map(|info| {
            let mut parts = vec![format_duration(info.duration)];
            if let Some(bitrate) = info.bitrate {
                parts.push(format!("{} kbps", bitrate));
            }
            if let Some(rate) = info.sample_rate {
                parts.push(format!("{} Hz", rate));
            }
            if let Some(channels) = info.channels {
                parts.push(channel_label(channels));
            }
            parts.join(" · ")
        });

        div()
            .flex()
            .flex_col()
            .gap_1()
            .child(
                button("select-file", "Select MP3 file", enabled, theme).on_click(cx.listener(
                    |this, _event, _window, cx| {
                        this.select_input_file(cx);
                    },
                )),
            )
            .child(
                div()
                    .mt_1()
                    .text_sm()
                    .text_color(theme.text)
                    .child(SharedString::from(file_size_label(self.input_size))),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(path_label(
                        "Source file",
                        self.input_path.as_deref(),
                    ))),
            )
            .when_some(details, |el, details| {
                el.child(
                    div()
                        .text_xs()
                        .text_color(theme.text_muted)
                        .child(SharedString::from(details)),
                )
            })
    }

    /// Target size field with the live bitrate estimate
    fn render_target_panel(&self, theme: &Theme, window: &Window) -> impl IntoElement {
        let is_focused = self
            .focus_handle
            .as_ref()
            .map(|h| h.is_focused(window))
            .unwrap_or(false);
        let text_display = self.target_size_text.clone();
        let estimate = self.estimated_bitrate();
        let duration = self.source_info.as_ref().map(|i| i.duration);

        div()
            .flex()
            .flex_col()
            .gap_1()
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text)
                    .child("Target size (MB):"),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        div()
                            .id(SharedString::from("target-size-input"))
                            .w(px(120.))
                            .h(px(36.))
                            .px_3()
                            .flex()
                            .items_center()
                            .bg(theme.bg_card)
                            .border_1()
                            .border_color(if is_focused { theme.accent } else { theme.border })
                            .rounded_md()
                            .child(
                                div()
                                    .text_base()
                                    .text_color(theme.text)
                                    .child(if text_display.is_empty() {
                                        " ".to_string()
                                    } else {
                                        text_display
                                    }),
                            )
                            // Cursor
                            .when(is_focused && !self.is_compressing(), |el| {
                                el.child(div().w(px(2.)).h(px(20.)).bg(theme.accent).ml_px())
                            }),
                    )
                    .child(div().text_sm().text_color(theme.text).child("MB")),
            )
            .when_some(estimate.zip(duration), |el, (bitrate, duration)| {
                let in_range = is_within_encoder_range(bitrate);
                let text = if in_range {
                    format!(
                        "Bitrate: {} kbps (~{})",
                        bitrate,
                        format_megabytes(estimate_output_bytes(bitrate, duration))
                    )
                } else {
                    format!(
                        "Bitrate: {} kbps, outside {}-{} kbps; the result will miss the target",
                        bitrate, LAME_MIN_BITRATE, LAME_MAX_BITRATE
                    )
                };
                el.child(
                    div()
                        .text_xs()
                        .text_color(if in_range { theme.text_muted } else { theme.warning })
                        .child(SharedString::from(text)),
                )
            })
    }

    /// Save location panel
    fn render_output_panel(&self, theme: &Theme, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let enabled = !self.is_compressing();

        div()
            .flex()
            .flex_col()
            .gap_1()
            .child(
                button("select-save", "Choose save location", enabled, theme).on_click(
                    cx.listener(|this, _event, _window, cx| {
                        this.select_output_file(cx);
                    }),
                ),
            )
            .child(
                div()
                    .mt_1()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(path_label(
                        "Output file",
                        self.output_path.as_deref(),
                    ))),
            )
    }
}

impl Render for CompressorView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Subscribe to appearance changes (once)
        if !self.appearance_subscription_set {
            self.appearance_subscription_set = true;
            cx.observe_window_appearance(window, |_this, _window, cx| {
                cx.notify();
            })
            .detach();
        }

        // Subscribe to bounds changes to save window state (once)
        if !self.bounds_subscription_set {
            self.bounds_subscription_set = true;
            cx.observe_window_bounds(window, |_this, window, _cx| {
                let bounds = window.bounds();
                let state = WindowState {
                    x: bounds.origin.x.into(),
                    y: bounds.origin.y.into(),
                    width: bounds.size.width.into(),
                    height: bounds.size.height.into(),
                };
                if let Err(e) = state.save() {
                    log::warn!("Failed to save window state: {}", e);
                }
            })
            .detach();
        }

        // Grab initial focus so typing and menu items work immediately
        if self.needs_initial_focus {
            self.needs_initial_focus = false;
            if let Some(ref focus_handle) = self.focus_handle {
                focus_handle.focus(window);
            }
        }

        self.show_pending_error_dialog(window, cx);
        self.show_pending_info_dialog(window, cx);

        let theme = Theme::from_appearance(window.appearance());

        let on_select_input = cx.listener(|this, _: &SelectInputFile, _window, cx| {
            this.select_input_file(cx);
        });
        let on_select_output = cx.listener(|this, _: &SelectOutputFile, _window, cx| {
            this.select_output_file(cx);
        });
        let on_compress = cx.listener(|this, _: &Compress, _window, cx| {
            this.compress(cx);
        });
        let on_cancel = cx.listener(|this, _: &CancelCompression, _window, cx| {
            this.cancel_compression(cx);
        });
        let on_key_down = cx.listener(|this, event: &KeyDownEvent, window, cx| {
            this.handle_key(event, window, cx);
        });
        let on_external_drop = cx.listener(|this, paths: &ExternalPaths, _window, cx| {
            this.add_dropped_files(paths.paths(), cx);
        });

        let source_panel = self.render_source_panel(&theme, cx);
        let target_panel = self.render_target_panel(&theme, window);
        let output_panel = self.render_output_panel(&theme, cx);
        let status_bar = render_status_bar(
            StatusBarProps {
                status_text: self.status_text(),
                is_running: self.is_compressing(),
                theme,
            },
            cx,
            |this: &mut Self, cx| this.compress(cx),
            |this: &mut Self, cx| this.cancel_compression(cx),
        );

        let mut container = div()
            .key_context("CompressorView")
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.bg);

        // Track focus if we have a focus handle (not in tests)
        if let Some(ref focus_handle) = self.focus_handle {
            container = container.track_focus(focus_handle);
        }

        container
            .on_action(on_select_input)
            .on_action(on_select_output)
            .on_action(on_compress)
            .on_action(on_cancel)
            .on_key_down(on_key_down)
            .on_drop(on_external_drop)
            .drag_over::<ExternalPaths>(move |style, _, _, _| style.bg(theme.bg_card_hover))
            .child(Header::render(
                "MP3 Compressor",
                "Re-encode an MP3 to a target file size",
                &theme,
            ))
            .child(
                div()
                    .flex_1()
                    .w_full()
                    .px_6()
                    .py_4()
                    .flex()
                    .flex_col()
                    .gap_5()
                    .child(source_panel)
                    .child(target_panel)
                    .child(output_panel),
            )
            .child(status_bar)
    }
}
