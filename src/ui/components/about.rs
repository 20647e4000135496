//! About window component

use gpui::{
    Bounds, Context, Render, SharedString, Window, WindowBounds, WindowHandle, WindowOptions, div,
    prelude::*, px, size,
};

use crate::conversion::get_ffmpeg_path;
use crate::logging;
use crate::ui::Theme;

/// The About window content
pub struct AboutBox {
    /// Where ffmpeg was found, or why it wasn't
    ffmpeg_status: String,
}

impl AboutBox {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        let ffmpeg_status = match get_ffmpeg_path() {
            Ok(path) => format!("ffmpeg: {}", path.display()),
            Err(e) => e,
        };
        Self { ffmpeg_status }
    }

    /// Open the About window
    pub fn open(cx: &mut gpui::App) -> Option<WindowHandle<Self>> {
        let bounds = Bounds::centered(None, size(px(400.), px(220.)), cx);

        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(400.), px(220.))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("About MP3 Compressor".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| cx.new(AboutBox::new),
        )
        .map_err(|e| log::warn!("Failed to open About window: {}", e))
        .ok()
    }
}

impl Render for AboutBox {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let version = env!("CARGO_PKG_VERSION");
        let theme = Theme::from_appearance(window.appearance());

        div()
            .flex()
            .flex_col()
            .justify_center()
            .size_full()
            .bg(theme.bg)
            .p_6()
            .gap_1()
            .child(
                div()
                    .text_xl()
                    .font_weight(gpui::FontWeight::BOLD)
                    .text_color(theme.text)
                    .child("MP3 Compressor"),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(format!("Version {}", version))),
            )
            .child(div().h(px(8.)))
            .child(
                div()
                    .text_sm()
                    .text_color(theme.text_muted)
                    .child("Re-encode an MP3 to fit a target file size"),
            )
            .child(div().h(px(8.)))
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child("Built with Rust and GPUI"),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child("Powered by FFmpeg (ffmpeg.org)"),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(SharedString::from(self.ffmpeg_status.clone())),
            )
            .child(div().h(px(8.)))
            .child(
                div()
                    .id("log-link")
                    .text_xs()
                    .text_color(theme.accent)
                    .cursor_pointer()
                    .hover(|s| s.underline())
                    .on_click(cx.listener(|_, _, _, _| {
                        if let Err(e) = logging::open_log_directory() {
                            log::warn!("{}", e);
                        }
                    }))
                    .child("Open log folder"),
            )
    }
}
