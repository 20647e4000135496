//! MP3 Compressor - GPUI Application
//!
//! A desktop utility that re-encodes an MP3 at the bitrate needed to hit a
//! target file size, using ffmpeg for the actual encoding.

mod actions;
mod audio;
mod conversion;
mod core;
mod logging;
mod test_fixtures;
mod ui;

use gpui::{
    prelude::*, point, px, size, App, Application, Bounds, KeyBinding, Menu, MenuItem,
    WindowBounds, WindowOptions,
};
use std::time::Duration;
use actions::{
    About, CancelCompression, Compress, OpenLogFolder, Quit, SelectInputFile, SelectOutputFile,
    ToggleKeepAlbumArt,
};
use core::{AppSettings, CompressionState, WindowState};
use ui::components::{AboutBox, CompressorView};

/// Minimum window size
const MIN_WIDTH: f32 = 420.;
const MIN_HEIGHT: f32 = 440.;

/// How long closing the window waits for a cancelled encode to clean up
const CLOSE_WAIT: Duration = Duration::from_secs(3);

/// Build the application menus with current settings state
fn build_menus(settings: &AppSettings) -> Vec<Menu> {
    // Use checkmark prefix when enabled
    let keep_album_art_label = if settings.keep_album_art {
        "✓ Keep Album Art"
    } else {
        "Keep Album Art"
    };

    vec![
        Menu {
            name: "MP3 Compressor".into(),
            items: vec![
                MenuItem::action("About MP3 Compressor", About),
                MenuItem::separator(),
                MenuItem::action("Quit", Quit),
            ],
        },
        Menu {
            name: "File".into(),
            items: vec![
                MenuItem::action("Select MP3 File...", SelectInputFile),
                MenuItem::action("Choose Save Location...", SelectOutputFile),
                MenuItem::separator(),
                MenuItem::action("Compress", Compress),
                MenuItem::action("Cancel Compression", CancelCompression),
            ],
        },
        Menu {
            name: "Options".into(),
            items: vec![
                MenuItem::action(keep_album_art_label, ToggleKeepAlbumArt),
                MenuItem::separator(),
                MenuItem::action("Open Log Folder", OpenLogFolder),
            ],
        },
    ]
}

fn main() {
    if let Some(path) = logging::init_logging() {
        log::debug!("Logging to {}", path.display());
    }

    match conversion::verify_ffmpeg() {
        Ok(path) => log::info!("Using ffmpeg at {}", path.display()),
        Err(e) => log::warn!("{}", e),
    }

    Application::new().run(|cx: &mut App| {
        cx.set_global(AppSettings::load());

        // Register action handlers
        cx.on_action(|_: &Quit, cx| cx.quit());
        cx.on_action(|_: &About, cx| {
            AboutBox::open(cx);
        });
        cx.on_action(|_: &OpenLogFolder, _cx| {
            if let Err(e) = logging::open_log_directory() {
                log::warn!("{}", e);
            }
        });
        cx.on_action(|_: &ToggleKeepAlbumArt, cx| {
            let settings = cx.global_mut::<AppSettings>();
            settings.keep_album_art = !settings.keep_album_art;
            log::info!("Keep album art: {}", settings.keep_album_art);
            if let Err(e) = settings.save() {
                log::warn!("Failed to save settings: {}", e);
            }

            // Rebuild menus to show updated checkmark
            let menus = build_menus(settings);
            cx.set_menus(menus);
        });

        // Note: file and compression actions are handled by CompressorView
        // via on_action in render(); the view has focus, so it receives the
        // actions dispatched from menu items.

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-o", SelectInputFile, None),
            KeyBinding::new("cmd-s", SelectOutputFile, None),
            KeyBinding::new("cmd-enter", Compress, None),
            KeyBinding::new("cmd-.", CancelCompression, None),
        ]);

        let settings = cx.global::<AppSettings>();
        let initial_target_size = settings.last_target_size.clone();
        cx.set_menus(build_menus(settings));

        // Shared with the view; also reached from the window-closed handler
        let compression_state = CompressionState::new();
        cx.set_global(compression_state.clone());

        // Reopen where the window was last left
        let window_state = WindowState::load();
        let bounds = Bounds {
            origin: point(px(window_state.x as f32), px(window_state.y as f32)),
            size: size(
                px((window_state.width as f32).max(MIN_WIDTH)),
                px((window_state.height as f32).max(MIN_HEIGHT)),
            ),
        };

        let opened = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(MIN_WIDTH), px(MIN_HEIGHT))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("MP3 Compressor".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| {
                cx.new(|cx| CompressorView::new(cx, initial_target_size, compression_state))
            },
        );
        if let Err(e) = opened {
            log::error!("Failed to open main window: {}", e);
            cx.quit();
            return;
        }

        // Quit the app when the main window is closed. A running encode is
        // killed and its partial output removed before quitting.
        cx.on_window_closed(|cx| {
            let state = cx.global::<CompressionState>();
            state.cancel();
            if !state.wait_until_finished(CLOSE_WAIT) {
                log::warn!("Compression worker did not stop before quitting");
            }
            cx.quit();
        })
        .detach();

        cx.activate(true);
    });
}
