//! Compression workflow for CompressorView
//!
//! Validates the inputs, hands the job to the worker thread and polls for
//! its outcome.

use std::time::Duration;

use gpui::{AsyncApp, Context, Timer, WeakEntity};

use crate::conversion::{get_ffprobe_path, start_compression, verify_ffmpeg, CompressionJob};
use crate::core::AppSettings;

use super::CompressorView;

impl CompressorView {
    /// Validate inputs and start compressing (Compress button / Enter / Cmd-Enter)
    pub fn compress(&mut self, cx: &mut Context<Self>) {
        if self.is_compressing() {
            return;
        }

        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.show_error(e.title(), e.to_string());
                cx.notify();
                return;
            }
        };

        let ffmpeg_path = match verify_ffmpeg() {
            Ok(path) => path,
            Err(e) => {
                log::error!("{}", e);
                self.show_error("Error", e);
                cx.notify();
                return;
            }
        };
        let ffprobe_path = match get_ffprobe_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("{}; using built-in duration probe", e);
                None
            }
        };

        let settings = cx.global_mut::<AppSettings>();
        settings.last_target_size = Some(self.target_size_text.clone());
        if let Err(e) = settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }

        let job = CompressionJob {
            request,
            ffmpeg_path,
            ffprobe_path,
            keep_album_art: settings.keep_album_art,
        };

        match start_compression(job, self.compression_state.clone()) {
            Ok(_handle) => self.start_compression_polling(cx),
            Err(e) => {
                log::error!("{}", e);
                self.show_error("Error", e);
            }
        }
        cx.notify();
    }

    /// Kill the running encoder (Cancel button / Escape)
    pub fn cancel_compression(&mut self, cx: &mut Context<Self>) {
        if self.is_compressing() {
            log::info!("Compression cancel requested");
            self.compression_state.cancel();
            cx.notify();
        }
    }

    /// Poll the worker until the run finishes, refreshing the status bar
    fn start_compression_polling(&mut self, cx: &mut Context<Self>) {
        if self.is_polling {
            return;
        }
        self.is_polling = true;

        cx.spawn(|this: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                loop {
                    let cx_for_after_await = async_cx.clone();

                    Timer::after(Duration::from_millis(100)).await;

                    let should_continue = this
                        .update(&mut async_cx, |this, cx| {
                            let finished = this.poll_compression();
                            if finished {
                                this.is_polling = false;
                            }
                            cx.notify();
                            !finished
                        })
                        .unwrap_or(false);

                    if !should_continue {
                        break;
                    }

                    async_cx = cx_for_after_await;
                }
            }
        })
        .detach();
    }
}
