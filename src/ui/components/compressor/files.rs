//! File selection for CompressorView
//!
//! Open/save pickers and drag-and-drop of MP3 files.

use std::path::PathBuf;

use gpui::{AsyncApp, Context, PathPromptOptions, WeakEntity};

use crate::audio::is_mp3_file;
use crate::core::AppSettings;

use super::CompressorView;

impl CompressorView {
    /// Show the open picker for the source MP3
    pub fn select_input_file(&mut self, cx: &mut Context<Self>) {
        if self.is_compressing() {
            return;
        }

        let options = PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: None,
        };
        let receiver = cx.prompt_for_paths(options);
        cx.spawn(|this_handle: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                if let Ok(Ok(Some(paths))) = receiver.await {
                    if let Some(path) = paths.first() {
                        let path = path.clone();
                        let _ = this_handle.update(&mut async_cx, |this, cx| {
                            this.open_input_file(path, cx);
                        });
                    }
                }
            }
        })
        .detach();
    }

    /// Select a source file, queueing an error dialog if it is rejected
    pub(crate) fn open_input_file(&mut self, path: PathBuf, cx: &mut Context<Self>) {
        if let Err(e) = self.set_input_file(path) {
            log::warn!("{}", e);
            self.show_error("Error", e);
        }
        cx.notify();
    }

    /// Handle files dropped on the window: the first MP3 wins
    pub(crate) fn add_dropped_files(&mut self, paths: &[PathBuf], cx: &mut Context<Self>) {
        if self.is_compressing() {
            return;
        }

        match paths.iter().find(|p| is_mp3_file(p)) {
            Some(path) => self.open_input_file(path.clone(), cx),
            None => {
                self.show_error("Error", "Please drop an MP3 file.");
                cx.notify();
            }
        }
    }

    /// Show the save picker for the compressed copy
    pub fn select_output_file(&mut self, cx: &mut Context<Self>) {
        if self.is_compressing() {
            return;
        }

        let last_save_dir = cx.global::<AppSettings>().last_save_dir.clone();
        let (start_dir, default_filename) = self.save_dialog_defaults(last_save_dir.as_deref());

        let receiver = cx.prompt_for_new_path(&start_dir, Some(&default_filename));
        cx.spawn(move |this_handle: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                if let Ok(Ok(Some(path))) = receiver.await {
                    let _ = this_handle.update(&mut async_cx, |this, cx| {
                        this.set_output_file(path);

                        let settings = cx.global_mut::<AppSettings>();
                        settings.last_save_dir = this
                            .output_path
                            .as_deref()
                            .and_then(|p| p.parent())
                            .map(|p| p.to_path_buf());
                        if let Err(e) = settings.save() {
                            log::warn!("Failed to save settings: {}", e);
                        }

                        cx.notify();
                    });
                }
            }
        })
        .detach();
    }
}
