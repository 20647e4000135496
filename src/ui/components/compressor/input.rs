//! Keyboard handling for the target size field

use gpui::{Context, KeyDownEvent, Window};

use super::CompressorView;

impl CompressorView {
    /// Handle a key press - returns true if the event was handled
    pub(super) fn handle_key(
        &mut self,
        event: &KeyDownEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) -> bool {
        let keystroke = &event.keystroke;

        // Leave shortcuts (Cmd-O, Cmd-S, ...) to the action bindings
        if keystroke.modifiers.platform || keystroke.modifiers.control {
            return false;
        }

        if keystroke.key == "escape" {
            self.cancel_compression(cx);
            return true;
        }

        if keystroke.key == "enter" {
            self.compress(cx);
            return true;
        }

        // The field is read-only while compressing
        if self.is_compressing() {
            return false;
        }

        if keystroke.key == "backspace" {
            if self.pop_target_char() {
                cx.notify();
            }
            return true;
        }

        if let Some(ref key_char) = keystroke.key_char {
            let mut changed = false;
            for c in key_char.chars() {
                changed |= self.push_target_char(c);
            }
            if changed {
                cx.notify();
            }
            return true;
        }

        false
    }
}
