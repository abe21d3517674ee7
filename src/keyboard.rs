//! Keyboard output capability
//!
//! Every visible effect of the engine goes through [`KeyboardOutput`]: single
//! taps, chords with held modifiers, and typed text. [`EnigoOutput`] drives
//! the real keyboard via enigo, typing text either directly or by pasting
//! through the clipboard; [`Recorder`] captures the event stream instead, for
//! tests and dry runs.

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Error type for keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    #[error("enigo error: {0}")]
    Enigo(String),
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("unknown key name '{0}'")]
    UnknownKey(String),
}

/// Input method for typing text
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InputMethod {
    /// Use enigo's native text input directly (default)
    #[default]
    Direct,
    /// Copy to clipboard, then paste with Cmd/Ctrl+V
    Clipboard,
}

impl InputMethod {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "clipboard" => InputMethod::Clipboard,
            _ => InputMethod::Direct,
        }
    }
}

/// Abstract keyboard-output capability.
///
/// Keys are named by their config-file spellings ("ctrl", "enter", "a");
/// each backend resolves the names itself.
pub trait KeyboardOutput {
    fn tap(&mut self, key: &str) -> Result<(), KeyboardError>;
    fn press(&mut self, key: &str) -> Result<(), KeyboardError>;
    fn release(&mut self, key: &str) -> Result<(), KeyboardError>;
    fn type_text(&mut self, text: &str) -> Result<(), KeyboardError>;

    /// Hold `modifiers` in order, tap `key`, release in reverse order
    fn tap_chord(&mut self, modifiers: &[&str], key: &str) -> Result<(), KeyboardError> {
        for modifier in modifiers {
            self.press(modifier)?;
        }
        self.tap(key)?;
        for modifier in modifiers.iter().rev() {
            self.release(modifier)?;
        }
        Ok(())
    }
}

/// Resolve a config key name to an enigo key
pub fn lookup_key(name: &str) -> Result<Key, KeyboardError> {
    let key = match name {
        "ctrl" | "control" => Key::Control,
        "alt" | "option" => Key::Alt,
        "shift" => Key::Shift,
        "cmd" | "meta" | "super" | "win" => Key::Meta,
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "escape" | "esc" => Key::Escape,
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "page_up" => Key::PageUp,
        "pagedown" | "page_down" => Key::PageDown,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Unicode(c),
                _ => return Err(KeyboardError::UnknownKey(other.to_string())),
            }
        }
    };
    Ok(key)
}

/// Keyboard backend driving a real keyboard through enigo
pub struct EnigoOutput {
    enigo: Enigo,
    clipboard: Clipboard,
    method: InputMethod,
}

impl EnigoOutput {
    pub fn new(method: InputMethod) -> Result<Self, KeyboardError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| KeyboardError::Enigo(format!("failed to initialize enigo: {}", e)))?;
        let clipboard = Clipboard::new()
            .map_err(|e| KeyboardError::Clipboard(format!("failed to initialize clipboard: {}", e)))?;

        Ok(Self {
            enigo,
            clipboard,
            method,
        })
    }

    fn key(&mut self, name: &str, direction: Direction) -> Result<(), KeyboardError> {
        let key = lookup_key(name)?;
        self.enigo
            .key(key, direction)
            .map_err(|e| KeyboardError::Enigo(format!("failed to send key '{}': {}", name, e)))
    }

    /// The platform modifier for paste (Cmd on macOS, Ctrl elsewhere)
    fn paste_modifier() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "cmd"
        }
        #[cfg(not(target_os = "macos"))]
        {
            "ctrl"
        }
    }

    /// Type text directly using enigo's text method
    fn type_direct(&mut self, text: &str) -> Result<(), KeyboardError> {
        self.enigo
            .text(text)
            .map_err(|e| KeyboardError::Enigo(format!("failed to type text: {}", e)))
    }

    /// Type text via clipboard (set clipboard, paste, restore)
    fn type_via_clipboard(&mut self, text: &str) -> Result<(), KeyboardError> {
        // Save current clipboard content (best effort)
        let old_content = self.clipboard.get_text().ok();

        self.clipboard
            .set_text(text)
            .map_err(|e| KeyboardError::Clipboard(format!("failed to set clipboard: {}", e)))?;

        // Small delay for clipboard to be ready
        thread::sleep(Duration::from_millis(50));

        if let Err(e) = self.tap_chord(&[Self::paste_modifier()], "v") {
            warn!("paste failed: {}", e);
            if let Some(old) = old_content {
                let _ = self.clipboard.set_text(old);
            }
            return Err(e);
        }

        // Small delay for paste to complete
        thread::sleep(Duration::from_millis(100));

        if let Some(old) = old_content {
            let _ = self.clipboard.set_text(old);
        }

        Ok(())
    }
}

impl KeyboardOutput for EnigoOutput {
    fn tap(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.key(key, Direction::Click)
    }

    fn press(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.key(key, Direction::Press)
    }

    fn release(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.key(key, Direction::Release)
    }

    fn type_text(&mut self, text: &str) -> Result<(), KeyboardError> {
        if text.is_empty() {
            return Ok(());
        }

        match self.method {
            InputMethod::Direct => self.type_direct(text),
            InputMethod::Clipboard => {
                // Try clipboard, fall back to direct if it fails
                match self.type_via_clipboard(text) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!("clipboard method failed: {}, trying direct", e);
                        self.type_direct(text)
                    }
                }
            }
        }
    }

    fn tap_chord(&mut self, modifiers: &[&str], key: &str) -> Result<(), KeyboardError> {
        for modifier in modifiers {
            self.press(modifier)?;
        }

        // Small delay for modifiers to register
        thread::sleep(Duration::from_millis(10));

        self.tap(key)?;

        // Small delay before releasing
        thread::sleep(Duration::from_millis(50));

        for modifier in modifiers.iter().rev() {
            self.release(modifier)?;
        }

        Ok(())
    }
}

/// One observed keyboard event
#[derive(Debug, Clone, PartialEq)]
pub enum KeyEvent {
    Tap(String),
    Press(String),
    Release(String),
    Text(String),
}

/// Backend that records events instead of emitting them.
///
/// Cloning shares the underlying log, so a test can keep one handle and hand
/// the other to the engine.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<KeyEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<KeyEvent> {
        self.log.lock().clone()
    }

    /// Concatenation of all typed text, with one backspace-tap deleting the
    /// final character of what came before (approximates the screen content)
    pub fn screen(&self) -> String {
        let mut out = String::new();
        for event in self.log.lock().iter() {
            match event {
                KeyEvent::Text(text) => out.push_str(text),
                KeyEvent::Tap(key) if key == "backspace" => {
                    out.pop();
                }
                _ => {}
            }
        }
        out
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl KeyboardOutput for Recorder {
    fn tap(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.log.lock().push(KeyEvent::Tap(key.to_string()));
        Ok(())
    }

    fn press(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.log.lock().push(KeyEvent::Press(key.to_string()));
        Ok(())
    }

    fn release(&mut self, key: &str) -> Result<(), KeyboardError> {
        self.log.lock().push(KeyEvent::Release(key.to_string()));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), KeyboardError> {
        if !text.is_empty() {
            self.log.lock().push(KeyEvent::Text(text.to_string()));
        }
        Ok(())
    }
}
