//! Environmental user-input signals
//!
//! The formatter needs to know two things about the world outside: did the
//! user press a key or click since the last utterance (they moved the caret,
//! so spacing and sentence state reset), and did they manually end a sentence
//! by typing '.' followed by a space (the next utterance starts capitalized).
//! A global input listener feeds these flags; the text writer clears them
//! after it types, so synthetic keystrokes never count as user actions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rdev::{Event, EventType, Key};
use tracing::warn;

/// Shared flags describing user input since the last utterance
#[derive(Debug, Default)]
pub struct UserSignals {
    key_pressed: AtomicBool,
    mouse_clicked: AtomicBool,
    manual_sentence_end: AtomicBool,
}

impl UserSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_key_pressed(&self) {
        self.key_pressed.store(true, Ordering::Relaxed);
    }

    pub fn note_mouse_clicked(&self) {
        self.mouse_clicked.store(true, Ordering::Relaxed);
    }

    pub fn set_manual_sentence_end(&self) {
        self.manual_sentence_end.store(true, Ordering::Relaxed);
    }

    pub fn clear_manual_sentence_end(&self) {
        self.manual_sentence_end.store(false, Ordering::Relaxed);
    }

    /// Did the user press a key or click the mouse since the last clear?
    pub fn saw_user_action(&self) -> bool {
        self.key_pressed.load(Ordering::Relaxed) || self.mouse_clicked.load(Ordering::Relaxed)
    }

    /// Should the next utterance start capitalized regardless of history?
    pub fn force_capitalize(&self) -> bool {
        self.manual_sentence_end.load(Ordering::Relaxed)
    }

    /// Reset every flag; called after typing so our own output is not
    /// mistaken for user input
    pub fn clear(&self) {
        self.key_pressed.store(false, Ordering::Relaxed);
        self.mouse_clicked.store(false, Ordering::Relaxed);
        self.manual_sentence_end.store(false, Ordering::Relaxed);
    }
}

/// Manual sentence ends are detected on key release: '.' primes, a following
/// space fires, anything else disarms and withdraws the signal.
fn handle_key_release(key: Key, primed: &mut bool, signals: &UserSignals) {
    match key {
        Key::Dot => *primed = true,
        Key::Space => {
            if *primed {
                signals.set_manual_sentence_end();
                *primed = false;
            }
        }
        _ => {
            *primed = false;
            signals.clear_manual_sentence_end();
        }
    }
}

/// Spawn the global keyboard/mouse listener feeding `signals`.
///
/// The listener runs until the process exits; `running` only mutes it, since
/// the underlying OS hook cannot be interrupted once started.
pub fn spawn_listener(
    signals: Arc<UserSignals>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut sentence_end_primed = false;
        let result = rdev::listen(move |event: Event| {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            match event.event_type {
                EventType::KeyPress(_) => signals.note_key_pressed(),
                EventType::KeyRelease(key) => {
                    handle_key_release(key, &mut sentence_end_primed, &signals)
                }
                EventType::ButtonPress(_) => signals.note_mouse_clicked(),
                _ => {}
            }
        });
        if let Err(error) = result {
            warn!(?error, "input listener stopped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_action_is_key_or_mouse() {
        let signals = UserSignals::new();
        assert!(!signals.saw_user_action());

        signals.note_key_pressed();
        assert!(signals.saw_user_action());

        signals.clear();
        signals.note_mouse_clicked();
        assert!(signals.saw_user_action());
    }

    #[test]
    fn test_clear_resets_everything() {
        let signals = UserSignals::new();
        signals.note_key_pressed();
        signals.note_mouse_clicked();
        signals.set_manual_sentence_end();
        signals.clear();
        assert!(!signals.saw_user_action());
        assert!(!signals.force_capitalize());
    }

    #[test]
    fn test_dot_then_space_fires_sentence_end() {
        let signals = UserSignals::new();
        let mut primed = false;
        handle_key_release(Key::Dot, &mut primed, &signals);
        handle_key_release(Key::Space, &mut primed, &signals);
        assert!(signals.force_capitalize());
    }

    #[test]
    fn test_other_key_between_dot_and_space_disarms() {
        let signals = UserSignals::new();
        let mut primed = false;
        handle_key_release(Key::Dot, &mut primed, &signals);
        handle_key_release(Key::KeyA, &mut primed, &signals);
        handle_key_release(Key::Space, &mut primed, &signals);
        assert!(!signals.force_capitalize());
    }

    #[test]
    fn test_other_key_withdraws_a_fired_signal() {
        let signals = UserSignals::new();
        let mut primed = false;
        handle_key_release(Key::Dot, &mut primed, &signals);
        handle_key_release(Key::Space, &mut primed, &signals);
        assert!(signals.force_capitalize());

        handle_key_release(Key::Backspace, &mut primed, &signals);
        assert!(!signals.force_capitalize());
    }

    #[test]
    fn test_bare_space_does_not_fire() {
        let signals = UserSignals::new();
        let mut primed = false;
        handle_key_release(Key::Space, &mut primed, &signals);
        assert!(!signals.force_capitalize());
    }
}
