//! Dictation text output
//!
//! Bridges the formatter to the keyboard: reads the user-input signals,
//! formats one dictation segment, types it, and hands back the action that
//! records what was typed.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::formatter::PlainTextFormatter;
use crate::history::Action;
use crate::keyboard::KeyboardOutput;
use crate::signals::UserSignals;

pub struct TextWriter {
    formatter: PlainTextFormatter,
    signals: Arc<UserSignals>,
}

impl TextWriter {
    pub fn new(camel_trigger: &str, signals: Arc<UserSignals>) -> Self {
        Self {
            formatter: PlainTextFormatter::new(camel_trigger),
            signals,
        }
    }

    /// Format and type one dictation segment.
    ///
    /// The signals are cleared only after typing, so the keystrokes produced
    /// here never read back as user actions for the next utterance.
    pub fn dispatch(&mut self, keys: &mut dyn KeyboardOutput, raw: &str) -> Result<Action> {
        let saw_user_action = self.signals.saw_user_action();
        let force_capitalize = self.signals.force_capitalize();

        let formatted = self
            .formatter
            .format(raw, saw_user_action, force_capitalize);
        debug!(text = %formatted, "typing dictation");
        keys.type_text(&formatted)?;

        self.signals.clear();
        Ok(Action::TypedText(formatted))
    }
}
