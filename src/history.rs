//! Action history and undo
//!
//! Every dispatched segment produces an [`Action`] describing what it did to
//! the screen. Actions are grouped per utterance; undo walks utterances from
//! newest to oldest, reversing each one's visible effect with backspaces.

use crate::error::{Error, Result};
use crate::keyboard::KeyboardOutput;

/// Record of one executed segment, kept so it can be undone later.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Text that was typed verbatim; undone by backspacing it away
    TypedText(String),
    /// Raw keystrokes whose effect cannot be reversed generically
    Keystrokes,
    /// A find navigation; moves the caret but types nothing lasting
    FindMotion,
    /// Several actions executed as one command
    Composite(Vec<Action>),
    /// An undo that already ran; undoing it again is not supported
    UndoPerformed,
}

impl Action {
    /// Reverse this action's visible effect.
    ///
    /// Returns whether anything substantial was undone. Typed text counts
    /// when non-empty; keystrokes, find motions, and prior undos never do.
    pub fn undo(&self, keys: &mut dyn KeyboardOutput) -> Result<bool> {
        match self {
            Action::TypedText(text) => {
                for _ in text.chars() {
                    keys.tap("backspace")?;
                }
                Ok(!text.is_empty())
            }
            Action::Keystrokes => Ok(false),
            Action::FindMotion => Ok(false),
            Action::UndoPerformed => Ok(false),
            Action::Composite(actions) => {
                let mut substantial = false;
                for action in actions {
                    substantial |= action.undo(keys)?;
                }
                Ok(substantial)
            }
        }
    }
}

/// All actions produced by a single utterance, in execution order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtteranceRecord {
    actions: Vec<Action>,
}

impl UtteranceRecord {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Undo the whole utterance, newest action first
    pub fn undo(&self, keys: &mut dyn KeyboardOutput) -> Result<bool> {
        let mut substantial = false;
        for action in self.actions.iter().rev() {
            substantial |= action.undo(keys)?;
        }
        Ok(substantial)
    }
}

/// Stack of utterance records, newest last
#[derive(Debug, Default)]
pub struct ActionHistory {
    utterances: Vec<UtteranceRecord>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_utterance(&mut self, actions: Vec<Action>) {
        self.utterances.push(UtteranceRecord::new(actions));
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Pop the most recent utterance and undo it.
    ///
    /// Returns whether the undone utterance was substantial, or
    /// [`Error::HistoryEmpty`] when nothing is left.
    pub fn undo_utterance(&mut self, keys: &mut dyn KeyboardOutput) -> Result<bool> {
        let utterance = self.utterances.pop().ok_or(Error::HistoryEmpty)?;
        utterance.undo(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{KeyEvent, Recorder};

    #[test]
    fn test_typed_text_undo_backspaces() {
        let mut keys = Recorder::new();
        let action = Action::TypedText(" hello".to_string());
        assert!(action.undo(&mut keys).unwrap());
        assert_eq!(keys.events().len(), 6);
        assert!(keys
            .events()
            .iter()
            .all(|e| *e == KeyEvent::Tap("backspace".into())));
    }

    #[test]
    fn test_empty_typed_text_is_not_substantial() {
        let mut keys = Recorder::new();
        let action = Action::TypedText(String::new());
        assert!(!action.undo(&mut keys).unwrap());
        assert!(keys.events().is_empty());
    }

    #[test]
    fn test_keystrokes_and_find_are_not_substantial() {
        let mut keys = Recorder::new();
        assert!(!Action::Keystrokes.undo(&mut keys).unwrap());
        assert!(!Action::FindMotion.undo(&mut keys).unwrap());
        assert!(!Action::UndoPerformed.undo(&mut keys).unwrap());
    }

    #[test]
    fn test_composite_is_substantial_if_any_member_is() {
        let mut keys = Recorder::new();
        let composite = Action::Composite(vec![
            Action::Keystrokes,
            Action::TypedText("x".to_string()),
            Action::FindMotion,
        ]);
        assert!(composite.undo(&mut keys).unwrap());
    }

    #[test]
    fn test_utterance_undoes_in_reverse_order() {
        let mut keys = Recorder::new();
        keys.type_text("ab").unwrap();
        keys.type_text("cd").unwrap();

        let record = UtteranceRecord::new(vec![
            Action::TypedText("ab".to_string()),
            Action::TypedText("cd".to_string()),
        ]);
        assert!(record.undo(&mut keys).unwrap());
        // Four backspaces in total; "cd" removed before "ab"
        assert_eq!(keys.screen(), "");
    }

    #[test]
    fn test_history_pops_newest_first() {
        let mut keys = Recorder::new();
        let mut history = ActionHistory::new();
        history.add_utterance(vec![Action::TypedText("one".to_string())]);
        history.add_utterance(vec![Action::Keystrokes]);

        assert!(!history.undo_utterance(&mut keys).unwrap());
        assert!(history.undo_utterance(&mut keys).unwrap());
        assert!(history.is_empty());
    }

    #[test]
    fn test_empty_history_errors() {
        let mut keys = Recorder::new();
        let mut history = ActionHistory::new();
        assert!(matches!(
            history.undo_utterance(&mut keys),
            Err(Error::HistoryEmpty)
        ));
    }
}
