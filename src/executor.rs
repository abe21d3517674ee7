//! Utterance processing
//!
//! One utterance from the recognizer is a mix of dictation text and voice
//! commands, alternating at every occurrence of the escape word. The executor
//! splits the utterance, routes text segments to the [`TextWriter`] and
//! command segments to the dispatcher, and records everything that happened
//! as one undoable entry in the action history.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::commands::{ExecContext, ExecutionState};
use crate::config::{CommandDefinition, Config};
use crate::dispatcher;
use crate::error::Result;
use crate::history::{Action, ActionHistory};
use crate::keyboard::KeyboardOutput;
use crate::registry::CommandRegistry;
use crate::signals::UserSignals;
use crate::writer::TextWriter;

/// How long to wait for an utterance before rechecking the shutdown flag
const RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);

pub struct Executor {
    registry: Arc<Mutex<CommandRegistry>>,
    history: ActionHistory,
    writer: TextWriter,
    keys: Box<dyn KeyboardOutput>,
    escape_word: String,
    stop_phrase: String,
    inter_command_pause: Duration,
}

impl Executor {
    pub fn new(
        config: &Config,
        signals: Arc<UserSignals>,
        keys: Box<dyn KeyboardOutput>,
    ) -> Result<Self> {
        let registry = CommandRegistry::from_definitions(&config.commands)?;
        Ok(Self {
            registry: Arc::new(Mutex::new(registry)),
            history: ActionHistory::new(),
            writer: TextWriter::new(&config.camel_trigger, signals),
            keys,
            escape_word: config.escape_word.clone(),
            stop_phrase: config.stop_phrase.clone(),
            inter_command_pause: Duration::from_millis(config.inter_command_pause_ms),
        })
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    /// Replace the whole command set atomically.
    ///
    /// The new registry is built before the lock is taken; if the definitions
    /// are bad, the old commands stay in service.
    pub fn reload(&self, definitions: &[CommandDefinition]) -> Result<()> {
        let registry = CommandRegistry::from_definitions(definitions)?;
        *self.registry.lock() = registry;
        info!(commands = definitions.len(), "command registry reloaded");
        Ok(())
    }

    /// Split one raw utterance into dictation and command segments and
    /// execute them in order.
    ///
    /// Every action taken is recorded in the history before returning, even
    /// when a later segment fails; text already on screen must stay undoable.
    pub fn process_utterance(&mut self, raw: &str) -> Result<()> {
        let text = raw.to_lowercase();
        let text = text.trim();

        if text.contains(&self.stop_phrase) {
            info!("stop phrase heard, dropping utterance");
            return Ok(());
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(());
        }

        // Held for the whole utterance so a reload can never swap the
        // command set out from under an in-flight parse
        let registry = self.registry.lock();

        let mut state = ExecutionState::default();
        let mut actions: Vec<Action> = Vec::new();
        let mut command_words: Vec<&str> = Vec::new();
        let mut text_words: Vec<&str> = Vec::new();
        let mut in_command = false;
        let mut outcome = Ok(());

        for &word in &words {
            if word != self.escape_word {
                if in_command {
                    command_words.push(word);
                } else {
                    text_words.push(word);
                }
                continue;
            }

            if in_command {
                let segment = command_words.join(" ");
                debug!(segment = %segment, "command segment");
                let mut cx = ExecContext {
                    registry: &registry,
                    history: &mut self.history,
                    state: &mut state,
                    keys: &mut *self.keys,
                };
                if let Err(e) = dispatcher::dispatch(&segment, &mut actions, &mut cx) {
                    outcome = Err(e);
                    break;
                }
                // Let the target application digest the hotkeys before any
                // further typing reaches it
                thread::sleep(self.inter_command_pause);
                command_words.clear();
            } else if !text_words.is_empty() {
                let segment = text_words.join(" ");
                debug!(segment = %segment, "text segment");
                match self.writer.dispatch(&mut *self.keys, &segment) {
                    Ok(action) => actions.push(action),
                    Err(e) => {
                        outcome = Err(e);
                        break;
                    }
                }
                state.embedded_command = true;
                text_words.clear();
            }
            in_command = !in_command;
        }

        if outcome.is_ok() {
            if in_command {
                let segment = command_words.join(" ");
                debug!(segment = %segment, "trailing command segment");
                let mut cx = ExecContext {
                    registry: &registry,
                    history: &mut self.history,
                    state: &mut state,
                    keys: &mut *self.keys,
                };
                outcome = dispatcher::dispatch(&segment, &mut actions, &mut cx);
            } else {
                // Trailing dictation goes out even when empty; the formatter
                // tracks sentence state across every utterance, including
                // ones that were all commands
                let segment = text_words.join(" ");
                match self.writer.dispatch(&mut *self.keys, &segment) {
                    Ok(action) => actions.push(action),
                    Err(e) => outcome = Err(e),
                }
            }
        }

        if !actions.is_empty() {
            self.history.add_utterance(actions);
        }
        outcome
    }

    /// Consume utterances from the recognizer until shutdown.
    ///
    /// Processing errors are logged and the loop moves on; one bad utterance
    /// must not take the engine down.
    pub fn run(mut self, utterances: Receiver<String>, running: Arc<AtomicBool>) {
        info!("utterance engine ready");
        while running.load(Ordering::SeqCst) {
            match utterances.recv_timeout(RECEIVE_TIMEOUT) {
                Ok(raw) => {
                    debug!(raw = %raw, "utterance received");
                    if let Err(error) = self.process_utterance(&raw) {
                        error!(%error, "utterance processing failed");
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        info!("utterance engine stopped");
    }
}
