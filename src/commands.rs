//! Command variants and their execution behavior
//!
//! Each configured command becomes one [`Command`] variant carrying its
//! validated, immutable configuration. Executing a command yields an
//! [`Action`] describing what it did, which the history keeps for undo.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::{CaseStyle, CommandDefinition, CommandKind, FindDirection};
use crate::error::{Error, Result};
use crate::history::{Action, ActionHistory};
use crate::keyboard::KeyboardOutput;
use crate::multiplier;
use crate::registry::CommandRegistry;

/// Separator between keys within one hotkey spec, e.g. "ctrl+alt+a"
const HOTKEY_SEPARATOR: char = '+';

/// Separator between a find command's search text and its repeat count
const FIND_ARGS_SEPARATOR: &str = " pipe ";

/// One or more keys pressed together: modifiers held around one operand key
#[derive(Debug, Clone)]
pub struct Hotkey {
    pub modifiers: Vec<String>,
    pub key: String,
}

impl Hotkey {
    /// Parse a spec like "ctrl+alt+a" or "enter"
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parts: Vec<&str> = spec.split(HOTKEY_SEPARATOR).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::Config(format!("malformed hotkey '{}'", spec)));
        }
        let key = parts.pop().map(|k| k.to_string()).ok_or_else(|| {
            Error::Config(format!("malformed hotkey '{}'", spec))
        })?;
        Ok(Self {
            modifiers: parts.into_iter().map(|p| p.to_string()).collect(),
            key,
        })
    }

    fn tap(&self, keys: &mut dyn KeyboardOutput) -> Result<()> {
        if self.modifiers.is_empty() {
            keys.tap(&self.key)?;
        } else {
            let modifiers: Vec<&str> = self.modifiers.iter().map(|m| m.as_str()).collect();
            keys.tap_chord(&modifiers, &self.key)?;
        }
        Ok(())
    }
}

/// One entry in a keystroke command's sequence
#[derive(Debug, Clone)]
pub enum KeystrokeStep {
    Chord(Hotkey),
    Delay(Duration),
}

impl KeystrokeStep {
    fn parse(spec: &str) -> Result<Self> {
        let mut tokens = spec.split_whitespace();
        if tokens.next() == Some("delay") {
            let seconds = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .filter(|s| *s >= 0.0)
                .ok_or_else(|| Error::Config(format!("malformed delay '{}'", spec)))?;
            return Ok(KeystrokeStep::Delay(Duration::from_secs_f64(seconds)));
        }
        Ok(KeystrokeStep::Chord(Hotkey::parse(spec)?))
    }
}

/// Mutable state shared by every command in one utterance
#[derive(Debug, Default)]
pub struct ExecutionState {
    /// True once dictation text was typed earlier in this utterance, so
    /// command output that types text must separate itself with a space
    pub embedded_command: bool,
}

/// Everything a command needs while executing: the registry (for chains),
/// the history (for undo), the per-utterance state, and the keyboard.
pub struct ExecContext<'a> {
    pub registry: &'a CommandRegistry,
    pub history: &'a mut ActionHistory,
    pub state: &'a mut ExecutionState,
    pub keys: &'a mut dyn KeyboardOutput,
}

/// A fully validated command, shared immutably between all its aliases.
///
/// Configuration errors (bad hotkeys, bad delays, unimplemented options) are
/// caught here, when the registry is built, not at execution time.
#[derive(Debug)]
pub enum Command {
    Keystroke {
        steps: Vec<KeystrokeStep>,
        leading_space: bool,
    },
    Type {
        content: String,
    },
    Case {
        style: CaseStyle,
    },
    Find {
        direction: FindDirection,
        hotkey: Hotkey,
    },
    Chain {
        commands: Vec<String>,
    },
    UndoUtterance,
}

impl Command {
    pub fn from_definition(definition: &CommandDefinition) -> Result<Self> {
        let command = match &definition.kind {
            CommandKind::Keystroke {
                keys,
                leading_space,
            } => {
                let steps = keys
                    .iter()
                    .map(|spec| KeystrokeStep::parse(spec))
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e| {
                        Error::Config(format!("command '{}': {}", definition.name, e))
                    })?;
                Command::Keystroke {
                    steps,
                    leading_space: *leading_space,
                }
            }
            CommandKind::Type { content } => Command::Type {
                content: content.clone(),
            },
            CommandKind::Case { case, in_place } => {
                if *in_place {
                    return Err(Error::Unsupported(format!(
                        "command '{}': in-place case formatting",
                        definition.name
                    )));
                }
                Command::Case { style: *case }
            }
            CommandKind::Find {
                direction,
                find_hotkey,
            } => Command::Find {
                direction: *direction,
                hotkey: Hotkey::parse(find_hotkey).map_err(|e| {
                    Error::Config(format!("command '{}': {}", definition.name, e))
                })?,
            },
            CommandKind::Chain { commands } => {
                if commands.is_empty() || commands.iter().any(|c| c.trim().is_empty()) {
                    return Err(Error::Config(format!(
                        "command '{}': chain with an empty target",
                        definition.name
                    )));
                }
                Command::Chain {
                    commands: commands.clone(),
                }
            }
            CommandKind::UndoUtterance => Command::UndoUtterance,
        };
        Ok(command)
    }

    /// Execute once, returning the action that records what happened.
    ///
    /// `args` is the spoken argument text after the command name; only case
    /// and find commands accept one.
    pub fn execute(&self, args: Option<&str>, cx: &mut ExecContext) -> Result<Action> {
        match self {
            Command::Keystroke {
                steps,
                leading_space,
            } => {
                Self::reject_args("keystroke", args)?;
                self.execute_keystrokes(steps, *leading_space, cx)
            }
            Command::Type { content } => {
                Self::reject_args("type", args)?;
                let text = Self::with_embedding_space(content, cx.state);
                debug!(text = %text, "typing literal");
                cx.keys.type_text(&text)?;
                Ok(Action::TypedText(text))
            }
            Command::Case { style } => {
                let args = Self::require_args("case", args)?;
                let formatted = format_case(args, *style);
                let text = Self::with_embedding_space(&formatted, cx.state);
                debug!(text = %text, "typing reformatted");
                cx.keys.type_text(&text)?;
                Ok(Action::TypedText(text))
            }
            Command::Find { direction, hotkey } => {
                let args = Self::require_args("find", args)?;
                self.execute_find(args, *direction, hotkey, cx)
            }
            Command::Chain { commands } => {
                Self::reject_args("chain", args)?;
                let mut actions = Vec::with_capacity(commands.len());
                for name in commands {
                    let command = cx.registry.get(name)?;
                    actions.push(command.execute(None, cx)?);
                    // Only the first link can sit right after dictation text
                    cx.state.embedded_command = false;
                }
                Ok(Action::Composite(actions))
            }
            Command::UndoUtterance => {
                Self::reject_args("undo", args)?;
                // Keep popping past cursor-only utterances until something
                // visible was actually reversed
                while !cx.history.undo_utterance(&mut *cx.keys)? {}
                Ok(Action::UndoPerformed)
            }
        }
    }

    fn execute_keystrokes(
        &self,
        steps: &[KeystrokeStep],
        leading_space: bool,
        cx: &mut ExecContext,
    ) -> Result<Action> {
        if leading_space && cx.state.embedded_command {
            cx.keys.type_text(" ")?;
        }
        for step in steps {
            match step {
                KeystrokeStep::Delay(duration) => thread::sleep(*duration),
                KeystrokeStep::Chord(hotkey) => {
                    debug!(key = %hotkey.key, modifiers = ?hotkey.modifiers, "sending hotkey");
                    hotkey.tap(cx.keys)?;
                }
            }
        }
        Ok(Action::Keystrokes)
    }

    fn execute_find(
        &self,
        args: &str,
        direction: FindDirection,
        hotkey: &Hotkey,
        cx: &mut ExecContext,
    ) -> Result<Action> {
        // "<search text> pipe <count>" jumps past <count> earlier matches
        let parts: Vec<&str> = args.split(FIND_ARGS_SEPARATOR).collect();
        let (content, tab_count) = match parts.as_slice() {
            [content] => (*content, 0),
            [content, multiplier_text] => {
                let tokens: Vec<&str> = multiplier_text.split_whitespace().collect();
                let (count, _) = multiplier::parse(&tokens);
                (*content, count)
            }
            _ => {
                return Err(Error::BadArgs(format!(
                    "find arguments '{}' contain more than one '{}'",
                    args,
                    FIND_ARGS_SEPARATOR.trim()
                )));
            }
        };

        debug!(content = %content, tab_count, ?direction, "find");

        hotkey.tap(cx.keys)?;
        cx.keys.type_text(content)?;
        for _ in 0..tab_count {
            cx.keys.tap("tab")?;
        }
        cx.keys.tap("enter")?;
        Ok(Action::FindMotion)
    }

    fn with_embedding_space(text: &str, state: &ExecutionState) -> String {
        if state.embedded_command {
            format!(" {}", text)
        } else {
            text.to_string()
        }
    }

    fn reject_args(kind: &str, args: Option<&str>) -> Result<()> {
        match args {
            None => Ok(()),
            Some(args) => Err(Error::BadArgs(format!(
                "{} command takes no arguments, got '{}'",
                kind, args
            ))),
        }
    }

    fn require_args<'t>(kind: &str, args: Option<&'t str>) -> Result<&'t str> {
        args.ok_or_else(|| Error::BadArgs(format!("{} command needs argument text", kind)))
    }
}

/// Uppercase the first letter and lowercase the rest
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Reformat whitespace-separated words in the given case style
pub fn format_case(text: &str, style: CaseStyle) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match style {
        CaseStyle::Upper => tokens
            .iter()
            .map(|t| t.to_uppercase())
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::Lower => tokens
            .iter()
            .map(|t| t.to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::Title => tokens
            .iter()
            .map(|t| capitalize(t))
            .collect::<Vec<_>>()
            .join(" "),
        CaseStyle::Pascal => tokens.iter().map(|t| capitalize(t)).collect(),
        CaseStyle::Snake => tokens.join("_"),
        CaseStyle::ScreamingSnake => tokens
            .iter()
            .map(|t| t.to_uppercase())
            .collect::<Vec<_>>()
            .join("_"),
        CaseStyle::Camel => match tokens.split_first() {
            None => String::new(),
            Some((first, rest)) => {
                let mut out = first.to_lowercase();
                for token in rest {
                    out.push_str(&capitalize(token));
                }
                out
            }
        },
        CaseStyle::Acronym => tokens
            .iter()
            .filter_map(|t| t.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect(),
        CaseStyle::LowerLetters => tokens.concat().to_lowercase(),
        CaseStyle::UpperLetters => tokens.concat().to_uppercase(),
        CaseStyle::NameLetters => capitalize(&tokens.concat()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{KeyEvent, Recorder};

    fn context<'a>(
        registry: &'a CommandRegistry,
        history: &'a mut ActionHistory,
        state: &'a mut ExecutionState,
        keys: &'a mut Recorder,
    ) -> ExecContext<'a> {
        ExecContext {
            registry,
            history,
            state,
            keys,
        }
    }

    #[test]
    fn test_format_case_table() {
        let text = "slim shady foo";
        assert_eq!(format_case(text, CaseStyle::Upper), "SLIM SHADY FOO");
        assert_eq!(format_case(text, CaseStyle::Lower), "slim shady foo");
        assert_eq!(format_case(text, CaseStyle::Title), "Slim Shady Foo");
        assert_eq!(format_case(text, CaseStyle::Pascal), "SlimShadyFoo");
        assert_eq!(format_case(text, CaseStyle::Snake), "slim_shady_foo");
        assert_eq!(
            format_case(text, CaseStyle::ScreamingSnake),
            "SLIM_SHADY_FOO"
        );
        assert_eq!(format_case(text, CaseStyle::Camel), "slimShadyFoo");
        assert_eq!(format_case(text, CaseStyle::Acronym), "SSF");
    }

    #[test]
    fn test_format_case_letter_styles() {
        let text = "a b c";
        assert_eq!(format_case(text, CaseStyle::LowerLetters), "abc");
        assert_eq!(format_case(text, CaseStyle::UpperLetters), "ABC");
        assert_eq!(format_case(text, CaseStyle::NameLetters), "Abc");
    }

    #[test]
    fn test_format_case_upper_is_idempotent() {
        let once = format_case("slim shady foo", CaseStyle::Upper);
        let twice = format_case(&once, CaseStyle::Upper);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_case_empty_text() {
        for style in [
            CaseStyle::Upper,
            CaseStyle::Camel,
            CaseStyle::Acronym,
            CaseStyle::NameLetters,
        ] {
            assert_eq!(format_case("", style), "");
        }
    }

    #[test]
    fn test_hotkey_parse() {
        let hotkey = Hotkey::parse("ctrl+alt+a").unwrap();
        assert_eq!(hotkey.modifiers, vec!["ctrl", "alt"]);
        assert_eq!(hotkey.key, "a");

        let plain = Hotkey::parse("enter").unwrap();
        assert!(plain.modifiers.is_empty());
        assert_eq!(plain.key, "enter");

        assert!(Hotkey::parse("ctrl++a").is_err());
        assert!(Hotkey::parse("").is_err());
    }

    #[test]
    fn test_keystroke_step_parse() {
        assert!(matches!(
            KeystrokeStep::parse("delay 0.25"),
            Ok(KeystrokeStep::Delay(d)) if d == Duration::from_millis(250)
        ));
        assert!(KeystrokeStep::parse("delay").is_err());
        assert!(KeystrokeStep::parse("delay abc").is_err());
        assert!(KeystrokeStep::parse("delay -1").is_err());
        assert!(matches!(
            KeystrokeStep::parse("ctrl+c"),
            Ok(KeystrokeStep::Chord(_))
        ));
    }

    #[test]
    fn test_empty_chain_is_rejected_at_build() {
        for commands in [vec![], vec!["".to_string()]] {
            let definition = CommandDefinition {
                name: "combo".to_string(),
                aliases: vec![],
                kind: CommandKind::Chain { commands },
            };
            assert!(matches!(
                Command::from_definition(&definition),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn test_in_place_case_is_rejected_at_build() {
        let definition = CommandDefinition {
            name: "upper case".to_string(),
            aliases: vec![],
            kind: CommandKind::Case {
                case: CaseStyle::Upper,
                in_place: true,
            },
        };
        assert!(matches!(
            Command::from_definition(&definition),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_keystroke_executes_chords_in_sequence() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Keystroke {
            steps: vec![
                KeystrokeStep::Chord(Hotkey::parse("ctrl+c").unwrap()),
                KeystrokeStep::Chord(Hotkey::parse("enter").unwrap()),
            ],
            leading_space: false,
        };
        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            command.execute(None, &mut cx).unwrap()
        };
        assert_eq!(action, Action::Keystrokes);
        assert_eq!(
            keys.events(),
            vec![
                KeyEvent::Press("ctrl".into()),
                KeyEvent::Tap("c".into()),
                KeyEvent::Release("ctrl".into()),
                KeyEvent::Tap("enter".into()),
            ]
        );
    }

    #[test]
    fn test_keystroke_leading_space_when_embedded() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState {
            embedded_command: true,
        };
        let mut keys = Recorder::new();

        let command = Command::Keystroke {
            steps: vec![KeystrokeStep::Chord(Hotkey::parse("enter").unwrap())],
            leading_space: true,
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        command.execute(None, &mut cx).unwrap();
        assert_eq!(
            keys.events(),
            vec![KeyEvent::Text(" ".into()), KeyEvent::Tap("enter".into())]
        );
    }

    #[test]
    fn test_keystroke_rejects_args() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Keystroke {
            steps: vec![],
            leading_space: false,
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            command.execute(Some("extra"), &mut cx),
            Err(Error::BadArgs(_))
        ));
    }

    #[test]
    fn test_type_prefixes_space_when_embedded() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState {
            embedded_command: true,
        };
        let mut keys = Recorder::new();

        let command = Command::Type {
            content: "-".to_string(),
        };
        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            command.execute(None, &mut cx).unwrap()
        };
        assert_eq!(action, Action::TypedText(" -".to_string()));
        assert_eq!(keys.screen(), " -");
    }

    #[test]
    fn test_case_requires_args() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Case {
            style: CaseStyle::Snake,
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            command.execute(None, &mut cx),
            Err(Error::BadArgs(_))
        ));
    }

    #[test]
    fn test_case_types_formatted_text() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Case {
            style: CaseStyle::Camel,
        };
        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            command.execute(Some("slim shady foo"), &mut cx).unwrap()
        };
        assert_eq!(action, Action::TypedText("slimShadyFoo".to_string()));
        assert_eq!(keys.screen(), "slimShadyFoo");
    }

    #[test]
    fn test_find_types_search_and_tabs() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Find {
            direction: FindDirection::Down,
            hotkey: Hotkey::parse("ctrl+f").unwrap(),
        };
        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            command
                .execute(Some("needle pipe two times"), &mut cx)
                .unwrap()
        };
        assert_eq!(action, Action::FindMotion);
        assert_eq!(
            keys.events(),
            vec![
                KeyEvent::Press("ctrl".into()),
                KeyEvent::Tap("f".into()),
                KeyEvent::Release("ctrl".into()),
                KeyEvent::Text("needle".into()),
                KeyEvent::Tap("tab".into()),
                KeyEvent::Tap("tab".into()),
                KeyEvent::Tap("enter".into()),
            ]
        );
    }

    #[test]
    fn test_find_without_pipe_takes_whole_args_as_content() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Find {
            direction: FindDirection::Up,
            hotkey: Hotkey::parse("ctrl+f").unwrap(),
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        command.execute(Some("needle in haystack"), &mut cx).unwrap();
        let tabs = keys
            .events()
            .iter()
            .filter(|e| **e == KeyEvent::Tap("tab".into()))
            .count();
        assert_eq!(tabs, 0);
    }

    #[test]
    fn test_find_rejects_repeated_pipe() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Find {
            direction: FindDirection::Down,
            hotkey: Hotkey::parse("ctrl+f").unwrap(),
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            command.execute(Some("a pipe b pipe c"), &mut cx),
            Err(Error::BadArgs(_))
        ));
    }

    #[test]
    fn test_chain_runs_links_and_clears_embedding() {
        use crate::config::CommandDefinition;

        let definitions = vec![
            CommandDefinition {
                name: "dash".to_string(),
                aliases: vec![],
                kind: CommandKind::Type {
                    content: "-".to_string(),
                },
            },
            CommandDefinition {
                name: "dot".to_string(),
                aliases: vec![],
                kind: CommandKind::Type {
                    content: ".".to_string(),
                },
            },
        ];
        let registry = CommandRegistry::from_definitions(&definitions).unwrap();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState {
            embedded_command: true,
        };
        let mut keys = Recorder::new();

        let command = Command::Chain {
            commands: vec!["dash".to_string(), "dot".to_string()],
        };
        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            command.execute(None, &mut cx).unwrap()
        };
        // First link gets the embedding space; second does not
        assert_eq!(keys.screen(), " -.");
        assert_eq!(
            action,
            Action::Composite(vec![
                Action::TypedText(" -".to_string()),
                Action::TypedText(".".to_string()),
            ])
        );
        assert!(!state.embedded_command);
    }

    #[test]
    fn test_chain_unknown_link_fails() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let command = Command::Chain {
            commands: vec!["ghost".to_string()],
        };
        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            command.execute(None, &mut cx),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_undo_pops_past_insubstantial_utterances() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        history.add_utterance(vec![Action::TypedText("abc".to_string())]);
        history.add_utterance(vec![Action::Keystrokes]);
        history.add_utterance(vec![Action::FindMotion]);
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let action = {
            let mut cx = context(&registry, &mut history, &mut state, &mut keys);
            Command::UndoUtterance.execute(None, &mut cx).unwrap()
        };
        assert_eq!(action, Action::UndoPerformed);
        assert!(history.is_empty());
        let backspaces = keys
            .events()
            .iter()
            .filter(|e| **e == KeyEvent::Tap("backspace".into()))
            .count();
        assert_eq!(backspaces, 3);
    }

    #[test]
    fn test_undo_on_empty_history_errors() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            Command::UndoUtterance.execute(None, &mut cx),
            Err(Error::HistoryEmpty)
        ));
    }

    #[test]
    fn test_undo_errors_when_only_insubstantial_history_remains() {
        let registry = CommandRegistry::default();
        let mut history = ActionHistory::new();
        history.add_utterance(vec![Action::FindMotion]);
        let mut state = ExecutionState::default();
        let mut keys = Recorder::new();

        let mut cx = context(&registry, &mut history, &mut state, &mut keys);
        assert!(matches!(
            Command::UndoUtterance.execute(None, &mut cx),
            Err(Error::HistoryEmpty)
        ));
        assert!(history.is_empty());
    }
}
