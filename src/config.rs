use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Word that switches between dictation and command mode
    #[serde(default = "default_escape_word")]
    pub escape_word: String,
    /// Phrase that discards the whole utterance when present anywhere in it
    #[serde(default = "default_stop_phrase")]
    pub stop_phrase: String,
    /// Pause after each mid-utterance command, giving the target application
    /// time to settle before further typing
    #[serde(default = "default_inter_command_pause")]
    pub inter_command_pause_ms: u64,
    /// Dictation word that glues the next word onto the previous one in camelCase
    #[serde(default = "default_camel_trigger")]
    pub camel_trigger: String,
    /// How text is typed: "direct" or "clipboard"
    #[serde(default = "default_input_method")]
    pub input_method: String,
    #[serde(default = "default_commands")]
    pub commands: Vec<CommandDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escape_word: default_escape_word(),
            stop_phrase: default_stop_phrase(),
            inter_command_pause_ms: default_inter_command_pause(),
            camel_trigger: default_camel_trigger(),
            input_method: default_input_method(),
            commands: default_commands(),
        }
    }
}

impl Config {
    /// Load from a TOML file, or fall back to defaults when the file is absent.
    ///
    /// An unreadable or malformed file is an error; a command set that is
    /// silently wrong is worse than a refusal to start.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}

fn default_escape_word() -> String {
    "dog".into()
}
fn default_stop_phrase() -> String {
    "stop stop".into()
}
fn default_inter_command_pause() -> u64 {
    500
}
fn default_camel_trigger() -> String {
    "chimney".into()
}
fn default_input_method() -> String {
    "direct".into()
}

// ============================================================================
// Command Definitions
// ============================================================================

/// One named voice command: the spoken name (plus aliases) and what it does
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDefinition {
    /// Spoken name, at most three words
    pub name: String,
    /// Alternate spoken names, each at most three words
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl CommandDefinition {
    /// All spoken names for this command, primary name first
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }
}

/// What a command does, selected by `command_type` with details in `kwargs`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command_type", content = "kwargs")]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Send a sequence of hotkeys, e.g. ["ctrl+c", "delay 0.25", "alt+v"]
    Keystroke {
        keys: Vec<String>,
        /// Type a space first when the command follows dictation text
        #[serde(default)]
        leading_space: bool,
    },
    /// Type a fixed string verbatim
    Type { content: String },
    /// Reformat the spoken argument text in a given case and type it
    Case {
        case: CaseStyle,
        /// Apply to the current selection instead of typing (not implemented)
        #[serde(default)]
        in_place: bool,
    },
    /// Open the editor's find dialog and search for the spoken argument
    Find {
        direction: FindDirection,
        #[serde(default = "default_find_hotkey")]
        find_hotkey: String,
    },
    /// Run several named commands in order
    Chain { commands: Vec<String> },
    /// Undo the most recent utterance that did something visible
    UndoUtterance,
}

fn default_find_hotkey() -> String {
    "ctrl+f".into()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    /// SLIM SHADY FOO
    Upper,
    /// slim shady foo
    Lower,
    /// Slim Shady Foo
    Title,
    /// SlimShadyFoo
    Pascal,
    /// slim_shady_foo
    Snake,
    /// SLIM_SHADY_FOO
    #[serde(rename = "screaming snake")]
    ScreamingSnake,
    /// slimShadyFoo
    Camel,
    /// SSF
    Acronym,
    /// Concatenate spelled-out letters: "a b c" -> "abc"
    #[serde(rename = "lower letters")]
    LowerLetters,
    /// "a b c" -> "ABC"
    #[serde(rename = "upper letters")]
    UpperLetters,
    /// "a b c" -> "Abc"
    #[serde(rename = "name letters")]
    NameLetters,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FindDirection {
    Down,
    Up,
}

/// Built-in command set used when no config file provides one
fn default_commands() -> Vec<CommandDefinition> {
    fn def(name: &str, aliases: &[&str], kind: CommandKind) -> CommandDefinition {
        CommandDefinition {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            kind,
        }
    }
    fn keystroke(keys: &[&str]) -> CommandKind {
        CommandKind::Keystroke {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            leading_space: false,
        }
    }
    fn case(style: CaseStyle) -> CommandKind {
        CommandKind::Case {
            case: style,
            in_place: false,
        }
    }

    vec![
        def("slap", &["new line"], keystroke(&["enter"])),
        def("new paragraph", &[], CommandKind::Chain {
            commands: vec!["slap".to_string(), "slap".to_string()],
        }),
        def("tab key", &[], keystroke(&["tab"])),
        def("arrow up", &[], keystroke(&["up"])),
        def("arrow down", &[], keystroke(&["down"])),
        def("arrow left", &[], keystroke(&["left"])),
        def("arrow right", &[], keystroke(&["right"])),
        def("copy that", &[], keystroke(&["ctrl+c"])),
        def("paste that", &[], keystroke(&["ctrl+v"])),
        def("save file", &[], keystroke(&["ctrl+s"])),
        def("dash", &[], CommandKind::Type {
            content: "-".to_string(),
        }),
        def("underscore", &[], CommandKind::Type {
            content: "_".to_string(),
        }),
        def("upper case", &[], case(CaseStyle::Upper)),
        def("lower case", &[], case(CaseStyle::Lower)),
        def("title case", &[], case(CaseStyle::Title)),
        def("pascal case", &[], case(CaseStyle::Pascal)),
        def("snake case", &[], case(CaseStyle::Snake)),
        def("screaming snake case", &[], case(CaseStyle::ScreamingSnake)),
        def("camel case", &[], case(CaseStyle::Camel)),
        def("acronym case", &[], case(CaseStyle::Acronym)),
        def("spell lower", &[], case(CaseStyle::LowerLetters)),
        def("spell upper", &[], case(CaseStyle::UpperLetters)),
        def("spell name", &[], case(CaseStyle::NameLetters)),
        def("find down", &[], CommandKind::Find {
            direction: FindDirection::Down,
            find_hotkey: default_find_hotkey(),
        }),
        def("find up", &[], CommandKind::Find {
            direction: FindDirection::Up,
            find_hotkey: default_find_hotkey(),
        }),
        def("scratch that", &["undo that"], CommandKind::UndoUtterance),
    ]
}
