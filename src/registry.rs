//! Command registry and token-tree name recognition
//!
//! Command names are one to three spoken words and may share prefixes
//! ("do my homework" / "do his makeup"). The registry indexes every name and
//! alias in a token tree so the dispatcher can recognize a name word by word,
//! asking at each step which words could legally come next.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::commands::Command;
use crate::config::CommandDefinition;
use crate::error::{Error, Result};
use crate::multiplier;

/// Longest allowed command name, in words
pub const MAX_NAME_WORDS: usize = 3;

#[derive(Debug, Default)]
struct TokenNode {
    children: BTreeMap<String, TokenNode>,
    terminal: bool,
}

impl TokenNode {
    fn insert(&mut self, words: &[&str]) {
        match words.split_first() {
            None => self.terminal = true,
            Some((first, rest)) => {
                self.children
                    .entry(first.to_string())
                    .or_default()
                    .insert(rest);
            }
        }
    }

    fn walk(&self, prefix: &[&str]) -> Option<&TokenNode> {
        match prefix.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children.get(*first)?.walk(rest),
        }
    }
}

/// All known commands, indexed by full name and by name-word prefix
#[derive(Debug, Default)]
pub struct CommandRegistry {
    root: TokenNode,
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    /// Build a registry from command definitions.
    ///
    /// Fails on a malformed definition, a name longer than three words, a
    /// duplicate name, or a name whose first word reads as a multiplier
    /// (which would make "3 slap" ambiguous).
    pub fn from_definitions(definitions: &[CommandDefinition]) -> Result<Self> {
        let mut registry = CommandRegistry::default();
        for definition in definitions {
            let command = Arc::new(Command::from_definition(definition)?);
            for name in definition.all_names() {
                registry.insert(name, Arc::clone(&command))?;
            }
        }
        Ok(registry)
    }

    fn insert(&mut self, name: &str, command: Arc<Command>) -> Result<()> {
        let words: Vec<&str> = name.split_whitespace().collect();
        if words.is_empty() {
            return Err(Error::Config("command with an empty name".into()));
        }
        if words.len() > MAX_NAME_WORDS {
            return Err(Error::Config(format!(
                "command name '{}' is longer than {} words",
                name, MAX_NAME_WORDS
            )));
        }
        if multiplier::is_multiplier_token(words[0]) {
            return Err(Error::Config(format!(
                "command name '{}' starts with a multiplier word",
                name
            )));
        }
        let full_name = words.join(" ");
        if self.commands.contains_key(&full_name) {
            return Err(Error::Config(format!("duplicate command name '{}'", full_name)));
        }
        self.root.insert(&words);
        self.commands.insert(full_name, command);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Names of all registered commands and aliases, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(|n| n.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Words that could legally follow `prefix` in a command name.
    ///
    /// An empty prefix yields every first word. A prefix that is not a path
    /// in the tree is an error, as is querying an empty registry.
    pub fn next_tokens(&self, prefix: &[&str]) -> Result<Vec<String>> {
        if self.commands.is_empty() {
            return Err(Error::Config("no commands loaded".into()));
        }
        let node = self
            .root
            .walk(prefix)
            .ok_or_else(|| Error::Parse(format!("unknown command prefix '{}'", prefix.join(" "))))?;
        Ok(node.children.keys().cloned().collect())
    }

    /// Look up a command by its full name or alias
    pub fn get(&self, name: &str) -> Result<Arc<Command>> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Parse(format!("unknown command '{}'", name)))
    }
}
