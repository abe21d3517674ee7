//! Command-segment parsing and dispatch
//!
//! A command segment is parsed in three stages: an optional leading
//! multiplier ("3 times", "double"), then the command name recognized word by
//! word against the registry's token tree, then whatever remains as argument
//! text. `", "` chains several independent commands inside one segment.

use tracing::debug;

use crate::commands::ExecContext;
use crate::error::{Error, Result};
use crate::history::Action;
use crate::multiplier;
use crate::registry::MAX_NAME_WORDS;

/// Delimiter between chained commands within one segment
const COMMAND_DELIMITER: &str = ", ";

#[derive(Debug, PartialEq)]
struct ParsedCommand {
    name: String,
    multiplier: usize,
    args: Option<String>,
}

/// Parse one command text into name, repeat count, and argument text.
///
/// The first word that matches no known command start is a hard error; a
/// word that merely fails to extend a non-empty name ends the name and
/// starts the arguments.
fn parse(cx: &ExecContext, text: &str) -> Result<ParsedCommand> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(Error::Parse("empty command segment".into()));
    }

    let (multiplier, consumed) = multiplier::parse(&tokens);
    let tokens = &tokens[consumed..];

    let mut prefix: Vec<&str> = Vec::new();
    let mut index = 0;
    while index < tokens.len() && prefix.len() < MAX_NAME_WORDS {
        let candidates = cx.registry.next_tokens(&prefix)?;
        let token = tokens[index];
        if candidates.iter().any(|c| c == token) {
            prefix.push(token);
            index += 1;
        } else {
            break;
        }
    }

    if prefix.is_empty() {
        return Err(Error::Parse(format!(
            "no known command starts with '{}'",
            tokens.first().copied().unwrap_or_default()
        )));
    }

    let name = prefix.join(" ");
    // A partial name like "do" for "do my homework" is not a command
    cx.registry.get(&name)?;

    let args = if index < tokens.len() {
        Some(tokens[index..].join(" "))
    } else {
        None
    };

    Ok(ParsedCommand {
        name,
        multiplier,
        args,
    })
}

/// Execute one command segment, appending every produced action to `actions`.
///
/// Actions are appended as they happen, so the effects of earlier chained
/// commands stay on record even when a later one fails.
pub fn dispatch(text: &str, actions: &mut Vec<Action>, cx: &mut ExecContext) -> Result<()> {
    for (index, sub_text) in text.split(COMMAND_DELIMITER).enumerate() {
        if index > 0 {
            // Only the first chained command can follow dictation text
            cx.state.embedded_command = false;
        }
        dispatch_one(sub_text, actions, cx)?;
    }
    Ok(())
}

fn dispatch_one(text: &str, actions: &mut Vec<Action>, cx: &mut ExecContext) -> Result<()> {
    let parsed = parse(cx, text)?;
    debug!(
        command = %parsed.name,
        multiplier = parsed.multiplier,
        args = ?parsed.args,
        "dispatching"
    );

    let command = cx.registry.get(&parsed.name)?;
    for _ in 0..parsed.multiplier {
        actions.push(command.execute(parsed.args.as_deref(), cx)?);
    }
    Ok(())
}
