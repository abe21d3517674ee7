//! Long-form dictation text formatting
//!
//! Speech recognition hands back flat lowercase words. This module turns them
//! into naturally typed text: spacing between utterances, capitalization
//! after sentence ends, spoken trigger words ("capital", "allcaps", the camel
//! trigger), letter-run compression for spelled-out acronyms, fixed spoken
//! replacements, and a pass that tightens the spaces dictation leaves around
//! quotes, backticks, and parentheses.
//!
//! The formatter is stateful across calls: whether the previous utterance
//! ended a sentence decides how the next one starts.

use std::collections::HashSet;

use tracing::debug;

/// Characters that end a sentence and capitalize whatever follows
const END_OF_SENTENCE_CHARS: [char; 3] = ['?', '.', '!'];

/// Literal substring replacements, applied in order after spacing is settled
const REPLACE_PATTERNS: &[(&str, &str)] = &[
    ("i've", "I've"),
    ("i'll", "I'll"),
    ("i'm", "I'm"),
    ("i'd", "I'd"),
    ("quote", "\""),
    ("backslider", "`"),
];

/// Stateful formatter for plaintext long-form output
pub struct PlainTextFormatter {
    /// Did the previous utterance end with sentence punctuation?
    saw_end_of_sentence: bool,
    /// Spoken word that glues the next word onto the previous in camelCase
    camel_trigger: String,
    remove_space_before_open_paren: bool,
    remove_space_after_close_paren: bool,
}

impl PlainTextFormatter {
    pub fn new(camel_trigger: &str) -> Self {
        Self {
            saw_end_of_sentence: false,
            camel_trigger: camel_trigger.to_string(),
            remove_space_before_open_paren: true,
            remove_space_after_close_paren: true,
        }
    }

    /// Format one dictation segment.
    ///
    /// `saw_user_action` reports a key press or mouse click since the last
    /// call (the user moved the caret, so no separating space and no carried
    /// sentence state). `force_capitalize` is an explicit sentence-boundary
    /// signal from outside.
    pub fn format(&mut self, raw: &str, saw_user_action: bool, force_capitalize: bool) -> String {
        let mut text = raw.to_lowercase().trim().to_string();
        debug!(text = %text, saw_user_action, force_capitalize, "formatting");

        if saw_user_action {
            self.saw_end_of_sentence = false;
        }

        // Sentence state for the next call comes from the raw tail, before
        // any trigger words or replacements touch the text
        let last_char = text.chars().last();

        let mut explicit_space_add = false;
        if let Some(rest) = text.strip_prefix("space bar ") {
            text = rest.to_string();
            explicit_space_add = true;
        }
        if let Some(rest) = text.strip_prefix("spacebar ") {
            text = rest.to_string();
            explicit_space_add = true;
        }

        // Recognizer false-positives, normalized before token work
        let text = text.replace("a.m.", "a m").replace("all caps", "allcaps");

        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let tokens = compress_letter_runs(tokens);
        let tokens = apply_capitalization_triggers(tokens);
        let (tokens, glue_to_previous) = self.apply_camel_trigger(tokens);

        let mut text = tokens.join(" ");

        if self.saw_end_of_sentence || force_capitalize {
            text = capitalize_first(&text);
        }

        // Continuing dictation needs a separating space; text typed right
        // after a manual caret placement does not
        let needs_space = (!saw_user_action && text.chars().count() > 1) || explicit_space_add;
        if needs_space && !glue_to_previous {
            text.insert(0, ' ');
        }

        self.saw_end_of_sentence = last_char.is_some_and(|c| END_OF_SENTENCE_CHARS.contains(&c));

        let text = replace_fixed_patterns(&text);
        let text = self.fix_closures(&text);
        debug!(text = %text, "formatted");
        text
    }

    /// Camel trigger: the word after the trigger is capitalized and joined
    /// onto the previous word with no separator. A trigger with nothing
    /// before it glues onto the previous utterance instead, reported by the
    /// returned flag so the caller suppresses the leading space.
    fn apply_camel_trigger(&self, tokens: Vec<String>) -> (Vec<String>, bool) {
        let mut out: Vec<String> = Vec::with_capacity(tokens.len());
        let mut glue_to_previous = false;
        let mut iter = tokens.into_iter();
        while let Some(token) = iter.next() {
            if token == self.camel_trigger {
                if out.is_empty() {
                    glue_to_previous = true;
                }
                if let Some(next) = iter.next() {
                    let capped = capitalize_first(&next);
                    match out.last_mut() {
                        Some(previous) => previous.push_str(&capped),
                        None => out.push(capped),
                    }
                }
            } else {
                out.push(token);
            }
        }
        (out, glue_to_previous)
    }

    /// Remove the spurious spaces dictation inserts around paired delimiters.
    ///
    /// Backtick, double quote, and single quote each toggle between opening
    /// and closing; an opener drops the space after it, a closer the space
    /// before it. Parentheses drop their inside space always and their
    /// outside space per configuration. Only a space at a marked position is
    /// dropped; any other character there survives.
    pub fn fix_closures(&self, text: &str) -> String {
        let mut backtick_open = true;
        let mut double_quote_open = true;
        let mut single_quote_open = true;

        fn mark_before(marked: &mut HashSet<usize>, i: usize) {
            if i > 0 {
                marked.insert(i - 1);
            }
        }

        let chars: Vec<char> = text.chars().collect();
        let mut marked: HashSet<usize> = HashSet::new();

        for (i, c) in chars.iter().enumerate() {
            match c {
                '`' => {
                    if backtick_open {
                        marked.insert(i + 1);
                    } else {
                        mark_before(&mut marked, i);
                    }
                    backtick_open = !backtick_open;
                }
                '"' => {
                    if double_quote_open {
                        marked.insert(i + 1);
                    } else {
                        mark_before(&mut marked, i);
                    }
                    double_quote_open = !double_quote_open;
                }
                '\'' => {
                    if single_quote_open {
                        marked.insert(i + 1);
                    } else {
                        mark_before(&mut marked, i);
                    }
                    single_quote_open = !single_quote_open;
                }
                '(' => {
                    if self.remove_space_before_open_paren {
                        mark_before(&mut marked, i);
                    }
                    marked.insert(i + 1);
                }
                ')' => {
                    mark_before(&mut marked, i);
                    if self.remove_space_after_close_paren {
                        marked.insert(i + 1);
                    }
                }
                _ => {}
            }
        }

        chars
            .iter()
            .enumerate()
            .filter(|(i, c)| !marked.contains(i) || **c != ' ')
            .map(|(_, c)| *c)
            .collect()
    }
}

/// Join runs of two or more consecutive single-character alphanumeric tokens,
/// so letters spelled out one by one come through as one word
fn compress_letter_runs(tokens: Vec<String>) -> Vec<String> {
    fn flush(out: &mut Vec<String>, run: &mut Vec<String>) {
        match run.len() {
            0 => {}
            1 => out.push(run.pop().unwrap_or_default()),
            _ => out.push(run.concat()),
        }
        run.clear();
    }

    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut run: Vec<String> = Vec::new();
    for token in tokens {
        let mut chars = token.chars();
        let single_alnum = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.is_alphanumeric()
        );
        if single_alnum {
            run.push(token);
        } else {
            flush(&mut out, &mut run);
            out.push(token);
        }
    }
    flush(&mut out, &mut run);
    out
}

/// "capital"/"capitol" capitalizes the next word; "allcaps" uppercases it.
/// Trigger words themselves are consumed.
fn apply_capitalization_triggers(tokens: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "capital" | "capitol" => {
                if let Some(next) = iter.next() {
                    out.push(capitalize_first(&next));
                }
            }
            "allcaps" => {
                if let Some(next) = iter.next() {
                    out.push(next.to_uppercase());
                }
            }
            _ => out.push(token),
        }
    }
    out
}

/// Uppercase the first character, leaving the rest alone
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn replace_fixed_patterns(text: &str) -> String {
    let mut text = text.to_string();
    for (pattern, replacement) in REPLACE_PATTERNS {
        text = text.replace(pattern, replacement);
    }
    text
}
