//! Repeat-count parsing for spoken commands
//!
//! A command segment may open with a quantity ("3 times slap", "double tab").
//! The numeral is either a digit string or a number word (with the homophones
//! speech recognition substitutes for them), optionally followed by a cosmetic
//! postfix word that does not change the value.

/// Spoken number words, including the homophones the recognizer produces
const NUMBER_WORDS: &[(&str, usize)] = &[
    ("to", 2),
    ("two", 2),
    ("too", 2),
    ("double", 2),
    ("three", 3),
    ("triple", 3),
    ("for", 4),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Optional words allowed after the numeral ("3 times", "2 x")
const POSTFIX_WORDS: &[&str] = &["times", "x", "*"];

fn number_word(token: &str) -> Option<usize> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, value)| value)
}

/// Parse a leading multiplier from a token run.
///
/// Returns `(multiplier, tokens_consumed)`. When the first token is neither a
/// digit string nor a number word, the multiplier is implicitly 1 and nothing
/// is consumed. A postfix word is only consumed after a recognized numeral.
pub fn parse(tokens: &[&str]) -> (usize, usize) {
    let Some(first) = tokens.first() else {
        return (1, 0);
    };

    let value = match first.parse::<usize>() {
        Ok(n) => n,
        Err(_) => match number_word(first) {
            Some(n) => n,
            None => return (1, 0),
        },
    };

    let mut consumed = 1;
    if let Some(second) = tokens.get(1) {
        if POSTFIX_WORDS.contains(second) {
            consumed = 2;
        }
    }

    (value, consumed)
}

/// True if this token could be consumed by [`parse`] as numeral or postfix.
///
/// The registry rejects command names starting with such a token, otherwise
/// "for each" would parse as four repetitions of a command named "each".
pub fn is_multiplier_token(token: &str) -> bool {
    token.parse::<usize>().is_ok() || number_word(token).is_some() || POSTFIX_WORDS.contains(&token)
}
