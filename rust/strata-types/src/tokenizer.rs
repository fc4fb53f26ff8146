//! Splits a type descriptor string into tokens.

/// A single token of a type descriptor string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset of the first character within the source string.
    pub position: usize,
    /// The token text.
    pub text: &'a str,
    /// Whether the first character is a letter or a digit.
    pub is_alphanumeric: bool,
}

/// Tokenizes a type descriptor string.
///
/// Every maximal run of letters and digits forms one token; any other
/// character forms a token of its own, so punctuation is never merged
/// (`"<<"` yields two tokens). Whitespace is not skipped.
///
/// `tokenize("map<int,string>")` yields `["map", "<", "int", ",", "string", ">"]`.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = s.char_indices().peekable();
    let mut begin = 0;
    while let Some((_, c)) = chars.next() {
        let end = chars.peek().map(|&(i, _)| i).unwrap_or(s.len());
        let boundary = match chars.peek() {
            None => true,
            Some(&(_, next)) => !is_letter_or_digit(c) || !is_letter_or_digit(next),
        };
        if boundary {
            let text = &s[begin..end];
            tokens.push(Token {
                position: begin,
                text,
                is_alphanumeric: text.chars().next().is_some_and(is_letter_or_digit),
            });
            begin = end;
        }
    }
    tokens
}

/// Letters of any script and ASCII digits. Numeric symbols such as `²` or
/// `½` are punctuation.
fn is_letter_or_digit(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit()
}
