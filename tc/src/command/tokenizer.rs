//! Command tokenizer - split a command line into argument tokens
//!
//! One pass over the input. Whitespace separates tokens outside quotes; a `"`
//! or `'` opens a span that only the same character closes. Unlike a shell,
//! a quoted span is always its own token: `foo"bar"` yields `foo` and `bar`.

use tracing::trace;

/// Split `line` into tokens honoring single and double quotes
///
/// Quote markers are dropped. An explicitly quoted empty string yields an
/// empty token. An unterminated quote runs to the end of the input.
pub fn tokenize(line: &str) -> Vec<String> {
    trace!(%line, "tokenize: called");
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => {
                tokens.push(std::mem::take(&mut current));
                quote = None;
            }
            Some(_) => current.push(ch),
            None => match ch {
                '"' | '\'' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    quote = Some(ch);
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(ch),
            },
        }
    }

    if quote.is_some() || !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
