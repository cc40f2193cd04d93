//! Command line tokenization
//!
//! Words are split with [`shlex`], which follows the usual POSIX shell
//! conventions:
//!
//! - spaces, tabs and newlines outside quotes separate words
//! - `'...'` is fully literal, a backslash inside it is an ordinary character
//! - `"..."` keeps whitespace; a backslash escapes only `"`, `\`, `$` and `` ` ``
//! - outside quotes a backslash escapes the next character
//! - adjacent quoted and unquoted pieces join into one word (`a"b c"d` -> `ab cd`)
//! - an empty quoted pair (`""`) yields an empty word
//! - `#` at the start of a word comments out the rest of the line

use std::borrow::Cow;

use shlex::Shlex;

/// Why a line could not be tokenized, or a word could not be quoted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A quote was opened but never closed
    #[error("unterminated {} quote starting at column {column}", quote_name(*quote))]
    UnterminatedQuote { quote: char, column: usize },

    /// The line ends with a backslash that has nothing to escape
    #[error("dangling escape: line ends with a backslash")]
    DanglingEscape,

    /// No quoting can carry a NUL byte through a command line
    #[error("word contains a NUL byte")]
    NulByte,
}

fn quote_name(quote: char) -> &'static str {
    if quote == '\'' {
        "single"
    } else {
        "double"
    }
}

/// Split `line` into words.
///
/// An empty or whitespace-only line yields an empty vector.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut lexer = Shlex::new(line);
    let words: Vec<String> = lexer.by_ref().collect();
    if lexer.had_error {
        return Err(diagnose(line));
    }
    Ok(words)
}

/// Name the reason a line failed to lex.
///
/// Walks the same quoting states as the lexer, stopping at the first
/// construct that never closes.
fn diagnose(line: &str) -> ParseError {
    let mut chars = line.chars().enumerate();
    let mut word_start = true;

    while let Some((column, c)) = chars.next() {
        match c {
            ' ' | '\t' | '\n' => {
                word_start = true;
                continue;
            }
            '#' if word_start => {
                // Comment runs to the end of the physical line
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            '\\' => {
                if chars.next().is_none() {
                    return ParseError::DanglingEscape;
                }
            }
            '\'' => {
                if !chars.by_ref().any(|(_, c)| c == '\'') {
                    return ParseError::UnterminatedQuote {
                        quote: '\'',
                        column: column + 1,
                    };
                }
            }
            '"' => loop {
                match chars.next() {
                    None => {
                        return ParseError::UnterminatedQuote {
                            quote: '"',
                            column: column + 1,
                        }
                    }
                    Some((_, '"')) => break,
                    Some((_, '\\')) => {
                        if chars.next().is_none() {
                            return ParseError::DanglingEscape;
                        }
                    }
                    Some(_) => {}
                }
            },
            _ => {}
        }
        word_start = false;
    }

    // The lexer fails only on the constructs above
    ParseError::DanglingEscape
}

/// Quote a single word so that [`tokenize`] reads it back unchanged.
///
/// Words made only of safe characters are returned as-is.
pub fn quote(word: &str) -> Result<String, ParseError> {
    shlex::try_quote(word)
        .map(Cow::into_owned)
        .map_err(|_| ParseError::NulByte)
}

/// Join words into a command string, quoting where needed
pub fn join(words: &[String]) -> Result<String, ParseError> {
    shlex::try_join(words.iter().map(String::as_str)).map_err(|_| ParseError::NulByte)
}
