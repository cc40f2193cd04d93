//! Alias resolution
//!
//! Rewrites the leading word of a tokenized command using the alias table.
//! Expansion is exactly one level deep: the expanded words are never fed
//! back into the resolver, so an alias whose target starts with another
//! alias name (or with itself) runs that word literally.

use std::collections::BTreeMap;

use super::tokenizer::{tokenize, ParseError};

/// Expand the leading word of `tokens` if it names an alias.
///
/// The alias command is re-tokenized and the user's remaining arguments
/// are appended after it: `ll /tmp` with `ll = "ls -la"` becomes
/// `["ls", "-la", "/tmp"]`. Words that are not aliases are returned as-is.
pub fn resolve(
    tokens: Vec<String>,
    aliases: &BTreeMap<String, String>,
) -> Result<Vec<String>, ParseError> {
    let Some(command) = tokens.first().and_then(|head| aliases.get(head)) else {
        return Ok(tokens);
    };

    let mut expanded = tokenize(command)?;
    trace!("alias '{}' -> {:?}", tokens[0], expanded);
    expanded.extend(tokens.into_iter().skip(1));
    Ok(expanded)
}
