//! Turning free text into a safe FTS5 `MATCH` expression.

/// Build an FTS5 query from user input.
///
/// Input is split into alphanumeric tokens, each token is quoted so FTS5
/// operators and punctuation lose their meaning, and the last token becomes
/// a prefix match. Tokens are implicitly ANDed. Returns `None` when the input
/// has no searchable token.
#[must_use]
pub fn fts_query(input: &str) -> Option<String> {
    let tokens: Vec<&str> = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let (last, rest) = tokens.split_last()?;

    let mut parts: Vec<String> = rest.iter().map(|t| format!("\"{t}\"")).collect();
    parts.push(format!("\"{last}\"*"));
    Some(parts.join(" "))
}
