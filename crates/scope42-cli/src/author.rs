//! Comment author resolution.
//!
//! The chain: `--author` flag > `SCOPE42_AUTHOR` env > `author` in the user
//! config > `USER` env. Blank values at any step are skipped.

use crate::output::CliError;
use scope42_core::error::ErrorCode;
use std::env;

/// Environment reader, swappable in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_author_with(
    cli_flag: Option<&str>,
    config_author: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    non_blank(cli_flag)
        .or_else(|| non_blank(env.get("SCOPE42_AUTHOR").as_deref()))
        .or_else(|| non_blank(config_author))
        .or_else(|| non_blank(env.get("USER").as_deref()))
}

/// Resolve the author name for a new comment.
pub fn resolve_author(cli_flag: Option<&str>, config_author: Option<&str>) -> Option<String> {
    resolve_author_with(cli_flag, config_author, &RealEnv)
}

/// Like [`resolve_author`], failing with [`ErrorCode::MissingAuthor`].
pub fn require_author(
    cli_flag: Option<&str>,
    config_author: Option<&str>,
) -> Result<String, CliError> {
    resolve_author(cli_flag, config_author).ok_or_else(|| {
        CliError::from_code(
            ErrorCode::MissingAuthor,
            "a comment author is required but none is configured",
        )
    })
}
