//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: framed sections for humans, compact tab-separated rows for
//! scripts, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` flag
//! 2. hidden `--json` flag
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. `output` in the user config
//! 5. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use scope42_core::error::ErrorCode;
use scope42_core::store::StoreError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Tab-separated plain text for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    // Unknown names fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::from_name) {
        return mode;
    }
    if let Some(mode) = config_output.and_then(OutputMode::from_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config and TTY
/// detection.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_output,
        is_tty,
    )
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a serializable value; pretty and text share `human_fn`.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable `E####` code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
        }
    }

    /// An error carrying `code` and its standard hint.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&StoreError> for CliError {
    fn from(err: &StoreError) -> Self {
        Self::from_code(err.code(), err.to_string())
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)?;
    Ok(())
}

fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(suggestion) = &error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope42_core::ItemId;

    fn rendered(mode: OutputMode, error: &CliError) -> String {
        let mut buf = Vec::new();
        write_error(mode, error, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn format_flag_wins_over_everything() {
        let mode =
            resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_wins_over_env_and_config() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_wins_over_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn config_is_used_when_env_is_unknown() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn default_follows_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, Some("bogus"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn pretty_kv_aligns_keys() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "status", "current").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "status:      current\n");
    }

    #[test]
    fn store_error_carries_code_and_hint() {
        let id: ItemId = "risk-9".parse().expect("id");
        let err = CliError::from(&StoreError::ItemNotFound(id));
        assert!(err.message.contains("risk-9"));
        assert_eq!(err.error_code.as_deref(), Some("E2001"));

        let stale = CliError::from(&StoreError::Stale {
            path: "items/issues/issue-1.yml".into(),
        });
        assert_eq!(stale.error_code.as_deref(), Some("E5001"));
        assert!(stale.suggestion.as_deref().unwrap_or_default().contains("reload"));
    }

    #[test]
    fn text_error_shows_code_and_suggestion() {
        let err = CliError::with_details("bad input", "try again", "E2005");
        let text = rendered(OutputMode::Text, &err);
        assert_eq!(text, "error[E2005]: bad input\n  suggestion: try again\n");
    }

    #[test]
    fn plain_error_has_no_code_prefix() {
        let text = rendered(OutputMode::Pretty, &CliError::new("boom"));
        assert_eq!(text, "error: boom\n");
    }

    #[test]
    fn json_error_is_wrapped() {
        let err = CliError::from_code(ErrorCode::StaleWorkspace, "workspace is stale");
        let value: serde_json::Value =
            serde_json::from_str(&rendered(OutputMode::Json, &err)).expect("json");
        assert_eq!(value["error"]["error_code"], "E5001");
        assert_eq!(value["error"]["message"], "workspace is stale");
        assert!(value["error"]["suggestion"].is_string());
    }
}
