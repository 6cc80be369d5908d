use crate::output::CliError;
use scope42_core::error::ErrorCode;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_TAG_LEN: usize = 50;
pub const MAX_COMMENT_LEN: usize = 8_192;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn to_cli_error(&self) -> CliError {
        CliError::with_details(
            format!("invalid {} '{}': {}", self.field, self.value, self.reason),
            self.suggestion.clone(),
            ErrorCode::InvalidItem.code(),
        )
    }
}

pub fn validate_title(s: &str) -> Result<(), ValidationError> {
    if s.trim() != s {
        return Err(ValidationError::new(
            "title",
            s,
            "must not start or end with whitespace",
            "trim leading/trailing whitespace from --title",
        ));
    }
    if s.is_empty() {
        return Err(ValidationError::new(
            "title",
            s,
            "must not be empty",
            "provide a non-empty --title",
        ));
    }
    if s.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::new(
            "title",
            s,
            format!("must be <= {MAX_TITLE_LEN} characters"),
            "shorten the title and move detail into --description",
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "title",
            s,
            "must not contain control characters",
            "remove control characters from the title",
        ));
    }
    Ok(())
}

/// Tags are free text but stay single-line and reasonably short so that
/// tag lists render on one row.
pub fn validate_tag(s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::new(
            "tag",
            s,
            "must not be blank",
            "drop the empty --tag value",
        ));
    }
    if s.trim() != s {
        return Err(ValidationError::new(
            "tag",
            s,
            "must not start or end with whitespace",
            "trim the tag",
        ));
    }
    if s.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::new(
            "tag",
            s,
            format!("must be <= {MAX_TAG_LEN} characters"),
            "use a shorter tag",
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "tag",
            s,
            "must not contain control characters",
            "remove control characters from the tag",
        ));
    }
    Ok(())
}

pub fn validate_comment(s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::new(
            "comment",
            s,
            "must not be empty",
            "write some text for the comment",
        ));
    }
    let len = s.chars().count();
    if len > MAX_COMMENT_LEN {
        return Err(ValidationError::new(
            "comment",
            format!("{len} characters"),
            format!("must be <= {MAX_COMMENT_LEN} characters"),
            "split the comment or move detail into the description",
        ));
    }
    if s.chars().any(|ch| ch.is_control() && ch != '\n' && ch != '\t') {
        return Err(ValidationError::new(
            "comment",
            s,
            "must not contain control characters",
            "remove control characters from the comment",
        ));
    }
    Ok(())
}
