use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotAWorkspace,
    ConfigParseError,
    NoWorkspaceOpen,
    AlreadyInitialized,
    MissingAuthor,
    ItemNotFound,
    InvalidItemId,
    KindMismatch,
    InvalidReference,
    InvalidItem,
    SerialsExhausted,
    DuplicateItemId,
    WorkspaceLoadFailed,
    DemoDataCorrupt,
    StaleWorkspace,
    ItemWriteFailed,
    LockContention,
    SearchIndexUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotAWorkspace => "E1001",
            Self::ConfigParseError => "E1002",
            Self::NoWorkspaceOpen => "E1003",
            Self::AlreadyInitialized => "E1004",
            Self::MissingAuthor => "E1005",
            Self::ItemNotFound => "E2001",
            Self::InvalidItemId => "E2002",
            Self::KindMismatch => "E2003",
            Self::InvalidReference => "E2004",
            Self::InvalidItem => "E2005",
            Self::SerialsExhausted => "E2006",
            Self::DuplicateItemId => "E2007",
            Self::WorkspaceLoadFailed => "E3001",
            Self::DemoDataCorrupt => "E3002",
            Self::StaleWorkspace => "E5001",
            Self::ItemWriteFailed => "E5002",
            Self::LockContention => "E5003",
            Self::SearchIndexUnavailable => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotAWorkspace => "Not a scope42 workspace",
            Self::ConfigParseError => "Config file parse error",
            Self::NoWorkspaceOpen => "No workspace is open",
            Self::AlreadyInitialized => "Workspace already initialized",
            Self::MissingAuthor => "No author configured",
            Self::ItemNotFound => "Item not found",
            Self::InvalidItemId => "Invalid item ID",
            Self::KindMismatch => "Item ID does not match item type",
            Self::InvalidReference => "Invalid item reference",
            Self::InvalidItem => "Invalid item",
            Self::SerialsExhausted => "No serial numbers left for this item type",
            Self::DuplicateItemId => "Item ID already in use",
            Self::WorkspaceLoadFailed => "Workspace could not be loaded",
            Self::DemoDataCorrupt => "Demo dataset is corrupt",
            Self::StaleWorkspace => "Workspace is stale",
            Self::ItemWriteFailed => "Item file write failed",
            Self::LockContention => "Lock contention",
            Self::SearchIndexUnavailable => "Search index unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotAWorkspace => Some("Run `scope42 init` or pass --workspace <dir>."),
            Self::ConfigParseError => Some("Fix syntax in scope42.yml and retry."),
            Self::NoWorkspaceOpen => Some("Open a workspace before changing items."),
            Self::AlreadyInitialized => Some("Pass --force to rewrite scope42.yml and README.md."),
            Self::MissingAuthor => Some(
                "Pass --author, set SCOPE42_AUTHOR, or set `author` in ~/.config/scope42/config.toml.",
            ),
            Self::ItemNotFound => None,
            Self::InvalidItemId => Some("Use IDs like issue-1, risk-2, improvement-3, decision-4."),
            Self::KindMismatch => Some("Rename the file or fix its `id`/`type` fields."),
            Self::InvalidReference => Some(
                "Issues and risks cause issues/risks, improvements solve issues/risks and \
                 modify decisions, decisions supersede decisions.",
            ),
            Self::InvalidItem => None,
            Self::SerialsExhausted => Some("Renumber the highest item of this type to free serials."),
            Self::DuplicateItemId => Some("Reload the workspace and retry; the existing item was left untouched."),
            Self::WorkspaceLoadFailed => Some("Fix the reported item file and reopen the workspace."),
            Self::DemoDataCorrupt => Some("Retry once. If persistent, report a bug with logs."),
            Self::StaleWorkspace => Some(
                "Another process changed the workspace since it was loaded; reload it and retry.",
            ),
            Self::ItemWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other scope42 process releases its lock."),
            Self::SearchIndexUnavailable => Some("Retry; the search worker is restarted on reopen."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotAWorkspace,
            ErrorCode::ConfigParseError,
            ErrorCode::NoWorkspaceOpen,
            ErrorCode::AlreadyInitialized,
            ErrorCode::MissingAuthor,
            ErrorCode::ItemNotFound,
            ErrorCode::InvalidItemId,
            ErrorCode::KindMismatch,
            ErrorCode::InvalidReference,
            ErrorCode::InvalidItem,
            ErrorCode::SerialsExhausted,
            ErrorCode::DuplicateItemId,
            ErrorCode::WorkspaceLoadFailed,
            ErrorCode::DemoDataCorrupt,
            ErrorCode::StaleWorkspace,
            ErrorCode::ItemWriteFailed,
            ErrorCode::LockContention,
            ErrorCode::SearchIndexUnavailable,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::StaleWorkspace.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn stale_workspace_points_at_reload() {
        let hint = ErrorCode::StaleWorkspace.hint().unwrap_or_default();
        assert!(hint.contains("reload"));
    }
}
