//! Local error taxonomy.
//!
//! Everything here is detected before any request leaves the process.
//! Failures raised by the platform itself live in `client::ApiError` and
//! are surfaced verbatim.

use thiserror::Error;

/// Validation / configuration failures raised by the CLI itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// Neither `--api-key` nor `COMPOSIO_API_KEY` supplied a credential.
    #[error("missing API key: pass --api-key or set COMPOSIO_API_KEY")]
    MissingCredential,

    /// A global configuration flag could not be interpreted.
    #[error("invalid {flag}: {reason}")]
    InvalidConfiguration { flag: &'static str, reason: String },

    /// `tools` was invoked without any discriminating filter.
    #[error(
        "at least one filter is required: --toolkits, --tools, --search, --tags or --auth-config-ids (or use --all)"
    )]
    MissingFilter,

    /// Two filters that cannot be sent together were supplied.
    #[error("{0}")]
    ConflictingFilters(String),

    /// `--scopes` without exactly one toolkit.
    #[error("--scopes requires --toolkits with exactly one toolkit")]
    InvalidScopeUsage,

    /// Both `--args` and `--args-file` were supplied.
    #[error("use either --args or --args-file, not both")]
    ConflictingInputs,

    /// Tool arguments could not be parsed.
    #[error("invalid JSON in {source_name}: {reason}")]
    InvalidArguments { source_name: String, reason: String },

    /// A connection status outside the platform vocabulary.
    #[error("unknown connection status '{0}' (expected one of {1})")]
    InvalidStatus(String, String),

    /// Manual execution would run against an unpinned `latest` toolkit version.
    #[error(
        "toolkit version for '{0}' resolves to 'latest'; pass --version, pin it with --toolkit-versions, or set --dangerously-skip-version-check"
    )]
    VersionRequired(String),
}
