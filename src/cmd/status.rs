/*!
Connection status vocabulary.

Variants mirror the platform's connected-account states:
  ACTIVE, INITIATED, INACTIVE, FAILED, EXPIRED, INITIALIZING

Helpers:
  - variants()
  - from_str_ci()
  - parse_list()  (validates a `--statuses` list before it is sent)
*/

use std::fmt;

use crate::error::CliError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConnectionStatus {
    Active,
    Initiated,
    Inactive,
    Failed,
    Expired,
    Initializing,
}

impl ConnectionStatus {
    /// All variants (order matters for error messages).
    pub const fn variants() -> &'static [ConnectionStatus] {
        &[
            ConnectionStatus::Active,
            ConnectionStatus::Initiated,
            ConnectionStatus::Inactive,
            ConnectionStatus::Failed,
            ConnectionStatus::Expired,
            ConnectionStatus::Initializing,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Active => "ACTIVE",
            ConnectionStatus::Initiated => "INITIATED",
            ConnectionStatus::Inactive => "INACTIVE",
            ConnectionStatus::Failed => "FAILED",
            ConnectionStatus::Expired => "EXPIRED",
            ConnectionStatus::Initializing => "INITIALIZING",
        }
    }

    /// Case-insensitive parser.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(norm))
    }

    /// Validate and normalize a list of raw status strings.
    pub fn parse_list(raw: &[String]) -> Result<Vec<ConnectionStatus>, CliError> {
        raw.iter()
            .map(|s| {
                Self::from_str_ci(s).ok_or_else(|| {
                    let expected = Self::variants()
                        .iter()
                        .map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    CliError::InvalidStatus(s.clone(), expected)
                })
            })
            .collect()
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------- Tests ---------------------------------- */
