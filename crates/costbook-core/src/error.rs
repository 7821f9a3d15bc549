use std::io;

/// Machine-readable error codes surfaced to the CLI's JSON error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyName,
    IncompleteMasterItem,
    InvalidTrade,
    CategoryNotFound,
    WorkItemNotFound,
    ProjectNotFound,
    ProjectLineNotFound,
    MasterItemNotFound,
    StoreWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyName => "E1001",
            Self::IncompleteMasterItem => "E1002",
            Self::InvalidTrade => "E1003",
            Self::CategoryNotFound => "E2001",
            Self::WorkItemNotFound => "E2002",
            Self::ProjectNotFound => "E2003",
            Self::ProjectLineNotFound => "E2004",
            Self::MasterItemNotFound => "E2005",
            Self::StoreWriteFailed => "E5001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyName => Some("Provide a non-empty name."),
            Self::IncompleteMasterItem => {
                Some("Master items need a name, a unit, and a non-zero price.")
            }
            Self::InvalidTrade => Some("Use one of: labor, material, equipment."),
            Self::CategoryNotFound
            | Self::WorkItemNotFound
            | Self::ProjectNotFound
            | Self::ProjectLineNotFound
            | Self::MasterItemNotFound => Some("Run the matching `list` command to see valid IDs."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors produced by the stores and the rollup engine.
///
/// Malformed numeric input is deliberately *not* an error anywhere in this
/// crate: quantities and prices coerce to 0, basis quantities to 1.0. Only
/// missing names/fields (validation) and dangling references (not found)
/// abort an operation; missing backing files load as empty stores.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User input rejected before any state change.
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    /// A referenced record does not exist; no state change.
    #[error("{what} not found: {id}")]
    NotFound {
        code: ErrorCode,
        what: &'static str,
        id: String,
    },

    /// Real I/O failure while writing a backing file.
    #[error("store I/O error: {0}")]
    Storage(#[from] io::Error),
}

impl Error {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } | Self::NotFound { code, .. } => *code,
            Self::Storage(_) => ErrorCode::StoreWriteFailed,
        }
    }

    pub(crate) fn empty_name(what: &str) -> Self {
        Self::Validation {
            code: ErrorCode::EmptyName,
            message: format!("{what} name cannot be empty"),
        }
    }

    pub(crate) fn not_found(code: ErrorCode, what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            what,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
