/// Errors that can occur while resolving labels or generating rules
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("importpath {import_path:?} does not start with goPrefix {go_prefix:?}")]
    OutsideRepository {
        import_path: String,
        go_prefix: String,
    },

    #[error("cannot resolve importpath {import_path:?}: {reason}")]
    UnresolvedImport { import_path: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid label: {0}")]
    LabelError(String),
}

impl Error {
    /// Whether this error only says the import belongs to another repository.
    ///
    /// Such imports (the standard library, third-party modules) are not
    /// managed by the generated build files and are left out of `deps`.
    pub fn is_outside_repository(&self) -> bool {
        matches!(self, Error::OutsideRepository { .. })
    }
}

/// Result type alias for rulegen operations
pub type Result<T> = std::result::Result<T, Error>;
