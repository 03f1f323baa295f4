use std::path::{Path, PathBuf};

/// Failures that abort a whole run.
///
/// Per-record gaps (a node without a label, a target id with no parents) are
/// not errors: they resolve to placeholders or empty collections.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("input file `{}` not found", path.display())]
    InputNotFound { path: PathBuf },

    #[error("malformed input `{}`: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("missing key `{key}` in `{}`", path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OntologyError {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn missing_key(path: &Path, key: impl Into<String>) -> Self {
        Self::MissingKey {
            path: path.to_path_buf(),
            key: key.into(),
        }
    }

    /// Maps an I/O failure, turning `NotFound` into [`OntologyError::InputNotFound`].
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T, E = OntologyError> = std::result::Result<T, E>;
