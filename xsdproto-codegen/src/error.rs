//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema graph loading error.
    #[error("load graph: {0}")]
    Load(#[from] xsdproto_schema::LoadError),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The spec's schema directory does not exist.
    #[error("schema directory {} does not exist", path.display())]
    SchemaDirectoryMissing {
        /// Expected directory.
        path: PathBuf,
    },

    /// Neither the entry file nor its underscore-normalized name exists.
    #[error("main schema not found; tried {} and {}", tried.display(), alternate.display())]
    EntryNotFound {
        /// Entry path as configured.
        tried: PathBuf,
        /// Entry path with `-` replaced by `_`.
        alternate: PathBuf,
    },

    /// A shared-vocabulary entry document does not exist.
    #[error("shared vocabulary schema not found: {}", path.display())]
    SharedEntryNotFound {
        /// Expected path.
        path: PathBuf,
    },

    /// Strict mode rejected unresolved type references.
    #[error("{count} unresolved type reference(s), first: {first}")]
    UnresolvedTypes {
        /// Number of unresolved references.
        count: usize,
        /// First diagnostic message.
        first: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Returns true if the error is an input-missing error.
    #[must_use]
    pub fn is_input_missing(&self) -> bool {
        matches!(
            self,
            Self::SchemaDirectoryMissing { .. }
                | Self::EntryNotFound { .. }
                | Self::SharedEntryNotFound { .. }
        )
    }
}
