// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error taxonomy for oceanio.
//!
//! Two layers of errors exist:
//! - [`ProviderError`] - what a reader, writer or plotter reports from inside
//!   its own code
//! - [`Error`] - the uniform taxonomy surfaced by the resolver and the
//!   dispatch engine to callers
//!
//! Provider errors never leave the dispatch boundary as-is; they are
//! translated with [`Error::from_provider`].

use std::path::PathBuf;

use thiserror::Error;

use super::Capability;

/// Errors surfaced by the registry, resolver and dispatch engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Input path does not exist
    #[error("Input file does not exist: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Input content is malformed
    #[error("Failed to parse input as '{format}': {message}")]
    Parse {
        /// Format key of the reader that rejected the input
        format: String,
        /// Error message
        message: String,
    },

    /// Explicit format key is not registered
    #[error("Unknown {capability} format '{key}'. Available: {}", available.join(", "))]
    UnknownFormat {
        /// Capability that was searched
        capability: Capability,
        /// Requested key
        key: String,
        /// Keys registered for the capability
        available: Vec<String>,
    },

    /// No provider claims the path's extension
    #[error(
        "No {capability} found for extension '{extension}'. Supported extensions: {}",
        known.join(", ")
    )]
    UnresolvedFormat {
        /// Capability that was searched
        capability: Capability,
        /// Extension that was tried (empty when the path has none)
        extension: String,
        /// Every extension claimed within the capability
        known: Vec<String>,
    },

    /// More than one provider claims the path's extension
    #[error(
        "Extension '{extension}' is claimed by several {capability} formats: {}. Pass an explicit format key",
        candidates.join(", ")
    )]
    AmbiguousFormat {
        /// Capability that was searched
        capability: Capability,
        /// Extension that matched several providers
        extension: String,
        /// Competing format keys, sorted
        candidates: Vec<String>,
    },

    /// Field mapping conflicts with the dataset
    #[error("Field mapping error: {message}")]
    Mapping {
        /// Error message
        message: String,
    },

    /// Writer failed to produce its output
    #[error("Writer '{format}' failed: {message}")]
    Write {
        /// Writer format key
        format: String,
        /// Error message
        message: String,
    },

    /// Plotter failed to render
    #[error("Plotter '{format}' failed: {message}")]
    Plot {
        /// Plotter key
        format: String,
        /// Error message
        message: String,
    },

    /// Any other failure raised inside provider code
    #[error("Provider '{key}' failed: {message}")]
    ProviderFailure {
        /// Format key of the failing provider
        key: String,
        /// Original failure message
        message: String,
    },

    /// Plugin manifest or configuration could not be loaded
    #[error("Cannot load {}: {message}", path.display())]
    Manifest {
        /// Manifest or config path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Host-side I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a mapping error.
    pub fn mapping(message: impl Into<String>) -> Self {
        Error::Mapping {
            message: message.into(),
        }
    }

    /// Create a manifest error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a provider failure.
    pub fn provider_failure(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ProviderFailure {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Translate an error reported by a provider into the uniform taxonomy.
    ///
    /// `key` is the format key of the provider that produced the error.
    pub fn from_provider(key: &str, err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { path } => Error::NotFound { path },
            ProviderError::Parse { message } => Error::Parse {
                format: key.to_string(),
                message,
            },
            ProviderError::Write { message } => Error::Write {
                format: key.to_string(),
                message,
            },
            ProviderError::Plot { message } => Error::Plot {
                format: key.to_string(),
                message,
            },
            ProviderError::Other(source) => Error::provider_failure(key, source.to_string()),
        }
    }

    /// Stable name of the error kind, printed by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NotFoundError",
            Error::Parse { .. } => "ParseError",
            Error::UnknownFormat { .. } => "UnknownFormatError",
            Error::UnresolvedFormat { .. } => "UnresolvedFormatError",
            Error::AmbiguousFormat { .. } => "AmbiguousFormatError",
            Error::Mapping { .. } => "MappingError",
            Error::Write { .. } => "WriteError",
            Error::Plot { .. } => "PlotError",
            Error::ProviderFailure { .. } => "ProviderFailure",
            Error::Manifest { .. } => "ManifestError",
            Error::Io(_) => "IoError",
        }
    }

    /// Whether this error was raised while resolving a format.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat { .. }
                | Error::UnresolvedFormat { .. }
                | Error::AmbiguousFormat { .. }
        )
    }
}

/// Errors reported by provider code (readers, writers, plotters).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The input path does not exist
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// The input content is malformed
    #[error("parse error: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Output could not be written or the dataset cannot be represented
    #[error("write error: {message}")]
    Write {
        /// Error message
        message: String,
    },

    /// Plot could not be produced
    #[error("plot error: {message}")]
    Plot {
        /// Error message
        message: String,
    },

    /// Anything else
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ProviderError::NotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        ProviderError::Parse {
            message: message.into(),
        }
    }

    /// Create a write error.
    pub fn write(message: impl Into<String>) -> Self {
        ProviderError::Write {
            message: message.into(),
        }
    }

    /// Create a plot error.
    pub fn plot(message: impl Into<String>) -> Self {
        ProviderError::Plot {
            message: message.into(),
        }
    }

    /// Wrap any other error.
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ProviderError::Other(err.into())
    }
}

/// Result type for oceanio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for provider code.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_format_key() {
        let err = Error::from_provider("sbe-cnv", ProviderError::parse("bad header"));
        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(err.kind(), "ParseError");
        assert_eq!(
            err.to_string(),
            "Failed to parse input as 'sbe-cnv': bad header"
        );
    }

    #[test]
    fn test_not_found_passes_path_through() {
        let err = Error::from_provider("csv", ProviderError::not_found("/no/such.csv"));
        match err {
            Error::NotFound { path } => assert_eq!(path, PathBuf::from("/no/such.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_becomes_provider_failure() {
        let err = Error::from_provider("histogram", ProviderError::other("disk on fire"));
        assert_eq!(err.kind(), "ProviderFailure");
        assert_eq!(err.to_string(), "Provider 'histogram' failed: disk on fire");
    }

    #[test]
    fn test_write_and_plot_kinds() {
        let write = Error::from_provider("csv", ProviderError::write("2-D variable"));
        assert_eq!(write.kind(), "WriteError");
        assert_eq!(write.to_string(), "Writer 'csv' failed: 2-D variable");

        let plot = Error::from_provider("histogram", ProviderError::plot("no 'salinity'"));
        assert_eq!(plot.kind(), "PlotError");
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = Error::AmbiguousFormat {
            capability: Capability::Reader,
            extension: ".xyz".to_string(),
            candidates: vec!["alpha".to_string(), "beta".to_string()],
        };
        assert!(err.is_resolution());
        assert_eq!(
            err.to_string(),
            "Extension '.xyz' is claimed by several reader formats: alpha, beta. Pass an explicit format key"
        );
    }

    #[test]
    fn test_unresolved_message_lists_known_extensions() {
        let err = Error::UnresolvedFormat {
            capability: Capability::Writer,
            extension: ".nc".to_string(),
            known: vec![".csv".to_string(), ".json".to_string()],
        };
        assert_eq!(err.kind(), "UnresolvedFormatError");
        assert_eq!(
            err.to_string(),
            "No writer found for extension '.nc'. Supported extensions: .csv, .json"
        );
    }

    #[test]
    fn test_mapping_is_not_resolution() {
        let err = Error::mapping("target 'temperature' already exists");
        assert!(!err.is_resolution());
        assert_eq!(err.kind(), "MappingError");
    }
}
