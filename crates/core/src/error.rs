//! Error types and recovery strategies for UniVibe
//!
//! Errors carry a severity tier and a recovery action so callers can decide
//! how to react without matching on every variant:
//! - **Recoverable**: the operation can be retried (reload the catalog, etc.)
//! - **Degraded**: a feature is skipped but the app continues (bad story data)
//! - **Fatal**: user intervention is required (unreadable files, bugs)

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Reload the story catalog and try again
    ReloadCatalog,
    /// Skip the failing content and continue
    SkipContent,
    /// Fall back to default settings
    UseDefaults,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReloadCatalog => write!(f, "Reloading catalog"),
            Self::SkipContent => write!(f, "Skipping content"),
            Self::UseDefaults => write!(f, "Using defaults"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for UniVibe domain operations
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Story Errors =====
    /// A story group was built without stories
    #[error("Story group for '{author}' has no stories")]
    EmptyStoryGroup { author: String },

    /// A story failed validation
    #[error("Invalid story {story}: {reason}")]
    InvalidStory { story: String, reason: String },

    // ===== Catalog Errors =====
    /// Catalog contents are structurally invalid
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// Catalog document could not be parsed
    #[error("Catalog parse error: {message}")]
    CatalogParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== File System Errors =====
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Permission denied for file operation
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied { operation: String, path: PathBuf },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CatalogParseError { .. } | Self::IoError { .. } => ErrorSeverity::Recoverable,

            Self::EmptyStoryGroup { .. }
            | Self::InvalidStory { .. }
            | Self::InvalidCatalog { .. }
            | Self::InvalidConfiguration { .. } => ErrorSeverity::Degraded,

            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InternalError { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::CatalogParseError { .. } | Self::IoError { .. } => RecoveryAction::ReloadCatalog,

            Self::EmptyStoryGroup { .. } | Self::InvalidStory { .. } => {
                RecoveryAction::SkipContent
            }

            Self::InvalidConfiguration { .. } => RecoveryAction::UseDefaults,

            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyStoryGroup { author } => {
                format!("{} has no stories to show right now.", author)
            }
            Self::InvalidStory { .. } => "This story can't be shown.".to_string(),
            Self::InvalidCatalog { .. } | Self::CatalogParseError { .. } => {
                "Stories couldn't be loaded. Pull to refresh.".to_string()
            }
            Self::FileNotFound { .. } => {
                "The file was not found. It may have been moved or deleted.".to_string()
            }
            Self::PermissionDenied { .. } => {
                "Permission denied. Please check the app's storage access.".to_string()
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Using the default instead.", setting)
            }
            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Returns true if the operation can be retried as-is
    pub fn is_retryable(&self) -> bool {
        self.recovery_action() == RecoveryAction::ReloadCatalog
    }

    /// Helper to create a catalog parse error from any error type
    pub fn catalog_parse<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::CatalogParseError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: PathBuf::from("unknown"),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: "file operation".to_string(),
                path: PathBuf::from("unknown"),
            },
            _ => Self::IoError {
                message: err.to_string(),
                source: err,
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::catalog_parse(err.to_string(), err)
    }
}
