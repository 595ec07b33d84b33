use std::io;
use thiserror::Error;

/// Custom error type for the sysmon library
#[derive(Error, Debug)]
pub enum SysmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("A logging session is already active: {0}")]
    LoggingActive(String),

    #[error("System monitor error: {0}")]
    SystemMonitor(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the sysmon library
pub type Result<T> = std::result::Result<T, SysmonError>;

impl SysmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SysmonError::Config(msg.into())
    }

    pub fn logging_active<S: Into<String>>(msg: S) -> Self {
        SysmonError::LoggingActive(msg.into())
    }

    pub fn system_monitor<S: Into<String>>(msg: S) -> Self {
        SysmonError::SystemMonitor(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SysmonError::Other(msg.into())
    }
}

/// How bad a single collector failure is for the pass that observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// The category could not be read this pass; the next tick tries again.
    PartialUnavailable,
    /// Something that should not happen in practice. Halts this category only.
    CollectorFatal,
}

/// Error returned by a single OS read or a single collector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("process {0} no longer exists")]
    Vanished(u32),

    #[error("process {0} is a zombie")]
    Zombie(u32),

    #[error("{0} unavailable")]
    Unavailable(String),

    #[error("collector failure: {0}")]
    Fatal(String),
}

impl CollectError {
    pub fn unavailable<S: Into<String>>(what: S) -> Self {
        CollectError::Unavailable(what.into())
    }

    pub fn fatal<S: Into<String>>(msg: S) -> Self {
        CollectError::Fatal(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CollectError::Fatal(_) => FailureKind::CollectorFatal,
            _ => FailureKind::PartialUnavailable,
        }
    }

    /// True for the per-item errors a collector skips over while enumerating.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CollectError::PermissionDenied(_) | CollectError::Vanished(_) | CollectError::Zombie(_)
        )
    }
}
