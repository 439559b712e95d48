//! Error types.
//!
//! The library reports failures through [`ModelError`]; the `losm` binary wraps
//! them into [`AppError`], which carries the process exit code.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Library error type.
#[derive(Error, Debug)]
pub enum ModelError {
    /// I/O error on a reference table or workspace file.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed physics option.
    #[error("Invalid physics option: {0}")]
    PhysicsOption(String),

    /// Missing or inconsistent run configuration (environment, paths).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed reference table.
    #[error("Table error: {0}")]
    Table(String),

    /// A node with this name already exists in the workspace.
    #[error("Duplicate name in workspace: {0}")]
    DuplicateName(String),

    /// A referenced name does not exist in the workspace.
    #[error("Unknown name in workspace: {0}")]
    UnknownName(String),

    /// The named node exists but is not a real variable.
    #[error("Not a variable: {0}")]
    NotAVariable(String),

    /// Invalid expression (wrong arity, bad spline nodes, ...).
    #[error("Invalid expression: {0}")]
    Expression(String),
}

impl ModelError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let exit_code = match err {
            ModelError::Io { .. }
            | ModelError::Json(_)
            | ModelError::PhysicsOption(_)
            | ModelError::Config(_)
            | ModelError::Table(_) => 2,
            ModelError::DuplicateName(_)
            | ModelError::UnknownName(_)
            | ModelError::NotAVariable(_)
            | ModelError::Expression(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
