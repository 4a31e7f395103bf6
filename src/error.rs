//! Error types for panel construction, loading, and control access.

use thiserror::Error;

/// Errors raised while building a panel from a configuration tree.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration root is not an object")]
    NotAnObject,

    #[error("Configuration root is empty")]
    EmptyRoot,

    #[error("Folder {0} is empty")]
    EmptyFolder(String),

    #[error("Malformed descriptor at {path}: {reason}")]
    MalformedDescriptor { path: String, reason: String },

    #[error("Unsupported value at {0}")]
    UnsupportedValue(String),

    #[error("Invalid control name {name:?} in {parent}")]
    InvalidName { parent: String, name: String },

    #[error("Duplicate control name {name:?} in {parent}")]
    DuplicateName { parent: String, name: String },

    #[error("Invalid base path {0:?}, expected a path starting and ending with '/'")]
    InvalidBasePath(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by queries and widget updates on a built panel.
#[derive(Error, Debug, PartialEq)]
pub enum GuiError {
    #[error("Unknown control kind {0:?}, expected FOLDER_CONTROL, VALUE_CONTROL or ANY_CONTROL")]
    UnknownControlKind(String),

    #[error("Invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No control with id {0}")]
    UnknownControl(usize),

    #[error("Control {0} does not hold a value")]
    NotAValueControl(String),

    #[error("Control {0} is not an action")]
    NotAnAction(String),

    #[error("Value {value} does not fit control {path}")]
    TypeMismatch { path: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type GuiResult<T> = Result<T, GuiError>;
