//! Error types for tabsync operations

use crate::format::FormatError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabsyncError>;

#[derive(Error, Debug)]
pub enum TabsyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format template error: {0}")]
    Format(#[from] FormatError),

    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    #[error("Invalid table document: {message}")]
    InvalidDocument { message: String },

    #[error("Invalid filter expression: {message}")]
    InvalidFilter { message: String },

    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl TabsyncError {
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: msg.into(),
        }
    }

    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: msg.into(),
        }
    }

    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
