// SPDX-License-Identifier: LGPL-3.0-only
//! # Breadcrumb Error Types
//!
//! Layout itself never fails at runtime. The errors here report programmer
//! contract violations (bad indices, cursor misuse) and configuration problems.

use std::fmt;
use thiserror::Error;

/// The filtered view an index was interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexView {
    /// Position within the primary (inline) view.
    Primary,
    /// Position within the overflow view.
    Overflow,
}

impl fmt::Display for IndexView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexView::Primary => f.write_str("primary"),
            IndexView::Overflow => f.write_str("overflow"),
        }
    }
}

/// Errors that can occur in the breadcrumb engine.
#[derive(Error, Debug)]
pub enum BreadcrumbError {
    /// An index was outside of the view it was interpreted against.
    #[error("{view} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the view.
        len: usize,
        /// The view the index belongs to.
        view: IndexView,
    },

    /// The breadcrumb cursor was read before its first advance or moved past its end.
    #[error("breadcrumb cursor position {position:?} out of range (size {size})")]
    CursorOutOfRange {
        /// Cursor position, `None` before the first advance.
        position: Option<usize>,
        /// Number of slots, including the leading ellipsis slot.
        size: usize,
    },

    /// The configuration contained an invalid value.
    #[error("Invalid breadcrumb configuration: {details}")]
    Config {
        /// What was wrong.
        details: String,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse breadcrumb configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for breadcrumb operations.
pub type BreadcrumbResult<T> = Result<T, BreadcrumbError>;

impl BreadcrumbError {
    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize, view: IndexView) -> Self {
        Self::IndexOutOfRange { index, len, view }
    }

    /// Create a cursor out of range error.
    pub fn cursor_out_of_range(position: Option<usize>, size: usize) -> Self {
        Self::CursorOutOfRange { position, size }
    }

    /// Create a configuration error.
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config {
            details: details.into(),
        }
    }
}
