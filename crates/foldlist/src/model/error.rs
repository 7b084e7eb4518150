//! Error types for the flattened list model.

use thiserror::Error;

use super::position::ViewType;

/// Errors that can occur while querying or mutating an expandable list.
///
/// Lookups that simply miss (a parent identity that is not in the list, a
/// parent index past the end) are not errors: they return `None` or are
/// silent no-ops.
#[derive(Error, Debug)]
pub enum FoldError {
    /// A flat position outside the current bounds of the list.
    #[error("index {index} out of range for flat list of length {len}")]
    IndexOutOfRange {
        /// The rejected flat index.
        index: usize,
        /// Length of the flat list at the time of the call.
        len: usize,
    },

    /// A flat entry that no longer resolves to a parent or a child of one.
    ///
    /// This indicates internal corruption and is never recoverable.
    #[error("unrecognized entry at flat index {index}")]
    UnrecognizedEntry {
        /// Flat index of the offending entry.
        index: usize,
    },

    /// A raw view-type code that is neither the parent nor the child code.
    #[error("unrecognized view type {0}")]
    UnrecognizedViewType(i32),

    /// A view holder of the wrong kind was handed to `bind`.
    #[error("view holder mismatch at flat index {index}: expected a {expected:?} holder")]
    ViewTypeMismatch {
        /// Flat index being bound.
        index: usize,
        /// The kind of holder the entry needs.
        expected: ViewType,
    },

    /// A persisted expansion snapshot could not be encoded or decoded.
    #[error("invalid expansion snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for expandable list operations.
pub type FoldResult<T> = Result<T, FoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FoldError::IndexOutOfRange { index: 7, len: 4 };
        assert_eq!(
            err.to_string(),
            "index 7 out of range for flat list of length 4"
        );

        let err = FoldError::ViewTypeMismatch {
            index: 2,
            expected: ViewType::Child,
        };
        assert!(err.to_string().contains("expected a Child holder"));
    }

    #[test]
    fn test_snapshot_error_source() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = FoldError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
