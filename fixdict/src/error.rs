use thiserror::Error;

/// Errors produced by dictionary construction and mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DictError {
    /// Key and value widths are fixed at construction and must be non-zero
    #[error("key and value widths must be non-zero (key: {key}, value: {value})")]
    ZeroWidth { key: usize, value: usize },

    /// A key or value slice did not match the width fixed at construction
    #[error("expected a {expected} byte {what}, got {got} bytes")]
    WidthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Merge between dictionaries with different record layouts
    #[error("source and destination record layouts differ")]
    LayoutMismatch,

    /// Allocation failed while growing the table; the table is unchanged
    #[error("allocation failed while growing the table")]
    CapacityExhausted,
}

pub type Result<T> = std::result::Result<T, DictError>;
