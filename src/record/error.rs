use thiserror::Error;

/// Errors from decoding PHP `serialize()` output.
///
/// Every variant carries the byte offset where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhpDecodeError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("expected '{expected}' at byte {offset}, found '{found}'")]
    UnexpectedByte {
        offset: usize,
        expected: char,
        found: char,
    },

    #[error("invalid number at byte {offset}: {reason}")]
    InvalidNumber { offset: usize, reason: String },

    #[error("unsupported type tag '{tag}' at byte {offset}")]
    UnsupportedType { offset: usize, tag: char },

    #[error("trailing data after value at byte {offset}")]
    TrailingData { offset: usize },

    #[error("nesting deeper than {max_depth} at byte {offset}")]
    TooDeep { offset: usize, max_depth: usize },
}
