//! Error types for the codec.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while encoding or decoding wire values.
///
/// All failures are local, synchronous and non-retryable: the first error
/// aborts the whole call and no partial output escapes. Each variant carries
/// the context (offset, lengths, tag or gap identity) needed to diagnose a
/// failure without re-running with instrumentation.
#[derive(Error, Debug)]
pub enum Error {
    /// A read would run past the end of the input buffer.
    #[error("range error at offset {offset}: requested {requested} bytes, {available} available")]
    Range {
        offset: usize,
        requested: usize,
        available: usize,
    },

    /// A header byte with no defined interpretation.
    #[error("invalid major-type byte {byte:#04x} at offset {offset}")]
    InvalidMajor { byte: u8, offset: usize },

    /// A break marker outside any indefinite-length construct.
    #[error("unexpected break marker at offset {offset}")]
    UnexpectedBreak { offset: usize },

    /// A text string whose bytes are not valid UTF-8.
    #[error("invalid UTF-8 in text string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A non-text map key while decoding in object mode.
    #[error("non-text map key at offset {offset}; use MapMode::Generic for non-text keys")]
    InvalidKey { offset: usize },

    /// An integer whose magnitude exceeds the encodable ceiling.
    #[error("integer {value} exceeds the encodable range")]
    NumericOverflow { value: String },

    /// A gap with neither a fill nor a default at full-resolution time.
    #[error("no fill or default supplied for gap {gap}")]
    FillMissing { gap: u64 },

    /// A gap was encountered while partial encoding is disabled.
    #[error("gap {gap} encountered but partial encoding is not enabled")]
    PartialDisabled { gap: u64 },

    /// A registry transform rejected the value carried by a tag.
    #[error("invalid value for tag {tag}: {reason}")]
    TagValue { tag: u64, reason: String },
}
