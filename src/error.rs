//! Error types for COLLADA geometry extraction
//!
//! Only two kinds of failure ever reach the caller:
//!
//! - **Stream errors**: the XML itself is malformed (unclosed tags, bad syntax,
//!   unknown entities). These come from the tokenizer and abort the parse.
//! - **Format errors**: the document root declares a COLLADA version that is
//!   malformed or newer than the configured maximum. These are raised before any
//!   geometry is processed.
//!
//! Everything else that is well-nested but semantically broken (a geometry
//! without an id, a polylist with quads, an empty float array) is dropped at the
//! smallest enclosing element and never surfaces here.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! - `E1001`: I/O error opening or reading a file
//! - `E2001`: XML stream error reported by the tokenizer
//! - `E2004`: Invalid COLLADA version string
//! - `E4001`: Unsupported COLLADA version

use std::fmt;
use std::io;
use thiserror::Error;

use crate::model::Version;

/// Result type for COLLADA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of tokenizer failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamErrorCode {
    /// The underlying byte source failed
    Io,
    /// Invalid XML syntax (unterminated tag, comment, CDATA, ...)
    Syntax,
    /// Syntactically valid markup that breaks well-formedness (mismatched end tag, ...)
    IllFormed,
    /// Malformed attribute list
    InvalidAttribute,
    /// Text or names that are not valid in the document encoding
    Encoding,
    /// Bad escape sequence or undefined entity
    Escape,
    /// Input ended while elements were still open
    UnexpectedEof,
    /// Any other tokenizer failure
    Other,
}

impl StreamErrorCode {
    /// Short, stable name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamErrorCode::Io => "io",
            StreamErrorCode::Syntax => "syntax",
            StreamErrorCode::IllFormed => "ill-formed",
            StreamErrorCode::InvalidAttribute => "invalid-attribute",
            StreamErrorCode::Encoding => "encoding",
            StreamErrorCode::Escape => "escape",
            StreamErrorCode::UnexpectedEof => "unexpected-eof",
            StreamErrorCode::Other => "other",
        }
    }
}

impl fmt::Display for StreamErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal error raised by the XML tokenizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({code}) at line {line}, byte {position}")]
pub struct StreamError {
    /// Human-readable description from the tokenizer
    pub message: String,
    /// Category of the failure
    pub code: StreamErrorCode,
    /// 1-based line number where the tokenizer stopped
    pub line: u64,
    /// Byte offset reported by the tokenizer
    pub position: u64,
}

impl StreamError {
    /// Create a stream error
    pub fn new(message: impl Into<String>, code: StreamErrorCode, line: u64, position: u64) -> Self {
        Self {
            message: message.into(),
            code,
            line,
            position,
        }
    }
}

/// Errors that can occur while extracting geometry
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while opening or reading a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// The tokenizer rejected the XML stream
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Mismatched or unclosed tags
    /// - Truncated file
    /// - Undefined entity references
    #[error("[E2001] XML stream error: {0}")]
    Stream(#[from] StreamError),

    /// The root `version` attribute is not of the form `major.minor.patch`
    ///
    /// **Error Code**: E2004
    ///
    /// **Suggestions**:
    /// - Verify the `<COLLADA>` element carries a `version` attribute such as `1.4.1`
    #[error("[E2004] Invalid COLLADA version: '{0}'")]
    InvalidVersion(String),

    /// The document declares a version newer than the configured maximum
    ///
    /// **Error Code**: E4001
    ///
    /// **Suggestions**:
    /// - Re-export the asset as COLLADA 1.4
    /// - Raise the limit with `ParserConfig::with_max_version`
    #[error("[E4001] Unsupported COLLADA version '{version}': maximum supported is {max}")]
    UnsupportedVersion {
        /// The version string found in the document
        version: String,
        /// The configured maximum
        max: Version,
    },
}

impl Error {
    /// True for eager validation failures at the document root
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidVersion(_) | Error::UnsupportedVersion { .. }
        )
    }

    /// True for tokenizer-level failures
    pub fn is_stream_error(&self) -> bool {
        matches!(self, Error::Stream(_))
    }

    /// The stream error details, if this is a stream error
    pub fn as_stream_error(&self) -> Option<&StreamError> {
        match self {
            Error::Stream(e) => Some(e),
            _ => None,
        }
    }

    /// Create a stream error for input that ended inside an open element
    pub(crate) fn unexpected_eof(open_elements: usize, line: u64, position: u64) -> Self {
        Error::Stream(StreamError::new(
            format!(
                "Unexpected end of input: {} element(s) still open",
                open_elements
            ),
            StreamErrorCode::UnexpectedEof,
            line,
            position,
        ))
    }
}
