//! Parser configuration

use std::fmt;

/// Default capacity of the read buffer placed in front of streamed input
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A COLLADA `major.minor` format version
///
/// Versions order lexicographically: `1.4 < 1.5 < 2.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl Version {
    /// Create a version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Configuration for parsing COLLADA documents
///
/// # Example
///
/// ```
/// use collada_geometry::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_max_version(1, 5)
///     .with_buffer_size(64 * 1024);
/// assert_eq!(config.max_version().to_string(), "1.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    max_version: Version,
    buffer_size: usize,
}

impl ParserConfig {
    /// Create a configuration accepting COLLADA up to 1.4
    pub fn new() -> Self {
        Self {
            max_version: Version::new(1, 4),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the newest COLLADA version the parser accepts
    pub fn with_max_version(mut self, major: u32, minor: u32) -> Self {
        self.max_version = Version::new(major, minor);
        self
    }

    /// Set the read buffer capacity used for streamed input
    ///
    /// A zero size falls back to [`DEFAULT_BUFFER_SIZE`].
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = if size == 0 { DEFAULT_BUFFER_SIZE } else { size };
        self
    }

    /// The newest accepted version
    pub fn max_version(&self) -> Version {
        self.max_version
    }

    /// Read buffer capacity for streamed input
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
