//! Error types surfaced to callers.
//!
//! Only malformed input and I/O are errors. Missing tile definitions and
//! out-of-range coordinates degrade locally inside the pipeline.

/// Errors raised while loading or validating a world description.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// Reading a file failed
    Io { path: String, message: String },
    /// JSON could not be deserialized into the expected shape
    Parse(String),
    /// Width or height is zero
    EmptyWorld { width: usize, height: usize },
    /// `width * height` does not fit in memory addressing
    TooLarge { width: usize, height: usize },
    /// A per-tile array does not hold exactly `width * height` entries
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A render view cannot be produced for this world
    InvalidView(String),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::Io { path, message } => write!(f, "Failed to read {}: {}", path, message),
            WorldError::Parse(msg) => write!(f, "Malformed world description: {}", msg),
            WorldError::EmptyWorld { width, height } => {
                write!(f, "World has no tiles ({}x{})", width, height)
            }
            WorldError::TooLarge { width, height } => {
                write!(f, "World dimensions {}x{} overflow the tile count", width, height)
            }
            WorldError::LengthMismatch { field, expected, actual } => write!(
                f,
                "Field `{}` has {} entries, expected width*height = {}",
                field, actual, expected
            ),
            WorldError::InvalidView(msg) => write!(f, "Invalid render view: {}", msg),
        }
    }
}

impl std::error::Error for WorldError {}

/// Errors raised by the image encoder.
#[derive(Debug)]
pub enum EncodeError {
    /// Width or height is zero or exceeds the container limit of 2^31 - 1
    InvalidDimensions { width: u32, height: u32 },
    /// The pixel slice does not hold `width * height * 3` bytes
    BufferSizeMismatch { expected: usize, actual: usize },
    /// The DEFLATE stream reported an error
    Compression(std::io::Error),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::InvalidDimensions { width, height } => {
                write!(f, "Image dimensions {}x{} are not encodable", width, height)
            }
            EncodeError::BufferSizeMismatch { expected, actual } => write!(
                f,
                "Pixel buffer holds {} bytes, expected {}",
                actual, expected
            ),
            EncodeError::Compression(err) => write!(f, "Compression failed: {}", err),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Compression(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Compression(err)
    }
}
