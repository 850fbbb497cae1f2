use alloc::string::String;
use enough::StopReason;

/// Errors from BMP decoding and the surrounding I/O.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TinyImgError {
    /// Unknown extension, bad magic, or a BMP feature outside scope
    /// (compression, unusual header sizes, unhandled bit depths).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Open/seek/read failure at the I/O boundary.
    #[error("source unreadable: {0}")]
    SourceUnreadable(String),

    /// Caller supplied inconsistent arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internally inconsistent header fields, or an out-of-range
    /// palette index in the pixel plane.
    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    /// Fewer bytes available than a declared structure requires.
    #[error("unexpected end of input")]
    Truncated,

    /// Buffer sizing arithmetic overflowed.
    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TinyImgError {
    fn from(r: StopReason) -> Self {
        TinyImgError::Cancelled(r)
    }
}
