//! The original C-style interface, kept as a compatibility shim.
//!
//! A single process-wide slot records the code of the most recent
//! failure. Concurrent callers race on it (last writer wins), so this
//! surface is only meaningful for single-threaded callers — prefer the
//! `Result`-returning API ([`crate::load`], [`crate::DecodeRequest`]).

use std::sync::Mutex;

use crate::decode::DecodeOutput;
use crate::error::TinyImgError;
use crate::pixel::ColorType;

static LAST_ERROR: Mutex<ErrorCode> = Mutex::new(ErrorCode::Ok);

/// Numeric error codes of the original interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    FormatUnsupported,
    FileNotFound,
    InvalidArgument,
    CorruptHeader,
    Truncated,
    Cancelled,
}

impl From<&TinyImgError> for ErrorCode {
    fn from(err: &TinyImgError) -> Self {
        match err {
            TinyImgError::UnsupportedFormat(_) => ErrorCode::FormatUnsupported,
            TinyImgError::SourceUnreadable(_) => ErrorCode::FileNotFound,
            TinyImgError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            TinyImgError::CorruptHeader(_)
            | TinyImgError::DimensionsTooLarge { .. }
            | TinyImgError::LimitExceeded(_) => ErrorCode::CorruptHeader,
            TinyImgError::Truncated => ErrorCode::Truncated,
            TinyImgError::Cancelled(_) => ErrorCode::Cancelled,
        }
    }
}

/// Load `path`, recording the outcome in the process-wide slot.
pub fn load(path: &str, color: ColorType) -> Option<DecodeOutput> {
    match crate::load(path, color, enough::Unstoppable) {
        Ok(out) => {
            set_error(ErrorCode::Ok);
            Some(out)
        }
        Err(err) => {
            set_error(ErrorCode::from(&err));
            None
        }
    }
}

/// Release a pixel buffer.
///
/// Dropping does the same; this exists for parity with the original
/// interface. Move semantics rule out double-release and
/// use-after-release.
pub fn release(pixels: Vec<u8>) {
    drop(pixels);
}

/// Code of the most recent failure, [`ErrorCode::Ok`] if the last call
/// succeeded.
pub fn last_error() -> ErrorCode {
    *LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner())
}

/// Description of the most recent failure, `None` if the last call
/// succeeded.
pub fn last_error_str() -> Option<&'static str> {
    match last_error() {
        ErrorCode::Ok => None,
        ErrorCode::FormatUnsupported => Some("format unsupported"),
        ErrorCode::FileNotFound => Some("file not found"),
        ErrorCode::InvalidArgument => Some("invalid argument"),
        ErrorCode::CorruptHeader => Some("corrupt header"),
        ErrorCode::Truncated => Some("truncated input"),
        ErrorCode::Cancelled => Some("operation cancelled"),
    }
}

fn set_error(code: ErrorCode) {
    *LAST_ERROR.lock().unwrap_or_else(|e| e.into_inner()) = code;
}
