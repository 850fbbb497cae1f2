//! Byte sources: the seam between the decoder and its input.
//!
//! A [`ByteSource`] is random-accessible and strict: short reads and
//! out-of-bounds seeks fail with [`TinyImgError::Truncated`] instead of
//! returning partial data, so the decoder never reads past the end of
//! the input.

use crate::error::TinyImgError;

/// Random-access byte input for the decoder.
pub trait ByteSource {
    /// Total number of bytes in the source.
    fn len(&self) -> u64;

    /// Current read position.
    fn position(&self) -> u64;

    /// Seek to an absolute offset. Offsets past the end are an error.
    fn seek(&mut self, pos: u64) -> Result<(), TinyImgError>;

    /// Fill `buf` completely or fail with [`TinyImgError::Truncated`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TinyImgError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance past `n` bytes.
    fn skip(&mut self, n: u64) -> Result<(), TinyImgError> {
        let pos = self
            .position()
            .checked_add(n)
            .ok_or(TinyImgError::Truncated)?;
        self.seek(pos)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], TinyImgError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8, TinyImgError> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u16_le(&mut self) -> Result<u16, TinyImgError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32_le(&mut self) -> Result<u32, TinyImgError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_i32_le(&mut self) -> Result<i32, TinyImgError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }
}

/// In-memory byte source.
#[derive(Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: u64) -> Result<(), TinyImgError> {
        if pos > self.data.len() as u64 {
            return Err(TinyImgError::Truncated);
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TinyImgError> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or(TinyImgError::Truncated)?;
        if end > self.data.len() {
            return Err(TinyImgError::Truncated);
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// File-backed byte source.
///
/// The length is captured at open so seeks past the end fail up front
/// instead of at the next read.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct FileSource {
    file: std::fs::File,
    len: u64,
    pos: u64,
}

#[cfg(feature = "std")]
impl FileSource {
    /// Open `path` for decoding.
    pub fn open(path: &str) -> Result<Self, TinyImgError> {
        let file = std::fs::File::open(path)
            .map_err(|e| TinyImgError::SourceUnreadable(format!("{path}: {e}")))?;
        let len = file
            .metadata()
            .map_err(|e| TinyImgError::SourceUnreadable(format!("{path}: {e}")))?
            .len();
        Ok(Self { file, len, pos: 0 })
    }
}

#[cfg(feature = "std")]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, pos: u64) -> Result<(), TinyImgError> {
        use std::io::Seek;
        if pos > self.len {
            return Err(TinyImgError::Truncated);
        }
        self.file
            .seek(std::io::SeekFrom::Start(pos))
            .map_err(|e| TinyImgError::SourceUnreadable(e.to_string()))?;
        self.pos = pos;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TinyImgError> {
        use std::io::Read;
        let end = self
            .pos
            .checked_add(buf.len() as u64)
            .ok_or(TinyImgError::Truncated)?;
        if end > self.len {
            return Err(TinyImgError::Truncated);
        }
        self.file.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => TinyImgError::Truncated,
            _ => TinyImgError::SourceUnreadable(e.to_string()),
        })?;
        self.pos = end;
        Ok(())
    }
}
