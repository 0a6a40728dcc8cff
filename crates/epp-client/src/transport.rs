//! Length-prefixed frame codec for EPP over a stream transport (RFC 5734).
//!
//! Every EPP data unit is one XML document preceded by a 4-byte big-endian
//! header holding the TOTAL length of the unit, header included:
//!
//! ```text
//! +------------------+------------------+
//! |  4 bytes         |  N bytes         |
//! |  (N + 4, BE)     |  (XML payload)   |
//! +------------------+------------------+
//! ```
//!
//! [`FrameCodec`] plugs into `tokio_util::codec::Framed` for the session; the
//! free functions [`write_frame`], [`read_frame_header`] and [`read_frame`]
//! perform the same operations directly on a reader or writer.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, Encoder};

/// Default maximum payload size (16 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Length header size in bytes
pub const HEADER_SIZE: usize = 4;

/// Codec for EPP data units
#[derive(Debug)]
pub struct FrameCodec {
    max_frame_size: usize,
    current_length: Option<usize>,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    #[must_use]
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            current_length: None,
        }
    }

    #[must_use]
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

/// Convert a declared total length into a payload length, enforcing the cap.
fn payload_length(total: u32, max_frame_size: usize) -> Result<usize, FrameError> {
    let total = total as usize;
    if total < HEADER_SIZE {
        return Err(FrameError::InvalidLength(total));
    }
    let len = total - HEADER_SIZE;
    if len > max_frame_size {
        return Err(FrameError::TooLarge {
            size: len,
            max: max_frame_size,
        });
    }
    Ok(len)
}

/// Build the header for a payload, enforcing the cap.
fn header_for(len: usize, max_frame_size: usize) -> Result<[u8; HEADER_SIZE], FrameError> {
    if len > max_frame_size {
        return Err(FrameError::TooLarge {
            size: len,
            max: max_frame_size,
        });
    }
    let total = u32::try_from(len + HEADER_SIZE).map_err(|_| FrameError::TooLarge {
        size: len,
        max: max_frame_size,
    })?;
    Ok(total.to_be_bytes())
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.current_length.is_none() {
            if src.len() < HEADER_SIZE {
                return Ok(None);
            }

            let total = src.get_u32();
            self.current_length = Some(payload_length(total, self.max_frame_size)?);
        }

        let Some(length) = self.current_length else {
            return Ok(None);
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let payload = src.split_to(length).freeze();
        self.current_length = None;

        Ok(Some(payload))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let header = header_for(item.len(), self.max_frame_size)?;
        dst.reserve(HEADER_SIZE + item.len());
        dst.put_slice(&header);
        dst.put_slice(&item);
        Ok(())
    }
}

/// Write one frame: the length header followed by the payload.
///
/// # Errors
///
/// Returns `FrameError::TooLarge` if the payload cannot be described by the
/// header, or `FrameError::Io` if the write fails or is cut short.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let header = header_for(payload.len(), u32::MAX as usize - HEADER_SIZE)?;
    writer.write_all(&header).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read exactly one frame header and return the declared PAYLOAD length.
///
/// # Errors
///
/// Returns `FrameError::Io` on a short read and `FrameError::InvalidLength`
/// when the declared total is smaller than the header itself.
pub async fn read_frame_header<R>(reader: &mut R) -> Result<usize, FrameError>
where
    R: AsyncRead + Unpin,
{
    let total = reader.read_u32().await?;
    payload_length(total, usize::MAX)
}

/// Read one complete frame and return its payload.
///
/// The declared length is checked against `max_frame_size` before any payload
/// byte is read.
///
/// # Errors
///
/// Returns `FrameError::TooLarge` for an oversized claim and `FrameError::Io`
/// on a short read.
pub async fn read_frame<R>(reader: &mut R, max_frame_size: usize) -> Result<Vec<u8>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let len = read_frame_header(reader).await?;
    if len > max_frame_size {
        return Err(FrameError::TooLarge {
            size: len,
            max: max_frame_size,
        });
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Errors that can occur while framing
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid frame length: {0} (shorter than the header)")]
    InvalidLength(usize),
}
