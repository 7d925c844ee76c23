use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::io::Write;

use crate::ArchiveError;

/// Destination for the chunks an [`ArchiveWriter`][crate::ArchiveWriter]
/// emits.
///
/// Each call to [`ArchiveSink::send`] carries one complete frame (the header
/// or one block section). Concatenating every chunk in order yields the
/// archive.
pub trait ArchiveSink {
    /// Accept the next chunk.
    fn send(&mut self, chunk: Vec<u8>) -> Result<(), ArchiveError>;

    /// Called once when the archive is closed.
    fn finish(&mut self) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Buffers the whole archive in memory.
impl ArchiveSink for Vec<u8> {
    fn send(&mut self, chunk: Vec<u8>) -> Result<(), ArchiveError> {
        self.extend_from_slice(&chunk);
        Ok(())
    }
}

/// Adapts any [`Write`] into an [`ArchiveSink`], flushing on close.
#[derive(Debug)]
pub struct WriteSink<W: Write>(W);

impl<W: Write> WriteSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self(writer)
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> ArchiveSink for WriteSink<W> {
    fn send(&mut self, chunk: Vec<u8>) -> Result<(), ArchiveError> {
        self.0.write_all(&chunk)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        self.0.flush()?;
        Ok(())
    }
}

/// The consuming half of a streamed archive: a [`Stream`][futures::Stream]
/// of chunks that ends when the writer is closed.
pub type ArchiveStream = UnboundedReceiver<Vec<u8>>;

/// Forwards chunks over a channel to an [`ArchiveStream`].
#[derive(Debug, Clone)]
pub struct ChunkSender(UnboundedSender<Vec<u8>>);

impl ChunkSender {
    /// Create a connected sender and stream.
    pub fn channel() -> (Self, ArchiveStream) {
        let (sender, receiver) = unbounded();
        (Self(sender), receiver)
    }
}

impl ArchiveSink for ChunkSender {
    fn send(&mut self, chunk: Vec<u8>) -> Result<(), ArchiveError> {
        self.0
            .unbounded_send(chunk)
            .map_err(|_| ArchiveError::SinkClosed)
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        self.0.close_channel();
        Ok(())
    }
}
