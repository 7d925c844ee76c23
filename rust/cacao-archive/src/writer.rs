use cacao::Block;
use ipld_core::cid::Cid;
use std::{collections::HashSet, fmt};

use crate::{ArchiveError, ArchiveHeader, ArchiveSink, ArchiveStream, ChunkSender, to_base64url};

/// Lifecycle of an [`ArchiveWriter`].
///
/// A writer is `Writing` as soon as [`ArchiveWriter::create`] has emitted the
/// header, and becomes `Closed` after a successful [`ArchiveWriter::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    /// Accepting blocks; `blocks` have been written so far.
    Writing {
        /// Blocks written so far
        blocks: usize,
    },
    /// Finalized; `blocks` were written in total.
    Closed {
        /// Blocks written in total
        blocks: usize,
    },
}

impl fmt::Display for ArchiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveState::Writing { blocks } => write!(f, "writing ({blocks} blocks)"),
            ArchiveState::Closed { blocks } => write!(f, "closed ({blocks} blocks)"),
        }
    }
}

/// Streams a CARv1 archive into an [`ArchiveSink`].
///
/// Every declared root must be [`put`][ArchiveWriter::put] before the
/// archive can be closed, so a closed archive is always self-contained.
pub struct ArchiveWriter<S: ArchiveSink> {
    sink: S,
    roots: Vec<Cid>,
    written: HashSet<Cid>,
    state: ArchiveState,
}

impl<S: ArchiveSink> ArchiveWriter<S> {
    /// Emit the header declaring `roots` into `sink` and start writing.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NoRoots`] for an empty root list, or the
    /// sink's error if the header cannot be delivered.
    pub fn create(roots: Vec<Cid>, mut sink: S) -> Result<Self, ArchiveError> {
        if roots.is_empty() {
            return Err(ArchiveError::NoRoots);
        }

        let header = serde_ipld_dagcbor::to_vec(&ArchiveHeader::new(roots.clone()))
            .map_err(|error| ArchiveError::Encoding(format!("{error}")))?;
        sink.send(frame(&[&header])?)?;

        tracing::debug!(roots = roots.len(), "archive created");

        Ok(Self {
            sink,
            roots,
            written: HashSet::new(),
            state: ArchiveState::Writing { blocks: 0 },
        })
    }

    /// Append one block as a single chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidState`] once the archive is closed, or
    /// the sink's error if the chunk cannot be delivered.
    pub fn put(&mut self, block: &Block) -> Result<(), ArchiveError> {
        let ArchiveState::Writing { blocks } = self.state else {
            return Err(ArchiveError::InvalidState {
                operation: "put",
                state: self.state,
            });
        };

        let cid = block.cid().to_bytes();
        self.sink.send(frame(&[&cid, block.bytes()])?)?;
        self.written.insert(*block.cid());
        self.state = ArchiveState::Writing { blocks: blocks + 1 };

        tracing::debug!(cid = %block.cid(), length = block.bytes().len(), "archive block written");
        Ok(())
    }

    /// Finalize the archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidState`] if already closed, and
    /// [`ArchiveError::MissingRoot`] if a declared root was never written
    /// (the writer stays open in that case).
    pub fn close(&mut self) -> Result<(), ArchiveError> {
        let ArchiveState::Writing { blocks } = self.state else {
            return Err(ArchiveError::InvalidState {
                operation: "close",
                state: self.state,
            });
        };

        if let Some(root) = self.roots.iter().find(|root| !self.written.contains(*root)) {
            return Err(ArchiveError::MissingRoot(*root));
        }

        self.sink.finish()?;
        self.state = ArchiveState::Closed { blocks };

        tracing::debug!(blocks, "archive closed");
        Ok(())
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ArchiveState {
        self.state
    }

    /// The roots declared in the header.
    pub fn roots(&self) -> &[Cid] {
        &self.roots
    }

    /// Give up the writer and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl ArchiveWriter<Vec<u8>> {
    /// A writer that buffers the archive in memory.
    ///
    /// # Errors
    ///
    /// See [`ArchiveWriter::create`].
    pub fn in_memory(roots: Vec<Cid>) -> Result<Self, ArchiveError> {
        Self::create(roots, Vec::new())
    }
}

impl ArchiveWriter<ChunkSender> {
    /// A writer whose chunks are delivered to the returned stream as they
    /// are produced. The stream ends when the writer is closed.
    ///
    /// # Errors
    ///
    /// See [`ArchiveWriter::create`].
    pub fn streaming(roots: Vec<Cid>) -> Result<(Self, ArchiveStream), ArchiveError> {
        let (sender, stream) = ChunkSender::channel();
        Ok((Self::create(roots, sender)?, stream))
    }
}

/// Write `root` followed by `dependencies` into an in-memory archive.
///
/// # Errors
///
/// Propagates any [`ArchiveWriter`] error.
pub fn write_archive<'a, I>(root: &Block, dependencies: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut writer = ArchiveWriter::in_memory(vec![*root.cid()])?;
    writer.put(root)?;
    for block in dependencies {
        writer.put(block)?;
    }
    writer.close()?;
    Ok(writer.into_sink())
}

/// [`write_archive`], then encode the bytes as unpadded base64url text.
///
/// # Errors
///
/// Propagates any [`ArchiveWriter`] error.
pub fn encode_archive<'a, I>(root: &Block, dependencies: I) -> Result<String, ArchiveError>
where
    I: IntoIterator<Item = &'a Block>,
{
    Ok(to_base64url(&write_archive(root, dependencies)?))
}

/// Prefix the concatenation of `parts` with its LEB128 length.
fn frame(parts: &[&[u8]]) -> Result<Vec<u8>, ArchiveError> {
    let length: usize = parts.iter().map(|part| part.len()).sum();
    let mut chunk = Vec::with_capacity(length + 10);
    leb128::write::unsigned(&mut chunk, length as u64)?;
    for part in parts {
        chunk.extend_from_slice(part);
    }
    Ok(chunk)
}
