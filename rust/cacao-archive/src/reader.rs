use cacao::Block;
use ipld_core::cid::Cid;

use crate::{ARCHIVE_VERSION, ArchiveError, ArchiveHeader};

/// A fully replayed archive: its declared roots and every block it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    roots: Vec<Cid>,
    blocks: Vec<Block>,
}

impl Archive {
    /// Replay an archive from its complete byte sequence.
    ///
    /// Every block is checked against its CID, and every declared root must
    /// be present, so a successful read means the roots can be
    /// reconstructed without any outside context.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::Malformed`] for truncated framing, an undecodable
    ///   header, an unsupported version or an unreadable CID
    /// - [`ArchiveError::Block`] if a block's bytes do not match its CID
    /// - [`ArchiveError::MissingRoot`] if a root has no block
    pub fn read(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut cursor = bytes;

        let header = next_section(&mut cursor)?;
        let header: ArchiveHeader = serde_ipld_dagcbor::from_slice(header)
            .map_err(|error| ArchiveError::Malformed(format!("invalid header: {error}")))?;
        if header.version != ARCHIVE_VERSION {
            return Err(ArchiveError::Malformed(format!(
                "unsupported version {}",
                header.version
            )));
        }
        if header.roots.is_empty() {
            return Err(ArchiveError::NoRoots);
        }

        let mut blocks = Vec::new();
        while !cursor.is_empty() {
            let mut section = next_section(&mut cursor)?;
            let cid = Cid::read_bytes(&mut section)
                .map_err(|error| ArchiveError::Malformed(format!("invalid CID: {error}")))?;
            blocks.push(Block::from_parts(cid, section.to_vec())?);
        }

        let archive = Self {
            roots: header.roots,
            blocks,
        };
        if let Some(root) = archive
            .roots
            .iter()
            .find(|root| archive.get(root).is_none())
        {
            return Err(ArchiveError::MissingRoot(*root));
        }

        Ok(archive)
    }

    /// The roots declared in the header.
    pub fn roots(&self) -> &[Cid] {
        &self.roots
    }

    /// Blocks in the order they were written.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by CID.
    pub fn get(&self, cid: &Cid) -> Option<&Block> {
        self.blocks.iter().find(|block| block.cid() == cid)
    }
}

/// Split one length-prefixed section off the front of `cursor`.
fn next_section<'a>(cursor: &mut &'a [u8]) -> Result<&'a [u8], ArchiveError> {
    let length = leb128::read::unsigned(cursor)
        .map_err(|error| ArchiveError::Malformed(format!("invalid length prefix: {error}")))?;
    let length = usize::try_from(length)
        .map_err(|_| ArchiveError::Malformed(format!("section of {length} bytes")))?;
    if length > cursor.len() {
        return Err(ArchiveError::Malformed(format!(
            "section of {length} bytes, only {} remain",
            cursor.len()
        )));
    }

    let remaining: &'a [u8] = *cursor;
    let (section, rest) = remaining.split_at(length);
    *cursor = rest;
    Ok(section)
}
