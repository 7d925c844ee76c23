use async_trait::async_trait;
use ipld_core::cid::Cid;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use crate::StoreError;

/// A content-addressed store that accepts blocks by CID and hands them back.
///
/// The login flow only uses it to verify that an encoded CACAO survives a
/// put/get round trip; nothing it stores is required to build the archive.
#[async_trait]
pub trait BlockStore {
    /// Store `bytes` under `cid`.
    async fn put(&mut self, cid: &Cid, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Retrieve the bytes stored under `cid`, if any.
    async fn get(&self, cid: &Cid) -> Result<Option<Vec<u8>>, StoreError>;
}

/// A trivial implementation of [BlockStore] - backed by a [HashMap] - where
/// all blocks are kept in memory and never persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlockStore {
    entries: Arc<RwLock<HashMap<Cid, Vec<u8>>>>,
}

impl MemoryBlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blocks.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn put(&mut self, cid: &Cid, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(*cid, bytes);
        Ok(())
    }

    async fn get(&self, cid: &Cid) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(cid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacao::Block;
    use testresult::TestResult;

    #[tokio::test]
    async fn it_writes_and_reads_block() -> TestResult {
        let mut store = MemoryBlockStore::new();
        let block = Block::encode(&"hello")?;

        store.put(block.cid(), block.bytes().to_vec()).await?;

        assert_eq!(store.get(block.cid()).await?, Some(block.bytes().to_vec()));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn it_returns_none_for_missing_cid() -> TestResult {
        let store = MemoryBlockStore::new();
        let block = Block::encode(&42u64)?;

        assert_eq!(store.get(block.cid()).await?, None);
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn it_shares_entries_between_clones() -> TestResult {
        let mut writer = MemoryBlockStore::new();
        let reader = writer.clone();
        let block = Block::encode(&"shared")?;

        writer.put(block.cid(), block.bytes().to_vec()).await?;

        assert!(reader.get(block.cid()).await?.is_some());
        Ok(())
    }
}
