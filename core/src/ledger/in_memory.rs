use crate::ledger::LedgerBook;
use crate::traits::{
    AggregateRow, Aggregation, LedgerKind, LedgerRecord, LedgerStore, NewRecord, RecordFilter,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-lifetime ledger. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: RwLock<LedgerBook>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, kind: LedgerKind, record: NewRecord) -> anyhow::Result<LedgerRecord> {
        Ok(self.book.write().await.insert(kind, record))
    }

    async fn find(
        &self,
        kind: LedgerKind,
        filter: &RecordFilter,
    ) -> anyhow::Result<Vec<LedgerRecord>> {
        Ok(self.book.read().await.find(kind, filter))
    }

    async fn aggregate(
        &self,
        kind: LedgerKind,
        aggregation: &Aggregation,
    ) -> anyhow::Result<Vec<AggregateRow>> {
        Ok(self.book.read().await.aggregate(kind, aggregation))
    }
}
