use crate::config::{LedgerBackend, LedgerConfig};
use crate::ledger::{InMemoryLedger, JsonFileLedger};
use crate::traits::LedgerStore;
use anyhow::Result;
use std::sync::Arc;

pub async fn create_ledger(config: &LedgerConfig) -> Result<Arc<dyn LedgerStore>> {
    match config.backend {
        LedgerBackend::Memory => Ok(Arc::new(InMemoryLedger::new())),
        LedgerBackend::Json => Ok(Arc::new(JsonFileLedger::open(&config.path).await?)),
    }
}
