use crate::ledger::LedgerBook;
use crate::traits::{
    AggregateRow, Aggregation, LedgerKind, LedgerRecord, LedgerStore, NewRecord, RecordFilter,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

/// Ledger persisted as a single JSON document. The whole file is replaced
/// after each insert.
pub struct JsonFileLedger {
    path: PathBuf,
    book: RwLock<LedgerBook>,
}

impl JsonFileLedger {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let book = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => LedgerBook::default(),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse ledger at {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerBook::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read ledger at {}", path.display()));
            }
        };

        tracing::debug!(
            "Opened ledger {} ({} expenses, {} income)",
            path.display(),
            book.expenses.len(),
            book.income.len()
        );

        Ok(Self {
            path,
            book: RwLock::new(book),
        })
    }

    /// Writes a sibling temp file, then renames it over the ledger. The
    /// ledger path only ever holds a complete document.
    async fn save(&self, book: &LedgerBook) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let content = serde_json::to_vec_pretty(book).context("Failed to serialize ledger")?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)
                .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
            tmp.write_all(&content)
                .and_then(|()| tmp.as_file().sync_all())
                .context("Failed to write ledger temp file")?;
            tmp.persist(&path)
                .map_err(|e| e.error)
                .with_context(|| format!("Failed to write ledger to {}", path.display()))?;
            Ok(())
        })
        .await
        .context("Ledger writer task failed")?
    }
}

#[async_trait]
impl LedgerStore for JsonFileLedger {
    fn name(&self) -> &str {
        "json"
    }

    async fn insert(&self, kind: LedgerKind, record: NewRecord) -> Result<LedgerRecord> {
        let mut book = self.book.write().await;
        let mut updated = book.clone();
        let inserted = updated.insert(kind, record);
        self.save(&updated).await?;
        *book = updated;
        Ok(inserted)
    }

    async fn find(&self, kind: LedgerKind, filter: &RecordFilter) -> Result<Vec<LedgerRecord>> {
        Ok(self.book.read().await.find(kind, filter))
    }

    async fn aggregate(
        &self,
        kind: LedgerKind,
        aggregation: &Aggregation,
    ) -> Result<Vec<AggregateRow>> {
        Ok(self.book.read().await.aggregate(kind, aggregation))
    }
}
