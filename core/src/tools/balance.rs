use crate::tools::format_amount;
use crate::traits::{Aggregation, LedgerKind, LedgerStore, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct MoneyBalanceTool {
    ledger: Arc<dyn LedgerStore>,
    currency: String,
}

impl MoneyBalanceTool {
    pub fn new(ledger: Arc<dyn LedgerStore>, currency: impl Into<String>) -> Self {
        Self {
            ledger,
            currency: currency.into(),
        }
    }

    // An empty ledger aggregates to no rows; that counts as zero.
    async fn total(&self, kind: LedgerKind) -> anyhow::Result<f64> {
        let rows = self.ledger.aggregate(kind, &Aggregation::sum_all()).await?;
        Ok(rows.first().map(|row| row.total).unwrap_or(0.0))
    }
}

#[async_trait]
impl Tool for MoneyBalanceTool {
    fn name(&self) -> &str {
        "getMoneyBalance"
    }

    fn description(&self) -> &str {
        "Get remaining money balance from database."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let income = self.total(LedgerKind::Income).await?;
        let expense = self.total(LedgerKind::Expense).await?;

        Ok(ToolResult::success(format_amount(
            income - expense,
            &self.currency,
        )))
    }
}
