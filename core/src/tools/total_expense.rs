use crate::tools::{extract_date_range, format_amount};
use crate::traits::{LedgerKind, LedgerStore, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct TotalExpenseTool {
    ledger: Arc<dyn LedgerStore>,
    currency: String,
}

impl TotalExpenseTool {
    pub fn new(ledger: Arc<dyn LedgerStore>, currency: impl Into<String>) -> Self {
        Self {
            ledger,
            currency: currency.into(),
        }
    }
}

#[async_trait]
impl Tool for TotalExpenseTool {
    fn name(&self) -> &str {
        "getTotalExpense"
    }

    fn description(&self) -> &str {
        "Get total expense from date to date. Omit both dates for the full history."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "from": {
                    "type": "string",
                    "description": "From date to get the expense (inclusive)."
                },
                "to": {
                    "type": "string",
                    "description": "To date to get the expense (inclusive)."
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filter = extract_date_range(&args, "from", "to")?;
        let expenses = self.ledger.find(LedgerKind::Expense, &filter).await?;
        let total: f64 = expenses.iter().map(|e| e.amount).sum();

        Ok(ToolResult::success(format_amount(total, &self.currency)))
    }
}
