use crate::tools::extract_date_range;
use crate::traits::{
    Aggregation, GroupKey, GroupValue, LedgerKind, LedgerStore, SortOrder, Tool, ToolError,
    ToolResult, UNCATEGORIZED,
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct CategoryTotal {
    category: String,
    total: f64,
}

pub struct ExpenseByCategoryTool {
    ledger: Arc<dyn LedgerStore>,
}

impl ExpenseByCategoryTool {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for ExpenseByCategoryTool {
    fn name(&self) -> &str {
        "getExpenseByCategory"
    }

    fn description(&self) -> &str {
        "Get expense grouped by category, largest first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "from": {
                    "type": "string",
                    "description": "Optional start date (inclusive)."
                },
                "to": {
                    "type": "string",
                    "description": "Optional end date (inclusive)."
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filter = extract_date_range(&args, "from", "to")?;
        let aggregation = Aggregation::group_by(GroupKey::Category)
            .with_filter(filter)
            .sorted(SortOrder::TotalDescending);

        let rows = self
            .ledger
            .aggregate(LedgerKind::Expense, &aggregation)
            .await?;

        let report: Vec<CategoryTotal> = rows
            .into_iter()
            .map(|row| CategoryTotal {
                category: match row.key {
                    GroupValue::Category(Some(category)) => category,
                    _ => UNCATEGORIZED.to_string(),
                },
                total: row.total,
            })
            .collect();

        let text = serde_json::to_string_pretty(&report).context("Failed to render report")?;
        Ok(ToolResult::success(text))
    }
}
