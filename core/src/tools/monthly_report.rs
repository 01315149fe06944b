use crate::tools::extract_year_arg;
use crate::traits::{
    Aggregation, GroupKey, GroupValue, LedgerKind, LedgerStore, RecordFilter, SortOrder, Tool,
    ToolError, ToolResult,
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct MonthTotal {
    month: u32,
    total: f64,
}

pub struct MonthlyExpenseReportTool {
    ledger: Arc<dyn LedgerStore>,
}

impl MonthlyExpenseReportTool {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for MonthlyExpenseReportTool {
    fn name(&self) -> &str {
        "getMonthlyExpenseReport"
    }

    fn description(&self) -> &str {
        "Get monthly expense report for year."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "year": {
                    "type": "string",
                    "description": "Calendar year, e.g. 2024."
                }
            },
            "required": ["year"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let year = extract_year_arg(&args, "year")?;
        let filter = RecordFilter::calendar_year(year)
            .ok_or_else(|| ToolError::invalid("year", format!("year {} is out of range", year)))?;

        let aggregation = Aggregation::group_by(GroupKey::Month)
            .with_filter(filter)
            .sorted(SortOrder::KeyAscending);
        let rows = self
            .ledger
            .aggregate(LedgerKind::Expense, &aggregation)
            .await?;

        let report: Vec<MonthTotal> = rows
            .into_iter()
            .filter_map(|row| match row.key {
                GroupValue::Month(month) => Some(MonthTotal {
                    month,
                    total: row.total,
                }),
                _ => None,
            })
            .collect();

        let text = serde_json::to_string_pretty(&report).context("Failed to render report")?;
        Ok(ToolResult::success(text))
    }
}
