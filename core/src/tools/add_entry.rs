use crate::tools::{extract_amount_arg, extract_string_arg, extract_string_arg_opt, format_amount};
use crate::traits::{LedgerKind, LedgerStore, NewRecord, Tool, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// `addExpense` / `addIncome`: one insert into the matching ledger.
pub struct AddEntryTool {
    ledger: Arc<dyn LedgerStore>,
    kind: LedgerKind,
    currency: String,
}

impl AddEntryTool {
    pub fn new(ledger: Arc<dyn LedgerStore>, kind: LedgerKind, currency: impl Into<String>) -> Self {
        Self {
            ledger,
            kind,
            currency: currency.into(),
        }
    }
}

#[async_trait]
impl Tool for AddEntryTool {
    fn name(&self) -> &str {
        match self.kind {
            LedgerKind::Expense => "addExpense",
            LedgerKind::Income => "addIncome",
        }
    }

    fn description(&self) -> &str {
        match self.kind {
            LedgerKind::Expense => "Add new expense entry to the expense database.",
            LedgerKind::Income => "Add new income entry to the income database.",
        }
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let (name_hint, amount_hint) = match self.kind {
            LedgerKind::Expense => (
                "Name of the expense. e.g., Bought an iphone",
                "Amount of the expense.",
            ),
            LedgerKind::Income => ("Name of the income. e.g., Got salary", "Amount of the income."),
        };

        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": name_hint
                },
                "amount": {
                    "type": "string",
                    "description": amount_hint
                },
                "category": {
                    "type": "string",
                    "description": "Optional category, e.g. food, rent, travel."
                }
            },
            "required": ["name", "amount"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let name = extract_string_arg(&args, "name")?;
        let amount = extract_amount_arg(&args, "amount")?;
        let category = extract_string_arg_opt(&args, "category")?;

        let record = self
            .ledger
            .insert(self.kind, NewRecord::new(name, amount).with_category(category))
            .await?;

        tracing::debug!("Inserted {} record {}", self.kind, record.id);

        Ok(ToolResult::success(format!(
            "Added to the {} database: {} ({}).",
            self.kind,
            record.name,
            format_amount(record.amount, &self.currency)
        )))
    }
}
