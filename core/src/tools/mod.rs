use crate::agent::ToolRegistry;
use crate::traits::{LedgerKind, LedgerStore, RecordFilter, ToolError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use std::ops::Bound;
use std::sync::Arc;

pub mod add_entry;
pub mod balance;
pub mod category_report;
pub mod monthly_report;
pub mod total_expense;

pub use add_entry::AddEntryTool;
pub use balance::MoneyBalanceTool;
pub use category_report::ExpenseByCategoryTool;
pub use monthly_report::MonthlyExpenseReportTool;
pub use total_expense::TotalExpenseTool;

/// Registers the six ledger tools in the order they are advertised to the
/// model.
pub fn register_finance_tools(
    registry: &mut ToolRegistry,
    ledger: Arc<dyn LedgerStore>,
    currency: &str,
) -> anyhow::Result<()> {
    registry.register(Box::new(TotalExpenseTool::new(ledger.clone(), currency)))?;
    registry.register(Box::new(AddEntryTool::new(
        ledger.clone(),
        LedgerKind::Expense,
        currency,
    )))?;
    registry.register(Box::new(AddEntryTool::new(
        ledger.clone(),
        LedgerKind::Income,
        currency,
    )))?;
    registry.register(Box::new(MoneyBalanceTool::new(ledger.clone(), currency)))?;
    registry.register(Box::new(ExpenseByCategoryTool::new(ledger.clone())))?;
    registry.register(Box::new(MonthlyExpenseReportTool::new(ledger)))?;
    Ok(())
}

fn present<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

pub fn extract_string_arg(args: &Value, key: &str) -> Result<String, ToolError> {
    match present(args, key) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(ToolError::invalid(
            key,
            format!("expected a string, got {}", other),
        )),
        None => Err(ToolError::invalid(key, "missing required parameter")),
    }
}

pub fn extract_string_arg_opt(args: &Value, key: &str) -> Result<Option<String>, ToolError> {
    if present(args, key).is_none() {
        return Ok(None);
    }
    extract_string_arg(args, key).map(Some)
}

/// Amounts arrive as text or numbers; both must coerce to a finite,
/// non-negative value.
pub fn extract_amount_arg(args: &Value, key: &str) -> Result<f64, ToolError> {
    let value =
        present(args, key).ok_or_else(|| ToolError::invalid(key, "missing required parameter"))?;

    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|a| a.is_finite())
    .ok_or_else(|| ToolError::invalid(key, format!("{} is not a number", value)))?;

    if amount < 0.0 {
        return Err(ToolError::invalid(key, "amount must not be negative"));
    }

    Ok(amount)
}

// `2024.0` is a year; `2024.5` is not.
fn whole_number(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0).then_some(n as i64)
}

pub fn extract_year_arg(args: &Value, key: &str) -> Result<i32, ToolError> {
    let value =
        present(args, key).ok_or_else(|| ToolError::invalid(key, "missing required parameter"))?;

    let year = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    }
    .ok_or_else(|| ToolError::invalid(key, format!("{} is not a year", value)))?;

    if !(1..=9999).contains(&year) {
        return Err(ToolError::invalid(key, format!("year {} is out of range", year)));
    }

    i32::try_from(year)
        .map_err(|_| ToolError::invalid(key, format!("year {} is out of range", year)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

fn parse_date_bound(
    key: &str,
    raw: &str,
    edge: Edge,
) -> Result<Bound<DateTime<Utc>>, ToolError> {
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Bound::Included(at.with_timezone(&Utc)));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Bound::Included(at.and_utc()));
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ToolError::invalid(
            key,
            format!("'{}' is not a date (expected YYYY-MM-DD or RFC 3339)", raw),
        )
    })?;

    match edge {
        Edge::Start => Ok(Bound::Included(date.and_time(NaiveTime::MIN).and_utc())),
        // A bare end date covers the whole day.
        Edge::End => date
            .succ_opt()
            .map(|next| Bound::Excluded(next.and_time(NaiveTime::MIN).and_utc()))
            .ok_or_else(|| ToolError::invalid(key, format!("'{}' is out of range", raw))),
    }
}

/// Inclusive `from`/`to` window; either side may be omitted.
pub fn extract_date_range(
    args: &Value,
    from_key: &str,
    to_key: &str,
) -> Result<RecordFilter, ToolError> {
    let start = match extract_string_arg_opt(args, from_key)? {
        Some(raw) => parse_date_bound(from_key, &raw, Edge::Start)?,
        None => Bound::Unbounded,
    };
    let end = match extract_string_arg_opt(args, to_key)? {
        Some(raw) => parse_date_bound(to_key, &raw, Edge::End)?,
        None => Bound::Unbounded,
    };
    Ok(RecordFilter::new(start, end))
}

pub fn format_amount(amount: f64, currency: &str) -> String {
    let amount = if amount == 0.0 { 0.0 } else { amount };
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{:.0} {}", amount, currency)
    } else {
        format!("{:.2} {}", amount, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn amount_accepts_text_and_numbers() {
        assert_eq!(extract_amount_arg(&json!({"amount": "150"}), "amount").unwrap(), 150.0);
        assert_eq!(extract_amount_arg(&json!({"amount": 12.5}), "amount").unwrap(), 12.5);
        assert_eq!(
            extract_amount_arg(&json!({"amount": " 1,500 "}), "amount").unwrap(),
            1500.0
        );
    }

    #[test]
    fn amount_rejects_garbage() {
        for bad in [json!("abc"), json!("NaN"), json!("inf"), json!(true), json!(-5)] {
            let err = extract_amount_arg(&json!({ "amount": bad.clone() }), "amount").unwrap_err();
            assert!(matches!(err, ToolError::InvalidArgument { .. }), "{bad}");
        }
        assert!(extract_amount_arg(&json!({}), "amount").is_err());
        assert!(extract_amount_arg(&json!({"amount": ""}), "amount").is_err());
    }

    #[test]
    fn year_accepts_text_and_numbers() {
        assert_eq!(extract_year_arg(&json!({"year": "2024"}), "year").unwrap(), 2024);
        assert_eq!(extract_year_arg(&json!({"year": 1999}), "year").unwrap(), 1999);
        assert!(extract_year_arg(&json!({"year": "last year"}), "year").is_err());
        assert!(extract_year_arg(&json!({"year": 0}), "year").is_err());
    }

    #[test]
    fn year_accepts_whole_floats_only() {
        assert_eq!(extract_year_arg(&json!({"year": 2024.0}), "year").unwrap(), 2024);
        assert_eq!(extract_year_arg(&json!({"year": "2024.0"}), "year").unwrap(), 2024);
        assert!(extract_year_arg(&json!({"year": 2024.5}), "year").is_err());
        assert!(extract_year_arg(&json!({"year": 1e300}), "year").is_err());
    }

    #[test]
    fn string_arg_rejects_non_strings() {
        assert!(extract_string_arg(&json!({"name": 5}), "name").is_err());
        assert_eq!(
            extract_string_arg(&json!({"name": " Coffee "}), "name").unwrap(),
            "Coffee"
        );
        assert_eq!(extract_string_arg_opt(&json!({"category": null}), "category").unwrap(), None);
    }

    #[test]
    fn date_only_end_covers_whole_day() {
        let filter =
            extract_date_range(&json!({"from": "2024-03-01", "to": "2024-03-31"}), "from", "to")
                .unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(filter.contains(&start));
        assert!(filter.contains(&late));
        assert!(!filter.contains(&after));
    }

    #[test]
    fn timestamps_are_inclusive() {
        let filter = extract_date_range(
            &json!({"from": "2024-03-01T10:00:00", "to": "2024-03-01T12:00:00Z"}),
            "from",
            "to",
        )
        .unwrap();
        assert!(filter.contains(&Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert!(!filter.contains(&Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap()));
    }

    #[test]
    fn missing_bounds_are_open() {
        assert_eq!(extract_date_range(&json!({}), "from", "to").unwrap(), RecordFilter::all());
        let only_to = extract_date_range(&json!({"from": "", "to": "2024-01-01"}), "from", "to")
            .unwrap();
        assert_eq!(only_to.start, Bound::Unbounded);
    }

    #[test]
    fn malformed_date_is_invalid_argument() {
        let err = extract_date_range(&json!({"from": "yesterday"}), "from", "to").unwrap_err();
        assert!(err.to_string().contains("from"));
    }

    #[test]
    fn amounts_format_without_needless_decimals() {
        assert_eq!(format_amount(150.0, "INR"), "150 INR");
        assert_eq!(format_amount(12.5, "INR"), "12.50 INR");
        assert_eq!(format_amount(-40.0, "USD"), "-40 USD");
        assert_eq!(format_amount(-0.0, "INR"), "0 INR");
    }
}
