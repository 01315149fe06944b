pub mod factory;
pub mod in_memory;
pub mod json_file;

pub use factory::create_ledger;
pub use in_memory::InMemoryLedger;
pub use json_file::JsonFileLedger;

use crate::traits::{
    AggregateRow, Aggregation, GroupValue, LedgerKind, LedgerRecord, NewRecord, RecordFilter,
    SortOrder,
};
use serde::{Deserialize, Serialize};

/// Both collections plus the query engine the backends share.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerBook {
    #[serde(default)]
    pub expenses: Vec<LedgerRecord>,
    #[serde(default)]
    pub income: Vec<LedgerRecord>,
}

impl LedgerBook {
    pub fn records(&self, kind: LedgerKind) -> &[LedgerRecord] {
        match kind {
            LedgerKind::Expense => &self.expenses,
            LedgerKind::Income => &self.income,
        }
    }

    fn records_mut(&mut self, kind: LedgerKind) -> &mut Vec<LedgerRecord> {
        match kind {
            LedgerKind::Expense => &mut self.expenses,
            LedgerKind::Income => &mut self.income,
        }
    }

    pub fn insert(&mut self, kind: LedgerKind, record: NewRecord) -> LedgerRecord {
        let record = record.into_record();
        self.records_mut(kind).push(record.clone());
        record
    }

    pub fn find(&self, kind: LedgerKind, filter: &RecordFilter) -> Vec<LedgerRecord> {
        let mut found: Vec<LedgerRecord> = self
            .records(kind)
            .iter()
            .filter(|r| filter.contains(&r.created_at))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        found
    }

    pub fn aggregate(&self, kind: LedgerKind, aggregation: &Aggregation) -> Vec<AggregateRow> {
        let mut rows: Vec<AggregateRow> = Vec::new();

        for record in self
            .records(kind)
            .iter()
            .filter(|r| aggregation.filter.contains(&r.created_at))
        {
            let key = GroupValue::of(aggregation.group_by, record);
            match rows.iter_mut().find(|row| row.key == key) {
                Some(row) => row.total += record.amount,
                None => rows.push(AggregateRow {
                    key,
                    total: record.amount,
                }),
            }
        }

        match aggregation.sort {
            Some(SortOrder::TotalDescending) => rows.sort_by(|a, b| b.total.total_cmp(&a.total)),
            Some(SortOrder::KeyAscending) => rows.sort_by(|a, b| a.key.cmp(&b.key)),
            None => {}
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::GroupKey;
    use chrono::{TimeZone, Utc};

    fn book() -> LedgerBook {
        let mut book = LedgerBook::default();
        let at = |m, d| Utc.with_ymd_and_hms(2024, m, d, 12, 0, 0).unwrap();
        book.insert(
            LedgerKind::Expense,
            NewRecord::new("Rent", 900.0)
                .at(at(2, 1))
                .with_category(Some("housing".into())),
        );
        book.insert(
            LedgerKind::Expense,
            NewRecord::new("Coffee", 5.0)
                .at(at(1, 3))
                .with_category(Some("food".into())),
        );
        book.insert(
            LedgerKind::Expense,
            NewRecord::new("Lunch", 20.0)
                .at(at(2, 9))
                .with_category(Some("food".into())),
        );
        book.insert(LedgerKind::Expense, NewRecord::new("Misc", 1.0).at(at(3, 9)));
        book
    }

    #[test]
    fn find_returns_oldest_first() {
        let names: Vec<_> = book()
            .find(LedgerKind::Expense, &RecordFilter::all())
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Coffee", "Rent", "Lunch", "Misc"]);
    }

    #[test]
    fn collections_are_separate() {
        let book = book();
        assert!(book.find(LedgerKind::Income, &RecordFilter::all()).is_empty());
    }

    #[test]
    fn category_totals_sort_descending() {
        let rows = book().aggregate(
            LedgerKind::Expense,
            &Aggregation::group_by(GroupKey::Category).sorted(SortOrder::TotalDescending),
        );
        assert_eq!(
            rows,
            vec![
                AggregateRow {
                    key: GroupValue::Category(Some("housing".into())),
                    total: 900.0
                },
                AggregateRow {
                    key: GroupValue::Category(Some("food".into())),
                    total: 25.0
                },
                AggregateRow {
                    key: GroupValue::Category(None),
                    total: 1.0
                },
            ]
        );
    }

    #[test]
    fn stored_categories_group_by_normalized_key() {
        let mut book = book();
        let mut raw = NewRecord::new("Imported", 2.0).into_record();
        raw.category = Some(" Uncategorized".into());
        book.expenses.push(raw);
        let mut raw = NewRecord::new("Snack", 3.0).into_record();
        raw.category = Some("FOOD".into());
        book.expenses.push(raw);

        let rows = book.aggregate(
            LedgerKind::Expense,
            &Aggregation::group_by(GroupKey::Category).sorted(SortOrder::TotalDescending),
        );
        let totals: Vec<_> = rows.iter().map(|r| (r.key.clone(), r.total)).collect();
        assert_eq!(
            totals,
            vec![
                (GroupValue::Category(Some("housing".into())), 900.0),
                (GroupValue::Category(Some("food".into())), 28.0),
                (GroupValue::Category(None), 3.0),
            ]
        );
    }

    #[test]
    fn month_totals_sort_ascending() {
        let rows = book().aggregate(
            LedgerKind::Expense,
            &Aggregation::group_by(GroupKey::Month).sorted(SortOrder::KeyAscending),
        );
        let months: Vec<_> = rows.iter().map(|r| (r.key.clone(), r.total)).collect();
        assert_eq!(
            months,
            vec![
                (GroupValue::Month(1), 5.0),
                (GroupValue::Month(2), 920.0),
                (GroupValue::Month(3), 1.0),
            ]
        );
    }

    #[test]
    fn empty_collection_aggregates_to_no_rows() {
        let rows = LedgerBook::default().aggregate(LedgerKind::Income, &Aggregation::sum_all());
        assert!(rows.is_empty());
    }
}
