use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Bound;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Expense,
    Income,
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Category bucket for records that carry none.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Canonical category key: trimmed and lowercased. Blank and
/// `"uncategorized"` both collapse to `None` so they share one bucket.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && c != UNCATEGORIZED)
}

/// A record as submitted for insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub category: Option<String>,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            created_at: Utc::now(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = normalize_category(category.as_deref());
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn into_record(self) -> LedgerRecord {
        LedgerRecord {
            id: Uuid::new_v4(),
            name: self.name,
            amount: self.amount,
            created_at: self.created_at,
            category: self.category,
        }
    }
}

/// Date window over `createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFilter {
    pub start: Bound<DateTime<Utc>>,
    pub end: Bound<DateTime<Utc>>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl RecordFilter {
    pub fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    pub fn new(start: Bound<DateTime<Utc>>, end: Bound<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// `[Jan 1 of year, Jan 1 of year + 1)`. `None` if the year is out of
    /// chrono's range.
    pub fn calendar_year(year: i32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
        let end = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single()?;
        Some(Self {
            start: Bound::Included(start),
            end: Bound::Excluded(end),
        })
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        let after_start = match &self.start {
            Bound::Included(start) => at >= start,
            Bound::Excluded(start) => at > start,
            Bound::Unbounded => true,
        };
        let before_end = match &self.end {
            Bound::Included(end) => at <= end,
            Bound::Excluded(end) => at < end,
            Bound::Unbounded => true,
        };
        after_start && before_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// A single group over every matching record.
    All,
    Category,
    /// Calendar month (1-12) of `createdAt`.
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    TotalDescending,
    KeyAscending,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupValue {
    All,
    Category(Option<String>),
    Month(u32),
}

impl GroupValue {
    pub fn of(key: GroupKey, record: &LedgerRecord) -> Self {
        match key {
            GroupKey::All => Self::All,
            GroupKey::Category => {
                Self::Category(normalize_category(record.category.as_deref()))
            }
            GroupKey::Month => Self::Month(record.created_at.month()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: GroupValue,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub group_by: GroupKey,
    pub filter: RecordFilter,
    pub sort: Option<SortOrder>,
}

impl Aggregation {
    pub fn sum_all() -> Self {
        Self {
            group_by: GroupKey::All,
            filter: RecordFilter::all(),
            sort: None,
        }
    }

    pub fn group_by(group_by: GroupKey) -> Self {
        Self {
            group_by,
            filter: RecordFilter::all(),
            sort: None,
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Two record collections (expense, income) with insert, ranged find and
/// grouped sums. Every call is an independent operation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    fn name(&self) -> &str;

    async fn insert(&self, kind: LedgerKind, record: NewRecord) -> anyhow::Result<LedgerRecord>;

    /// Matching records, oldest first.
    async fn find(&self, kind: LedgerKind, filter: &RecordFilter)
    -> anyhow::Result<Vec<LedgerRecord>>;

    /// Grouped sums. No matching records yields an empty vector, not an error.
    async fn aggregate(
        &self,
        kind: LedgerKind,
        aggregation: &Aggregation,
    ) -> anyhow::Result<Vec<AggregateRow>>;
}
