//! The unified transaction record every bank format is converted into.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Column names of the unified schema, in export order.
pub const FIELD_NAMES: [&str; 6] = [
    "source",
    "timestamp",
    "type",
    "amount",
    "transfer_from",
    "transfer_to",
];

/// Represents a single transaction in the unified schema.
///
/// Field order matches [`FIELD_NAMES`] and is the column order on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedRecord {
    /// Identifier of the file the record was read from.
    pub source: String,

    /// Date of the transaction.
    pub timestamp: NaiveDate,

    /// Transaction kind, passed through untouched (e.g. "add", "remove").
    pub kind: String,

    /// Transaction amount.
    pub amount: Decimal,

    /// Account the money is moved from.
    pub transfer_from: String,

    /// Account the money is moved to.
    pub transfer_to: String,
}

impl UnifiedRecord {
    /// Create a record from its six fields.
    pub fn new(
        source: impl Into<String>,
        timestamp: NaiveDate,
        kind: impl Into<String>,
        amount: Decimal,
        transfer_from: impl Into<String>,
        transfer_to: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            timestamp,
            kind: kind.into(),
            amount,
            transfer_from: transfer_from.into(),
            transfer_to: transfer_to.into(),
        }
    }

    /// Render the record as display strings in canonical field order.
    pub fn to_fields(&self) -> [String; 6] {
        ExportRecord::from(self).into_fields()
    }
}

/// Output row of a [`UnifiedRecord`], every field already formatted.
///
/// Serialized field names form the output header, see [`FIELD_NAMES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub source: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub transfer_from: String,
    pub transfer_to: String,
}

impl From<&UnifiedRecord> for ExportRecord {
    /// The date is printed as `YYYY-MM-DD`. The amount is rounded
    /// half-to-even and always shows two fraction digits.
    fn from(record: &UnifiedRecord) -> Self {
        let mut amount = record.amount.round_dp(2);
        amount.rescale(2);

        Self {
            source: record.source.clone(),
            timestamp: record.timestamp.format("%Y-%m-%d").to_string(),
            kind: record.kind.clone(),
            amount: amount.to_string(),
            transfer_from: record.transfer_from.clone(),
            transfer_to: record.transfer_to.clone(),
        }
    }
}

impl ExportRecord {
    pub fn into_fields(self) -> [String; 6] {
        [
            self.source,
            self.timestamp,
            self.kind,
            self.amount,
            self.transfer_from,
            self.transfer_to,
        ]
    }
}
