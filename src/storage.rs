//! In-memory store of unified records and their CSV export.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::types::{ExportRecord, UnifiedRecord};
use std::io::Write;

/// Ordered, append-only collection of the records produced by one
/// conversion run.
///
/// Records keep their `source`, so the output of several runs can be
/// merged into one file in append mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStore {
    records: Vec<UnifiedRecord>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn add(&mut self, record: UnifiedRecord) {
        self.records.push(record);
    }

    /// Drop every stored record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Record at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Result<&UnifiedRecord> {
        self.records.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnifiedRecord> {
        self.records.iter()
    }

    /// Pre-export formatting of a single record. Field order is preserved.
    pub fn export_record(record: &UnifiedRecord) -> ExportRecord {
        ExportRecord::from(record)
    }

    /// Write every record as one CSV row to `writer` and return how many
    /// were written.
    ///
    /// An empty store writes nothing at all, not even the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use bank_unifier::{Dialect, TransactionStore, UnifiedRecord};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut store = TransactionStore::new();
    /// store.add(UnifiedRecord::new(
    ///     "bank1.csv",
    ///     NaiveDate::from_ymd_opt(2019, 10, 1).unwrap(),
    ///     "remove",
    ///     Decimal::new(9920, 2),
    ///     "198",
    ///     "182",
    /// ));
    ///
    /// let mut out = Vec::new();
    /// let written = store.export(&mut out, true, Dialect::Excel)?;
    /// assert_eq!(written, 1);
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "source,timestamp,type,amount,transfer_from,transfer_to\r\n\
    ///      bank1.csv,2019-10-01,remove,99.20,198,182\r\n"
    /// );
    /// # Ok::<(), bank_unifier::Error>(())
    /// ```
    pub fn export<W: Write>(
        &self,
        writer: W,
        write_header: bool,
        dialect: Dialect,
    ) -> Result<usize> {
        if self.records.is_empty() {
            return Ok(0);
        }

        let mut csv_writer = dialect.writer(writer, write_header);

        let mut export_count = 0;
        for record in &self.records {
            csv_writer.serialize(Self::export_record(record))?;
            export_count += 1;
        }

        csv_writer.flush()?;
        Ok(export_count)
    }
}
