//! Per-bank row parsers.
//!
//! Each supported bank exports transactions with its own column layout and
//! date encoding. A [`Format`] turns one raw row into a [`UnifiedRecord`];
//! a [`RowConverter`] drives a whole stream of rows into a
//! [`TransactionStore`].

use crate::error::{Error, Result, RowError};
use crate::storage::TransactionStore;
use crate::types::UnifiedRecord;
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// Supported source bank formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `timestamp,type,amount,from,to`
    ///
    /// `Oct 1 2019,remove,99.20,198,182`
    Bank1,
    /// `date,transaction,amounts,to,from`
    ///
    /// `03-10-2019,remove,99.40,182,198`
    Bank2,
    /// `date_readable,type,euro,cents,to,from`
    ///
    /// `5 Oct 2019,remove,5,7,182,198`
    Bank3,
}

impl Format {
    /// All formats, in registry order.
    pub const ALL: [Format; 3] = [Format::Bank1, Format::Bank2, Format::Bank3];

    /// Registry name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Bank1 => "bank1",
            Format::Bank2 => "bank2",
            Format::Bank3 => "bank3",
        }
    }

    /// Number of columns a row of this format must carry.
    pub fn columns(&self) -> usize {
        match self {
            Format::Bank1 | Format::Bank2 => 5,
            Format::Bank3 => 6,
        }
    }

    /// `chrono` pattern of the date column.
    pub fn date_pattern(&self) -> &'static str {
        match self {
            Format::Bank1 => "%b %d %Y",
            Format::Bank2 => "%d-%m-%Y",
            Format::Bank3 => "%d %b %Y",
        }
    }

    /// Parse a single row into a unified record tagged with `source`.
    pub fn parse_row(
        &self,
        row: &StringRecord,
        source: &str,
    ) -> std::result::Result<UnifiedRecord, RowError> {
        if row.len() < self.columns() {
            return Err(RowError::MissingColumns {
                expected: self.columns(),
                found: row.len(),
            });
        }

        let timestamp = parse_date(&row[0], self.date_pattern())?;

        let record = match self {
            Format::Bank1 => UnifiedRecord::new(
                source,
                timestamp,
                &row[1],
                parse_amount(&row[2])?,
                &row[3],
                &row[4],
            ),
            Format::Bank2 => UnifiedRecord::new(
                source,
                timestamp,
                &row[1],
                parse_amount(&row[2])?,
                &row[4],
                &row[3],
            ),
            // Cents are appended verbatim: "5" and "7" give 5.7, not 5.07.
            Format::Bank3 => UnifiedRecord::new(
                source,
                timestamp,
                &row[1],
                parse_amount(&format!("{}.{}", &row[2], &row[3]))?,
                &row[5],
                &row[4],
            ),
        };

        Ok(record)
    }
}

fn parse_date(value: &str, pattern: &'static str) -> std::result::Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(value, pattern).map_err(|_| RowError::InvalidDate {
        value: value.to_string(),
        pattern,
    })
}

fn parse_amount(value: &str) -> std::result::Result<Decimal, RowError> {
    Decimal::from_str(value.trim()).map_err(|_| RowError::InvalidAmount(value.to_string()))
}

/// Feeds rows of one source through a [`Format`] into a store.
#[derive(Debug, Clone)]
pub struct RowConverter {
    format: Format,
    source: String,
    skip_first_row: bool,
}

impl RowConverter {
    /// Create a converter for rows of `format` read from `source`.
    ///
    /// The first row is treated as a header and skipped by default.
    pub fn new(format: Format, source: impl Into<String>) -> Self {
        Self {
            format,
            source: source.into(),
            skip_first_row: true,
        }
    }

    /// Set whether the first row is discarded before parsing.
    pub fn skip_first_row(mut self, skip: bool) -> Self {
        self.skip_first_row = skip;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Parse every row into `store`, returning the number of rows read
    /// (including a skipped header).
    ///
    /// The first failing row aborts processing with [`Error::Row`].
    pub fn process_rows<I>(&self, rows: I, store: &mut TransactionStore) -> Result<usize>
    where
        I: IntoIterator<Item = Result<StringRecord>>,
    {
        let mut row_count = 0;

        for row in rows {
            let row = row?;
            row_count += 1;
            if row_count == 1 && self.skip_first_row {
                continue;
            }

            let record = self
                .format
                .parse_row(&row, &self.source)
                .map_err(|source| Error::Row {
                    row: row_count,
                    source,
                })?;
            store.add(record);
        }

        debug!(
            format = self.format.name(),
            source = %self.source,
            rows = row_count,
            "rows processed"
        );
        Ok(row_count)
    }
}
