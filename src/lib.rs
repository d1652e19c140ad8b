//! Bank Unifier Library
//!
//! A library for normalizing per-bank CSV transaction exports into one
//! unified CSV schema.
//!
//! # Supported Formats
//!
//! - **bank1**: `timestamp,type,amount,from,to` with dates like `Oct 1 2019`
//! - **bank2**: `date,transaction,amounts,to,from` with dates like `03-10-2019`
//! - **bank3**: `date_readable,type,euro,cents,to,from` with dates like `5 Oct 2019`
//!
//! # Output
//!
//! Every record is written as
//! `source,timestamp,type,amount,transfer_from,transfer_to`, with ISO dates
//! and two-digit amounts, in one of the [`Dialect`]s.
//!
//! # Examples
//!
//! ## Converting a single file
//!
//! ```no_run
//! use bank_unifier::{convert_file, Dialect};
//!
//! let summary = convert_file("statement.csv", "bank2", "output.csv", false, Dialect::Unix)?;
//! println!("{} rows read, {} exported", summary.rows_read, summary.rows_exported);
//! # Ok::<(), bank_unifier::Error>(())
//! ```
//!
//! ## Parsing rows by hand
//!
//! ```
//! use bank_unifier::{Format, TransactionStore};
//! use bank_unifier::formats::RowConverter;
//! use csv::StringRecord;
//!
//! let format: Format = "bank1".parse()?;
//! let rows = vec![
//!     Ok(StringRecord::from(vec!["timestamp", "type", "amount", "from", "to"])),
//!     Ok(StringRecord::from(vec!["Oct 1 2019", "remove", "99.20", "198", "182"])),
//! ];
//!
//! let mut store = TransactionStore::new();
//! let read = RowConverter::new(format, "inline").process_rows(rows, &mut store)?;
//! assert_eq!(read, 2);
//! assert_eq!(store.get(0)?.transfer_to, "182");
//! # Ok::<(), bank_unifier::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod formats;
pub mod dialect;
pub mod storage;
pub mod convert;

use std::str::FromStr;

// Re-export commonly used types
pub use convert::{
    convert_batch, convert_file, source_files, ConversionSummary, FileOutcome, SourceRows,
};
pub use dialect::Dialect;
pub use error::{Error, Result, RowError};
pub use formats::Format;
pub use storage::TransactionStore;
pub use types::{ExportRecord, UnifiedRecord, FIELD_NAMES};

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bank1" => Ok(Format::Bank1),
            "bank2" => Ok(Format::Bank2),
            "bank3" => Ok(Format::Bank3),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("bank1".parse::<Format>().unwrap(), Format::Bank1);
        assert_eq!("BANK2".parse::<Format>().unwrap(), Format::Bank2);
        assert_eq!("bank3".parse::<Format>().unwrap(), Format::Bank3);
        assert!("mt940".parse::<Format>().is_err());
        assert!("".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_format_message() {
        let err = "bank9".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown format bank9");
    }
}
