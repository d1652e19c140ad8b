//! Output CSV dialects.

use crate::error::Error;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::str::FromStr;

/// Quoting, delimiter and line-ending convention of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Comma separated, CRLF line endings, minimal quoting.
    Excel,
    /// Tab separated, CRLF line endings, minimal quoting.
    ExcelTab,
    /// Comma separated, LF line endings, every field quoted.
    #[default]
    Unix,
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" => Ok(Dialect::Excel),
            "excel_tab" | "excel-tab" => Ok(Dialect::ExcelTab),
            "unix" => Ok(Dialect::Unix),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Excel => "excel",
            Dialect::ExcelTab => "excel_tab",
            Dialect::Unix => "unix",
        }
    }

    /// Build a csv writer over `writer` configured for this dialect.
    ///
    /// With `has_headers`, the first serialized record is preceded by a row
    /// of its field names.
    pub fn writer<W: Write>(&self, writer: W, has_headers: bool) -> csv::Writer<W> {
        let mut builder = WriterBuilder::new();
        builder.has_headers(has_headers);

        match self {
            Dialect::Excel => builder
                .delimiter(b',')
                .terminator(Terminator::CRLF)
                .quote_style(QuoteStyle::Necessary),
            Dialect::ExcelTab => builder
                .delimiter(b'\t')
                .terminator(Terminator::CRLF)
                .quote_style(QuoteStyle::Necessary),
            Dialect::Unix => builder
                .delimiter(b',')
                .terminator(Terminator::Any(b'\n'))
                .quote_style(QuoteStyle::Always),
        };

        builder.from_writer(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_row(dialect: Dialect, fields: &[&str]) -> String {
        let mut out = Vec::new();
        {
            let mut wtr = dialect.writer(&mut out, false);
            wtr.write_record(fields).unwrap();
            wtr.flush().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("unix".parse::<Dialect>().unwrap(), Dialect::Unix);
        assert_eq!("excel".parse::<Dialect>().unwrap(), Dialect::Excel);
        assert_eq!("excel_tab".parse::<Dialect>().unwrap(), Dialect::ExcelTab);
        assert!(matches!(
            "tsv".parse::<Dialect>(),
            Err(Error::UnknownDialect(name)) if name == "tsv"
        ));
        assert_eq!(Dialect::default(), Dialect::Unix);
    }

    #[test]
    fn test_dialect_layout() {
        assert_eq!(write_row(Dialect::Unix, &["a", "1.00"]), "\"a\",\"1.00\"\n");
        assert_eq!(write_row(Dialect::Excel, &["a", "1.00"]), "a,1.00\r\n");
        assert_eq!(write_row(Dialect::ExcelTab, &["a", "1.00"]), "a\t1.00\r\n");
        assert_eq!(write_row(Dialect::Excel, &["a,b"]), "\"a,b\"\r\n");
    }
}
