//! Conversion of whole source files into the unified CSV output.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::formats::{Format, RowConverter};
use crate::storage::TransactionStore;
use csv::{ReaderBuilder, StringRecord};
use std::cmp::Ordering;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Row counts of one successful file conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Rows read from the source, including a skipped header row.
    pub rows_read: usize,
    /// Rows written to the destination.
    pub rows_exported: usize,
}

/// Convert one source file of format `format_name` and write the unified
/// records to `destination`.
///
/// With `append` the destination is appended to and no header row is
/// written; otherwise it is truncated and starts with a header. Appending
/// to a file that does not exist yet therefore yields a headerless file.
///
/// The whole source is parsed before the destination is opened, so a bad
/// row leaves the destination untouched.
///
/// # Examples
///
/// ```no_run
/// use bank_unifier::{convert_file, Dialect};
///
/// let summary = convert_file("bank1.csv", "bank1", "output.csv", false, Dialect::Unix)?;
/// println!("exported {} records", summary.rows_exported);
/// # Ok::<(), bank_unifier::Error>(())
/// ```
pub fn convert_file(
    source: impl AsRef<Path>,
    format_name: &str,
    destination: impl AsRef<Path>,
    append: bool,
    dialect: Dialect,
) -> Result<ConversionSummary> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let format: Format = format_name.parse()?;

    let mut store = TransactionStore::new();
    let converter = RowConverter::new(format, source.to_string_lossy());

    let rows_read = {
        let file = File::open(source).map_err(|e| Error::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;
        converter.process_rows(SourceRows::new(BufReader::new(file)), &mut store)?
    };
    debug!(source = %source.display(), rows_read, records = store.len(), "source parsed");

    let output = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(destination)
        .map_err(|e| Error::DestinationUnwritable {
            path: destination.to_path_buf(),
            source: e,
        })?;
    let rows_exported = store.export(output, !append, dialect)?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        format = format.name(),
        rows_exported,
        "file converted"
    );

    Ok(ConversionSummary {
        rows_read,
        rows_exported,
    })
}

/// CSV rows of a source, one per record, in file order.
///
/// Unlike `csv::Reader`, a blank line is not skipped: it comes out as an
/// empty record so it is counted and numbered like any other row. A record
/// continues over line breaks while a quoted field is open.
pub struct SourceRows<R> {
    input: R,
    chunk: String,
}

impl<R: BufRead> SourceRows<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            chunk: String::new(),
        }
    }

    fn parse_chunk(&self) -> Result<StringRecord> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.chunk.as_bytes());
        let mut record = StringRecord::new();
        reader.read_record(&mut record)?;
        Ok(record)
    }
}

impl<R: BufRead> Iterator for SourceRows<R> {
    type Item = Result<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunk.clear();

        loop {
            match self.input.read_line(&mut self.chunk) {
                Ok(0) if self.chunk.is_empty() => return None,
                // EOF inside an open quote; let the csv parser deal with it
                Ok(0) => break,
                Ok(_) if self.chunk.matches('"').count() % 2 == 0 => break,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }

        if self.chunk.trim_end_matches(&['\r', '\n'][..]).is_empty() {
            return Some(Ok(StringRecord::new()));
        }
        Some(self.parse_chunk())
    }
}

/// Expand `paths` into the list of files to convert.
///
/// Files (and symlinks) are kept as given. Directories expand to every file
/// below them: the contents of subdirectories come before a directory's own
/// files, names sorted within each level. Paths that don't exist are
/// dropped.
pub fn source_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let walker = WalkDir::new(path)
                .contents_first(true)
                .sort_by(|a, b| subdirs_first(a, b));
            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "skipping unreadable directory entry"),
                }
            }
        } else if path.is_file() || path.is_symlink() {
            files.push(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "ignoring missing source");
        }
    }

    files
}

fn subdirs_first(a: &walkdir::DirEntry, b: &walkdir::DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Result of converting one file as part of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub result: Result<ConversionSummary>,
}

/// Convert every source in order against the same destination settings.
///
/// A failing file is recorded and the batch moves on to the next one.
pub fn convert_batch<P: AsRef<Path>>(
    sources: &[P],
    format_name: &str,
    destination: impl AsRef<Path>,
    append: bool,
    dialect: Dialect,
) -> Vec<FileOutcome> {
    let destination = destination.as_ref();

    sources
        .iter()
        .map(|source| {
            let source = source.as_ref();
            let result = convert_file(source, format_name, destination, append, dialect);
            if let Err(ref e) = result {
                warn!(source = %source.display(), format = format_name, error = %e, "conversion failed");
            }
            FileOutcome {
                source: source.to_path_buf(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_unknown_format() {
        let tmp = tempdir().unwrap();
        let err = convert_file(
            tmp.path().join("in.csv"),
            "bank4",
            tmp.path().join("out.csv"),
            false,
            Dialect::Unix,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(name) if name == "bank4"));
    }

    #[test]
    fn test_missing_source() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out.csv");
        let err = convert_file(tmp.path().join("nope.csv"), "bank1", &out, false, Dialect::Unix)
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("in.csv");
        fs::write(&src, "timestamp,type,amount,from,to\nOct 1 2019,remove,99.20,198,182\n").unwrap();

        let err = convert_file(&src, "bank1", tmp.path().join("missing/out.csv"), false, Dialect::Unix)
            .unwrap_err();
        assert!(matches!(err, Error::DestinationUnwritable { .. }));
    }

    #[test]
    fn test_bad_row_leaves_destination_untouched() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("in.csv");
        let out = tmp.path().join("out.csv");
        fs::write(
            &src,
            "timestamp,type,amount,from,to\nOct 1 2019,remove,99.20,198,182\nOct 2 2019,add,abc,1,2\n",
        )
        .unwrap();
        fs::write(&out, "previous\n").unwrap();

        let err = convert_file(&src, "bank1", &out, false, Dialect::Unix).unwrap_err();
        match err {
            Error::Row { row, source } => {
                assert_eq!(row, 3);
                assert_eq!(source, RowError::InvalidAmount("abc".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous\n");
    }

    #[test]
    fn test_source_files_expands_directories() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("in");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.csv"), "").unwrap();
        fs::write(dir.join("a.csv"), "").unwrap();
        fs::write(dir.join("nested/c.csv"), "").unwrap();
        let single = tmp.path().join("single.csv");
        fs::write(&single, "").unwrap();

        let files = source_files(&[single.clone(), dir.clone(), tmp.path().join("ghost")]);
        assert_eq!(
            files,
            vec![single, dir.join("nested/c.csv"), dir.join("a.csv"), dir.join("b.csv")]
        );
    }

    fn rows(input: &str) -> Vec<StringRecord> {
        SourceRows::new(input.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_source_rows_keep_blank_lines() {
        let rows = rows("a,b\n\nc,d\n\n");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], StringRecord::from(vec!["a", "b"]));
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], StringRecord::from(vec!["c", "d"]));
        assert!(rows[3].is_empty());
    }

    #[test]
    fn test_source_rows_line_endings() {
        let rows = rows("a,b\r\n\r\nc,d");
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], StringRecord::from(vec!["c", "d"]));
    }

    #[test]
    fn test_source_rows_quoted_line_break() {
        let rows = rows("\"x\ny\",1\n2,\"a,b\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], StringRecord::from(vec!["x\ny", "1"]));
        assert_eq!(rows[1], StringRecord::from(vec!["2", "a,b"]));
    }

    #[test]
    fn test_source_rows_whitespace_line_is_not_blank() {
        let rows = rows("  \n");
        assert_eq!(rows, vec![StringRecord::from(vec!["  "])]);
    }

    #[test]
    fn test_blank_row_fails_with_row_number() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("in.csv");
        fs::write(&src, "timestamp,type,amount,from,to\n\nOct 1 2019,remove,99.20,198,182\n").unwrap();

        let err = convert_file(&src, "bank1", tmp.path().join("out.csv"), false, Dialect::Unix)
            .unwrap_err();
        match err {
            Error::Row { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source, RowError::MissingColumns { expected: 5, found: 0 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
