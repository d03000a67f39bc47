//! CSV ingestion
//!
//! [`Ingest`] reads CSV input line by line, sorts each line into data rows and
//! skipped lines, runs the data rows through the [`FlightStore`] validation
//! path and keeps an [`ErrorLine`] for everything that did not make it into
//! the store.

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    ops::AddAssign,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use walkdir::WalkDir;

use crate::{
    domain::{Field, FlightRecord, Reason, RecordValidator},
    FlightStore,
};

/// Why an input line did not produce a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    /// The line is a `#` comment. Informational only.
    Comment,
    /// The line could not be split into CSV cells.
    MalformedCsv,
    /// The line has fewer than six cells.
    MissingColumns,
    /// The record failed validation.
    Rejected(NonEmpty<Reason>),
}

impl LineIssue {
    /// Returns `true` for lines that were skipped deliberately rather than
    /// refused.
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::Comment)
    }
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => write!(f, "comment line, ignored for data parsing"),
            Self::MalformedCsv => write!(f, "malformed CSV line"),
            Self::MissingColumns => write!(f, "missing required fields"),
            Self::Rejected(reasons) => {
                for (i, reason) in reasons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{reason}")?;
                }
                Ok(())
            }
        }
    }
}

/// An input line that was skipped or refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLine {
    /// 1-based line number within its file.
    pub line: usize,
    /// The line as read, without its line terminator.
    pub raw: String,
    /// What was wrong with it.
    pub issue: LineIssue,
}

impl fmt::Display for ErrorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} -> {}", self.line, self.raw, self.issue)
    }
}

/// Counts of what happened to the lines of one or more inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records accepted into the store.
    pub accepted: usize,
    /// Records refused by validation or because of their shape.
    pub rejected: usize,
    /// Comment lines.
    pub skipped: usize,
    /// Input files that could not be read.
    pub failed_files: usize,
}

impl AddAssign for IngestSummary {
    fn add_assign(&mut self, other: Self) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.skipped += other.skipped;
        self.failed_files += other.failed_files;
    }
}

/// Errors that can occur while reading CSV input.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// An input file could not be opened or read.
    #[error("Error reading file {}: {source}", path.display())]
    File {
        /// The file in question.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// An input directory could not be listed.
    #[error("Error listing directory {}: {source}", path.display())]
    Directory {
        /// The directory in question.
        path: PathBuf,
        /// The underlying error.
        source: walkdir::Error,
    },
}

/// Accumulates accepted records and error lines across one or more CSV
/// inputs.
#[derive(Debug, Clone)]
pub struct Ingest {
    validator: RecordValidator,
    store: FlightStore,
    error_lines: Vec<ErrorLine>,
}

impl Ingest {
    /// Start ingesting into an empty store.
    #[must_use]
    pub const fn new(validator: RecordValidator) -> Self {
        Self {
            validator,
            store: FlightStore::new(),
            error_lines: Vec::new(),
        }
    }

    /// The records accepted so far.
    #[must_use]
    pub const fn store(&self) -> &FlightStore {
        &self.store
    }

    /// The lines skipped or refused so far, grouped by input and ordered by
    /// line number within each input.
    #[must_use]
    pub fn error_lines(&self) -> &[ErrorLine] {
        &self.error_lines
    }

    /// Finish ingesting, returning the store and the error lines.
    #[must_use]
    pub fn into_parts(self) -> (FlightStore, Vec<ErrorLine>) {
        (self.store, self.error_lines)
    }

    /// Ingest one CSV input.
    ///
    /// Blank lines are ignored, and so is the first line whose first cell is
    /// `flightid` (in any case). Comment lines and rows with fewer than six
    /// cells are recorded as error lines; the remaining rows are validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read. Nothing from a failed
    /// input is added to the store or the error lines.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> io::Result<IngestSummary> {
        let mut header_seen = false;
        let mut issues = Vec::new();
        let mut records = Vec::new();
        let mut raw_rows = BTreeMap::new();

        for (index, raw) in reader.lines().enumerate() {
            let raw = raw?;
            let line = index + 1;
            match classify(&raw, &mut header_seen) {
                Line::Ignored => tracing::trace!(line, "ignored"),
                Line::Issue(issue) => {
                    tracing::debug!(line, %issue, "skipped");
                    issues.push(ErrorLine { line, raw, issue });
                }
                Line::Row(record) => {
                    records.push((line, record));
                    raw_rows.insert(line, raw);
                }
            }
        }

        let mut summary = IngestSummary {
            skipped: issues.iter().filter(|e| e.issue.is_informational()).count(),
            ..IngestSummary::default()
        };
        summary.rejected = issues.len() - summary.skipped;

        let report = self.store.load_from_validation(&self.validator, records);
        summary.accepted = report.accepted;
        summary.rejected += report.rejected.len();

        issues.extend(report.rejected.into_iter().map(|rejection| ErrorLine {
            line: rejection.position,
            raw: raw_rows.remove(&rejection.position).unwrap_or_default(),
            issue: LineIssue::Rejected(rejection.reasons),
        }));
        issues.sort_by_key(|e| e.line);
        self.error_lines.extend(issues);

        Ok(summary)
    }

    /// Ingest the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn ingest_file(&mut self, path: &Path) -> Result<IngestSummary, IngestError> {
        let to_error = |source| IngestError::File {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        let summary = self.ingest_reader(BufReader::new(file)).map_err(to_error)?;
        tracing::info!(
            "{}: {} accepted, {} rejected",
            path.display(),
            summary.accepted,
            summary.rejected
        );
        Ok(summary)
    }

    /// Ingest every `*.csv` file directly inside `dir`, in filename order.
    ///
    /// Subdirectories are ignored; dot-files ending in `.csv` are included. A
    /// file that cannot be read is reported and counted in
    /// [`IngestSummary::failed_files`]; the remaining files are still ingested.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory itself cannot be listed.
    pub fn ingest_directory(&mut self, dir: &Path) -> Result<IngestSummary, IngestError> {
        let mut total = IngestSummary::default();
        for path in csv_paths(dir)? {
            match self.ingest_file(&path) {
                Ok(summary) => total += summary,
                Err(e) => {
                    tracing::error!("{e}");
                    total.failed_files += 1;
                }
            }
        }
        Ok(total)
    }

    /// Write every error line, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn export_errors<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for error_line in &self.error_lines {
            writeln!(writer, "{error_line}")?;
        }
        writer.flush()
    }
}

enum Line {
    Ignored,
    Issue(LineIssue),
    Row(FlightRecord),
}

fn classify(raw: &str, header_seen: &mut bool) -> Line {
    if raw.trim().is_empty() {
        return Line::Ignored;
    }
    if raw.trim_start().starts_with('#') {
        return Line::Issue(LineIssue::Comment);
    }

    let Some(cells) = split_cells(raw) else {
        return Line::Issue(LineIssue::MalformedCsv);
    };

    let cell = |i: usize| cells.get(i).unwrap_or_default().trim();

    if !*header_seen && cell(0).eq_ignore_ascii_case(Field::FlightId.key()) {
        *header_seen = true;
        return Line::Ignored;
    }
    if cells.len() < Field::ALL.len() {
        return Line::Issue(LineIssue::MissingColumns);
    }

    Line::Row(FlightRecord::new(
        cell(0),
        cell(1),
        cell(2),
        cell(3),
        cell(4),
        cell(5),
    ))
}

fn split_cells(raw: &str) -> Option<csv::StringRecord> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes())
        .records()
        .next()?
        .ok()
}

fn csv_paths(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| IngestError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_csv = entry.file_name().to_string_lossy().ends_with(".csv");
        if entry.depth() == 1 && is_csv && entry.path().is_file() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
