//! Flight schedule validation and querying
//!
//! Flight records arrive as CSV rows. Each row is checked against a fixed set
//! of field rules; accepted rows are kept in an in-memory [`FlightStore`] that
//! can be exported as a JSON snapshot and queried by attribute.

pub mod domain;
pub use domain::{
    Config, DatetimeLayouts, Field, FlightRecord, Matcher, Query, QueryMode, Reason,
    RecordValidator, ValidationOutcome,
};

/// In-memory store plus the CSV, snapshot and query file plumbing around it.
pub mod storage;
pub use storage::{ErrorLine, FlightStore, Ingest, LineIssue, LoadReport, QueryResult};
