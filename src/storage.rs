mod ingest;
/// Query files and query responses.
pub mod query_file;
/// Snapshot files.
pub mod snapshot;
mod store;

pub use ingest::{ErrorLine, Ingest, IngestError, IngestSummary, LineIssue};
pub use query_file::QueryFileError;
pub use snapshot::SnapshotDecodeError;
pub use store::{FlightStore, LoadReport, QueryResult, Rejection};
