//! An in-memory store of accepted flights
//!
//! The [`FlightStore`] is filled exactly once per run, either by validating
//! freshly parsed records or by loading a previously exported snapshot, and
//! then answers queries against what it holds.

use std::io::{Read, Write};

use nonempty::NonEmpty;
use serde::Serialize;

use crate::{
    domain::{FlightRecord, Matcher, Query, Reason, RecordValidator, ValidationOutcome},
    storage::snapshot::SnapshotDecodeError,
};

/// A record that failed validation, identified by its input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Position (usually the 1-based line number) the record came from.
    pub position: usize,
    /// Why the record was refused, in check order.
    pub reasons: NonEmpty<Reason>,
}

/// The result of loading a batch of records through the validator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// How many records were accepted into the store.
    pub accepted: usize,
    /// The records that were refused, in input order.
    pub rejected: Vec<Rejection>,
}

/// The matches for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult<'a> {
    /// The query as supplied.
    pub query: &'a Query,
    /// Matching records, in store order.
    pub matches: Vec<&'a FlightRecord>,
}

/// Accepted flight records, in insertion order.
///
/// Records are not deduplicated; two flights with the same identifier are
/// both kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlightStore {
    records: Vec<FlightRecord>,
}

impl FlightStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The records held, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// The number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate `records` in order, appending those that pass.
    ///
    /// Each record is paired with its input position, which is reported back
    /// for any record that is refused.
    pub fn load_from_validation<I>(
        &mut self,
        validator: &RecordValidator,
        records: I,
    ) -> LoadReport
    where
        I: IntoIterator<Item = (usize, FlightRecord)>,
    {
        let mut report = LoadReport::default();

        for (position, record) in records {
            match validator.validate_record(&record) {
                ValidationOutcome::Accepted => {
                    tracing::trace!(position, flightid = %record.flightid, "accepted");
                    self.records.push(record);
                    report.accepted += 1;
                }
                ValidationOutcome::Rejected(reasons) => {
                    tracing::debug!(position, reason = %reasons.first(), "rejected");
                    report.rejected.push(Rejection { position, reasons });
                }
            }
        }

        report
    }

    /// Replace the contents of the store with a decoded snapshot.
    ///
    /// The snapshot must be a JSON array of objects carrying all six field
    /// keys. Records are taken as-is and not revalidated.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read or decoded. The store
    /// is left untouched in that case.
    pub fn load_from_snapshot<R: Read>(&mut self, reader: R) -> Result<(), SnapshotDecodeError> {
        let records: Vec<FlightRecord> = serde_json::from_reader(reader)?;
        tracing::info!("Loaded {} flights from snapshot", records.len());
        self.records = records;
        Ok(())
    }

    /// Write the held records as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn export_snapshot<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.records)
    }

    /// The records that satisfy `query`, in store order.
    pub fn query<'a>(
        &'a self,
        query: &Query,
        matcher: &Matcher,
    ) -> impl Iterator<Item = &'a FlightRecord> {
        self.records
            .iter()
            .filter(move |record| matcher.matches(query, record))
    }

    /// Run each query independently against the store.
    #[must_use]
    pub fn run_queries<'a>(
        &'a self,
        queries: &'a [Query],
        matcher: &Matcher,
    ) -> Vec<QueryResult<'a>> {
        queries
            .iter()
            .map(|query| QueryResult {
                query,
                matches: self.query(query, matcher).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Field, reason::PriceError};

    fn flight(id: &str, price: &str) -> FlightRecord {
        FlightRecord::new(id, "LHR", "JFK", "2025-11-14 1030", "2025-11-14 1530", price)
    }

    fn loaded(records: Vec<FlightRecord>) -> FlightStore {
        let mut store = FlightStore::new();
        store.load_from_validation(&RecordValidator::default(), records.into_iter().enumerate());
        store
    }

    #[test]
    fn validation_appends_in_order_and_reports_rejects() {
        let mut store = FlightStore::new();
        let records = vec![
            (2, flight("AB1", "100")),
            (3, flight("AB2", "-1")),
            (5, flight("AB3", "300")),
        ];

        let report = store.load_from_validation(&RecordValidator::default(), records);

        assert_eq!(report.accepted, 2);
        assert_eq!(
            report.rejected,
            vec![Rejection {
                position: 3,
                reasons: NonEmpty::new(Reason::Price(PriceError::NegativePrice)),
            }]
        );
        let ids: Vec<_> = store.records().iter().map(|r| r.flightid.as_str()).collect();
        assert_eq!(ids, ["AB1", "AB3"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let store = loaded(vec![flight("AB1", "100"), flight("AB1", "100")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn snapshot_round_trip_preserves_order() {
        let store = loaded(vec![flight("ZZ9", "10"), flight("AA1", "20"), flight("MM5", "30")]);

        let mut buffer = Vec::new();
        store.export_snapshot(&mut buffer).unwrap();

        let mut reloaded = FlightStore::new();
        reloaded.load_from_snapshot(buffer.as_slice()).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn snapshot_replaces_contents() {
        let mut store = loaded(vec![flight("AB1", "100")]);
        let snapshot = json!([flight("CD2", "5")]).to_string();

        store.load_from_snapshot(snapshot.as_bytes()).unwrap();

        assert_eq!(store.records(), &[flight("CD2", "5")]);
    }

    #[test]
    fn malformed_snapshot_is_an_error_and_leaves_store_untouched() {
        let mut store = loaded(vec![flight("AB1", "100")]);

        for bad in [r#"[{"flightid": "AB1"}]"#, "{not json", r#"{"flightid": "AB1"}"#] {
            let error = store.load_from_snapshot(bad.as_bytes()).unwrap_err();
            assert!(matches!(error, SnapshotDecodeError::Json(_)), "{bad}");
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn query_preserves_store_order_and_is_repeatable() {
        let store = loaded(vec![
            flight("AB1", "400"),
            flight("AB2", "150"),
            flight("AB3", "90"),
        ]);
        let query = Query::new().with(Field::Price, "200");
        let matcher = Matcher::default();

        let first: Vec<_> = store.query(&query, &matcher).collect();
        let second: Vec<_> = store.query(&query, &matcher).collect();

        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|r| r.flightid.as_str()).collect();
        assert_eq!(ids, ["AB2", "AB3"]);
    }

    #[test]
    fn run_queries_pairs_each_query_with_its_matches() {
        let store = loaded(vec![flight("AB123", "250.00")]);
        let queries = vec![
            Query::new().with(Field::Origin, "LHR").with(Field::Price, "300"),
            Query::new().with(Field::Price, "100"),
        ];

        let results = store.run_queries(&queries, &Matcher::default());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].matches, vec![&store.records()[0]]);
        assert!(results[1].matches.is_empty());
        assert_eq!(
            serde_json::to_value(&results[1]).unwrap(),
            json!({"query": {"price": "100"}, "matches": []})
        );
    }
}
