use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DatetimeLayouts, Field, FlightRecord};

/// A sparse set of constraints on flight fields.
///
/// A query is the JSON object supplied by the user, kept verbatim so it can be
/// echoed back alongside its matches. Keys that are not field names are
/// carried along but impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Map<String, Value>);

impl Query {
    /// Create an empty query, which matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the constraint on `field`.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.0.insert(field.key().to_string(), value.into());
        self
    }

    /// The constraints on recognised fields, in the order they were given.
    pub fn constraints(&self) -> impl Iterator<Item = (Field, &Value)> {
        self.0
            .iter()
            .filter_map(|(key, value)| Some((key.parse::<Field>().ok()?, value)))
    }

    /// The query as supplied.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// How timestamp and price constraints are interpreted.
///
/// Identifier and airport constraints are always exact string matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Departure is an inclusive lower bound, arrival and price are inclusive
    /// upper bounds.
    #[default]
    Range,
    /// Departure and arrival match if the record's text contains the query
    /// text; price matches if numerically equal.
    Literal,
}

/// Decides whether a record satisfies a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    mode: QueryMode,
    layouts: DatetimeLayouts,
}

impl Matcher {
    /// Create a matcher.
    ///
    /// `layouts` governs how timestamps are parsed on both the query and the
    /// record side when comparing in [`QueryMode::Range`].
    #[must_use]
    pub const fn new(mode: QueryMode, layouts: DatetimeLayouts) -> Self {
        Self { mode, layouts }
    }

    /// Create a matcher from the settings in `config`.
    #[must_use]
    pub fn from_config(config: &super::Config) -> Self {
        Self::new(config.query_mode(), config.datetime_layouts())
    }

    /// Returns `true` if `record` satisfies every constraint in `query`.
    ///
    /// A constraint that cannot be evaluated (a timestamp that does not parse,
    /// a non-numeric price, a non-string identifier) is not satisfied.
    #[must_use]
    pub fn matches(&self, query: &Query, record: &FlightRecord) -> bool {
        query
            .constraints()
            .all(|(field, value)| self.satisfies(field, value, record.get(field)))
    }

    fn satisfies(&self, field: Field, wanted: &Value, actual: &str) -> bool {
        match (field, self.mode) {
            (Field::FlightId | Field::Origin | Field::Destination, _) => {
                wanted.as_str() == Some(actual)
            }
            (Field::Departure, QueryMode::Range) => self
                .compare_times(actual, wanted)
                .is_some_and(Ordering::is_ge),
            (Field::Arrival, QueryMode::Range) => self
                .compare_times(actual, wanted)
                .is_some_and(Ordering::is_le),
            (Field::Departure | Field::Arrival, QueryMode::Literal) => {
                wanted.as_str().is_some_and(|text| actual.contains(text))
            }
            (Field::Price, QueryMode::Range) => {
                compare_prices(actual, wanted).is_some_and(Ordering::is_le)
            }
            (Field::Price, QueryMode::Literal) => {
                compare_prices(actual, wanted).is_some_and(Ordering::is_eq)
            }
        }
    }

    fn compare_times(&self, actual: &str, wanted: &Value) -> Option<Ordering> {
        let wanted = self.layouts.parse(wanted.as_str()?)?;
        let actual = self.layouts.parse(actual)?;
        Some(actual.cmp(&wanted))
    }
}

fn compare_prices(actual: &str, wanted: &Value) -> Option<Ordering> {
    let wanted = match wanted {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let actual: f64 = actual.trim().parse().ok()?;
    actual.partial_cmp(&wanted)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn flight() -> FlightRecord {
        FlightRecord::new("AB123", "LHR", "JFK", "2025-11-14 1030", "2025-11-14 1530", "250.00")
    }

    fn query(value: Value) -> Query {
        serde_json::from_value(value).unwrap()
    }

    #[test_case(json!({}), true; "empty query")]
    #[test_case(json!({"flightid": "AB123"}), true; "flightid equal")]
    #[test_case(json!({"flightid": "ab123"}), false; "flightid case sensitive")]
    #[test_case(json!({"origin": "LHR", "destination": "JFK"}), true; "route")]
    #[test_case(json!({"destination": "CDG"}), false; "other destination")]
    #[test_case(json!({"origin": "LHR", "price": "300"}), true; "cheaper than limit")]
    #[test_case(json!({"price": "100"}), false; "dearer than limit")]
    #[test_case(json!({"price": 250}), true; "numeric limit equal")]
    #[test_case(json!({"price": "cheap"}), false; "non numeric limit")]
    #[test_case(json!({"departuredatetime": "2025-11-14 1030"}), true; "departs at bound")]
    #[test_case(json!({"departuredatetime": "2025-11-14 09:00"}), true; "departs after bound")]
    #[test_case(json!({"departuredatetime": "2025-11-14 1100"}), false; "departs before bound")]
    #[test_case(json!({"arrivaldatetime": "2025-11-14 15:30"}), true; "arrives at bound")]
    #[test_case(json!({"arrivaldatetime": "2025-11-14 1500"}), false; "arrives after bound")]
    #[test_case(json!({"arrivaldatetime": "2025-11-14"}), false; "unparseable bound")]
    #[test_case(json!({"departuredatetime": "2025-11-140900"}), false; "bound without separator")]
    #[test_case(json!({"arrivaldatetime": 202511141530_u64}), false; "numeric bound")]
    #[test_case(json!({"airline": "BA"}), true; "unknown key ignored")]
    fn range_mode(value: Value, expected: bool) {
        let matcher = Matcher::default();
        assert_eq!(matcher.matches(&query(value), &flight()), expected);
    }

    #[test_case(json!({"departuredatetime": "2025-11-14"}), true; "date substring")]
    #[test_case(json!({"arrivaldatetime": "1530"}), true; "time substring")]
    #[test_case(json!({"departuredatetime": "2025-11-14 09:00"}), false; "no lower bound")]
    #[test_case(json!({"price": "250"}), true; "price equal")]
    #[test_case(json!({"price": "300"}), false; "price not a limit")]
    fn literal_mode(value: Value, expected: bool) {
        let matcher = Matcher::new(QueryMode::Literal, DatetimeLayouts::Both);
        assert_eq!(matcher.matches(&query(value), &flight()), expected);
    }

    #[test]
    fn compact_layouts_do_not_parse_colon_bounds() {
        let matcher = Matcher::new(QueryMode::Range, DatetimeLayouts::Compact);
        let q = Query::new().with(Field::Departure, "2025-11-14 09:00");
        assert!(!matcher.matches(&q, &flight()));
    }

    #[test]
    fn constraints_skip_unknown_keys() {
        let q = query(json!({"airline": "BA", "origin": "LHR"}));
        let fields: Vec<Field> = q.constraints().map(|(field, _)| field).collect();
        assert_eq!(fields, [Field::Origin]);
        assert_eq!(q.as_map().len(), 2);
    }
}
