use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the six fields every flight record carries.
///
/// Variants are declared in CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Flight identifier, e.g. `AB123`.
    FlightId,
    /// Three-letter origin airport code.
    Origin,
    /// Three-letter destination airport code.
    Destination,
    /// Scheduled departure timestamp.
    Departure,
    /// Scheduled arrival timestamp.
    Arrival,
    /// Ticket price.
    Price,
}

impl Field {
    /// All fields, in CSV column order.
    pub const ALL: [Self; 6] = [
        Self::FlightId,
        Self::Origin,
        Self::Destination,
        Self::Departure,
        Self::Arrival,
        Self::Price,
    ];

    /// The key used for this field in CSV headers, snapshots and queries.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FlightId => "flightid",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Departure => "departuredatetime",
            Self::Arrival => "arrivaldatetime",
            Self::Price => "price",
        }
    }

    /// A short human label, used when rendering rejection reasons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
            other => other.key(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string is not one of the six field keys.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown flight field '{0}'")]
pub struct UnknownFieldError(String);

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// A flight schedule record.
///
/// All values are kept in their textual form so that a record written to a
/// snapshot reads back exactly as it was ingested. Whether the values are
/// well-formed is decided by [`RecordValidator`](super::RecordValidator); a
/// record held by a [`FlightStore`](crate::FlightStore) has passed that check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Flight identifier.
    pub flightid: String,
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Departure timestamp.
    pub departuredatetime: String,
    /// Arrival timestamp.
    pub arrivaldatetime: String,
    /// Price.
    pub price: String,
}

impl FlightRecord {
    /// Build a record from the six values, in column order.
    #[must_use]
    pub fn new(
        flightid: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departuredatetime: impl Into<String>,
        arrivaldatetime: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            flightid: flightid.into(),
            origin: origin.into(),
            destination: destination.into(),
            departuredatetime: departuredatetime.into(),
            arrivaldatetime: arrivaldatetime.into(),
            price: price.into(),
        }
    }

    /// Build a record from a loose field map.
    ///
    /// Keys that are not field names are ignored. Fields absent from the map
    /// are left empty, which the validator reports as missing.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut record = Self::default();
        for field in Field::ALL {
            if let Some(value) = map.get(field.key()) {
                *record.get_mut(field) = value.clone();
            }
        }
        record
    }

    /// Returns the value of the given field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FlightId => &self.flightid,
            Field::Origin => &self.origin,
            Field::Destination => &self.destination,
            Field::Departure => &self.departuredatetime,
            Field::Arrival => &self.arrivaldatetime,
            Field::Price => &self.price,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FlightId => &mut self.flightid,
            Field::Origin => &mut self.origin,
            Field::Destination => &mut self.destination,
            Field::Departure => &mut self.departuredatetime,
            Field::Arrival => &mut self.arrivaldatetime,
            Field::Price => &mut self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>().unwrap(), field);
        }
        assert!("airline".parse::<Field>().is_err());
    }

    #[test]
    fn from_map_leaves_absent_fields_empty() {
        let map = BTreeMap::from([
            ("flightid".to_string(), "AB123".to_string()),
            ("price".to_string(), "99".to_string()),
            ("airline".to_string(), "XX".to_string()),
        ]);

        let record = FlightRecord::from_map(&map);

        assert_eq!(record.get(Field::FlightId), "AB123");
        assert_eq!(record.get(Field::Price), "99");
        assert!(record.origin.is_empty());
        assert!(record.arrivaldatetime.is_empty());
    }

    #[test]
    fn serializes_in_column_order() {
        let record =
            FlightRecord::new("AB1", "LHR", "JFK", "2025-11-14 1030", "2025-11-14 1530", "1");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"flightid":"AB1","origin":"LHR","destination":"JFK","departuredatetime":"2025-11-14 1030","arrivaldatetime":"2025-11-14 1530","price":"1"}"#
        );
    }
}
