//! Field rules for flight records.
//!
//! The per-field checks are plain functions. [`RecordValidator`] owns the
//! configurable parts (the origin allow-list and the accepted timestamp
//! layouts) and combines the field checks into a [`ValidationOutcome`].

use std::{collections::BTreeSet, sync::LazyLock};

use chrono::NaiveDateTime;
use nonempty::NonEmpty;
use regex::Regex;

use super::{
    reason::{DatetimeError, FlightIdError, InvalidCode, MAX_FLIGHTID_LEN, PriceError},
    DatetimeLayouts, Field, FlightRecord, Reason,
};

/// Origin codes accepted when no other allow-list is configured.
pub const DEFAULT_ORIGIN_CODES: [&str; 14] = [
    "LHR", "JFK", "FRA", "RIX", "OSL", "HEL", "CDG", "DXB", "AMS", "ARN", "DOH", "SYD", "LAX",
    "BRU",
];

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}{3}$").expect("pattern is valid"));

/// Check a flight identifier: 1 to 8 letters or digits.
///
/// # Errors
///
/// Returns [`FlightIdError::EmptyOrTooLong`] for an empty or over-long
/// identifier and [`FlightIdError::NotAlphanumeric`] if any character is not
/// a letter or digit.
pub fn validate_flightid(s: &str) -> Result<(), FlightIdError> {
    let len = s.chars().count();
    if len == 0 || len > MAX_FLIGHTID_LEN {
        return Err(FlightIdError::EmptyOrTooLong { len });
    }
    if !s.chars().all(char::is_alphanumeric) {
        return Err(FlightIdError::NotAlphanumeric);
    }
    Ok(())
}

/// Check that `s` is shaped like an airport code: exactly three uppercase
/// letters.
///
/// # Errors
///
/// Returns [`InvalidCode`] otherwise.
pub fn validate_code(s: &str) -> Result<(), InvalidCode> {
    if CODE_PATTERN.is_match(s) {
        Ok(())
    } else {
        Err(InvalidCode)
    }
}

/// Parse a price and check it is not negative.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns the matching [`PriceError`] for empty, non-numeric, or negative
/// input.
pub fn validate_price(s: &str) -> Result<f64, PriceError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(PriceError::MissingPrice);
    }
    let price: f64 = s.parse().map_err(|_| PriceError::InvalidFormat)?;
    if price < 0.0 {
        return Err(PriceError::NegativePrice);
    }
    Ok(price)
}

/// The verdict on a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every check passed.
    Accepted,
    /// At least one check failed; reasons are in check order.
    Rejected(NonEmpty<Reason>),
}

impl ValidationOutcome {
    /// Returns `true` if the record was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection reasons, or nothing if accepted.
    #[must_use]
    pub fn reasons(&self) -> Vec<Reason> {
        match self {
            Self::Accepted => Vec::new(),
            Self::Rejected(reasons) => reasons.iter().copied().collect(),
        }
    }

    fn from_reasons(reasons: Vec<Reason>) -> Self {
        NonEmpty::from_vec(reasons).map_or(Self::Accepted, Self::Rejected)
    }
}

/// Validates flight records.
///
/// The allow-list and the timestamp layouts are fixed at construction, so a
/// validator can be shared freely and tests can build one with a different
/// allow-list without touching global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValidator {
    origin_codes: BTreeSet<String>,
    layouts: DatetimeLayouts,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN_CODES, DatetimeLayouts::default())
    }
}

impl RecordValidator {
    /// Create a validator with the given origin allow-list and timestamp
    /// layouts.
    pub fn new<I, S>(origin_codes: I, layouts: DatetimeLayouts) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origin_codes: origin_codes.into_iter().map(Into::into).collect(),
            layouts,
        }
    }

    /// Create a validator from the settings in `config`.
    #[must_use]
    pub fn from_config(config: &super::Config) -> Self {
        Self::new(config.origin_codes().iter().cloned(), config.datetime_layouts())
    }

    /// The timestamp layouts this validator accepts.
    #[must_use]
    pub const fn layouts(&self) -> DatetimeLayouts {
        self.layouts
    }

    /// Check that `code` is a well-formed airport code on the origin
    /// allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCode`] if the code is malformed or not allowed.
    pub fn validate_origin_allowlist(&self, code: &str) -> Result<(), InvalidCode> {
        validate_code(code)?;
        if self.origin_codes.contains(code) {
            Ok(())
        } else {
            Err(InvalidCode)
        }
    }

    /// Parse a timestamp in one of the accepted layouts.
    ///
    /// # Errors
    ///
    /// Returns [`DatetimeError::Missing`] for empty input and
    /// [`DatetimeError::Invalid`] if no layout matches.
    pub fn validate_datetime(&self, s: &str) -> Result<NaiveDateTime, DatetimeError> {
        if s.is_empty() {
            return Err(DatetimeError::Missing);
        }
        self.layouts.parse(s).ok_or(DatetimeError::Invalid)
    }

    /// Validate a whole record.
    ///
    /// A record with any empty (or blank) field is rejected with a single
    /// [`Reason::MissingField`] and nothing else is checked. Otherwise every
    /// check runs and all failures are reported, in field order, with the
    /// arrival-after-departure check placed just before the price check.
    #[must_use]
    pub fn validate_record(&self, record: &FlightRecord) -> ValidationOutcome {
        if let Some(field) = Field::ALL
            .into_iter()
            .find(|&field| record.get(field).trim().is_empty())
        {
            return ValidationOutcome::Rejected(NonEmpty::new(Reason::MissingField(field)));
        }

        let mut reasons = Vec::new();

        if let Err(e) = validate_flightid(&record.flightid) {
            reasons.push(e.into());
        }
        if self.validate_origin_allowlist(&record.origin).is_err() {
            reasons.push(Reason::InvalidCode(Field::Origin));
        }
        if validate_code(&record.destination).is_err() {
            reasons.push(Reason::InvalidCode(Field::Destination));
        }

        let departure = self.validate_datetime(&record.departuredatetime);
        if departure.is_err() {
            reasons.push(Reason::InvalidDatetime(Field::Departure));
        }
        let arrival = self.validate_datetime(&record.arrivaldatetime);
        if arrival.is_err() {
            reasons.push(Reason::InvalidDatetime(Field::Arrival));
        }
        if let (Ok(departure), Ok(arrival)) = (departure, arrival) {
            if arrival <= departure {
                reasons.push(Reason::ArrivalBeforeDeparture);
            }
        }

        if let Err(e) = validate_price(&record.price) {
            reasons.push(e.into());
        }

        ValidationOutcome::from_reasons(reasons)
    }
}
