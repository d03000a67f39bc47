use std::fmt;

use super::Field;

/// Maximum length of a flight identifier, in characters.
pub const MAX_FLIGHTID_LEN: usize = 8;

/// Why a flight identifier was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlightIdError {
    /// The identifier is empty or longer than [`MAX_FLIGHTID_LEN`].
    EmptyOrTooLong {
        /// Length of the offending identifier, in characters.
        len: usize,
    },
    /// The identifier contains something other than letters and digits.
    NotAlphanumeric,
}

impl fmt::Display for FlightIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyOrTooLong { len: 0 } => write!(f, "missing flightid field"),
            Self::EmptyOrTooLong { .. } => write!(
                f,
                "flightid too long (more than {MAX_FLIGHTID_LEN} characters)"
            ),
            Self::NotAlphanumeric => write!(f, "invalid flightid format"),
        }
    }
}

/// An airport code that is not three uppercase letters, or is not allowed.
///
/// The field name is supplied by the caller when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid code")]
pub struct InvalidCode;

/// Why a timestamp was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DatetimeError {
    /// Empty input.
    #[error("missing datetime")]
    Missing,
    /// Input does not match any accepted layout.
    #[error("invalid datetime")]
    Invalid,
}

/// Why a price was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// Empty input.
    #[error("missing price field")]
    MissingPrice,
    /// Input is not a decimal number.
    #[error("invalid price format")]
    InvalidFormat,
    /// Input is a number below zero.
    #[error("negative price value")]
    NegativePrice,
}

/// A single reason a record was rejected.
///
/// Each variant carries enough structure to be matched on; [`fmt::Display`]
/// renders the message written to the error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// A required field is empty.
    MissingField(Field),
    /// The flight identifier is malformed.
    FlightId(FlightIdError),
    /// The origin or destination is not an acceptable airport code.
    InvalidCode(Field),
    /// The departure or arrival timestamp does not parse.
    InvalidDatetime(Field),
    /// Arrival is at or before departure.
    ArrivalBeforeDeparture,
    /// The price is malformed or negative.
    Price(PriceError),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {field} field"),
            Self::FlightId(e) => write!(f, "{e}"),
            Self::InvalidCode(field) => write!(f, "invalid {} code", field.label()),
            Self::InvalidDatetime(field) => write!(f, "invalid {} datetime", field.label()),
            Self::ArrivalBeforeDeparture => write!(f, "arrival before departure"),
            Self::Price(e) => write!(f, "{e}"),
        }
    }
}

impl From<FlightIdError> for Reason {
    fn from(err: FlightIdError) -> Self {
        Self::FlightId(err)
    }
}

impl From<PriceError> for Reason {
    fn from(err: PriceError) -> Self {
        Self::Price(err)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Reason::MissingField(Field::Departure), "missing departuredatetime field")]
    #[test_case(Reason::FlightId(FlightIdError::EmptyOrTooLong { len: 0 }), "missing flightid field")]
    #[test_case(Reason::FlightId(FlightIdError::EmptyOrTooLong { len: 9 }), "flightid too long (more than 8 characters)")]
    #[test_case(Reason::FlightId(FlightIdError::NotAlphanumeric), "invalid flightid format")]
    #[test_case(Reason::InvalidCode(Field::Origin), "invalid origin code")]
    #[test_case(Reason::InvalidCode(Field::Destination), "invalid destination code")]
    #[test_case(Reason::InvalidDatetime(Field::Arrival), "invalid arrival datetime")]
    #[test_case(Reason::ArrivalBeforeDeparture, "arrival before departure")]
    #[test_case(Reason::Price(PriceError::NegativePrice), "negative price value")]
    fn renders_log_message(reason: Reason, expected: &str) {
        assert_eq!(reason.to_string(), expected);
    }
}
