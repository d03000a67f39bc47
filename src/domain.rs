//! Domain models for flight schedules.
//!
//! This module contains the flight record itself, the rules used to accept or
//! reject a record, and the predicates used to query accepted records.

/// The six-field flight record.
pub mod record;
pub use record::{Field, FlightRecord};

/// Structured rejection reasons.
pub mod reason;
pub use reason::Reason;

mod timestamp;
pub use timestamp::DatetimeLayouts;

/// Per-field checks and the record-level combinator.
pub mod validator;
pub use validator::{RecordValidator, ValidationOutcome};

/// Query constraints and matching semantics.
pub mod query;
pub use query::{Matcher, Query, QueryMode};

mod config;
pub use config::{Config, Operator};
