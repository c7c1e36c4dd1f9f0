//! Event validation rules
//!
//! Each rule is a standalone function so it can be exercised on its own;
//! `validate_fields` composes the per-event rules, while `check_uniqueness`
//! needs the owner's other events and is run by the repository inside the
//! same critical section as the write it guards.

use chrono::NaiveTime;
use thiserror::Error;

use super::entity::{Event, EventFields};
use crate::domain::DomainError;

pub const MIN_DAY_OF_WEEK: i64 = 0;
pub const MAX_DAY_OF_WEEK: i64 = 6;

/// Errors produced by the event validation rules
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventValidationError {
    #[error("Ensure this value is between 0 and 6 (got {0})")]
    DayOfWeekOutOfRange(i64),

    #[error("Start time must be lesser than finish time")]
    InvalidInterval {
        start: NaiveTime,
        finish: NaiveTime,
    },

    #[error("Title may not be blank")]
    BlankTitle,

    #[error("The fields owner, day_of_week, start_time, title must make a unique set")]
    Duplicate,
}

impl EventValidationError {
    /// Field the error belongs to; `None` for errors spanning several fields
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::DayOfWeekOutOfRange(_) => Some("day_of_week"),
            Self::BlankTitle => Some("title"),
            Self::InvalidInterval { .. } | Self::Duplicate => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::DayOfWeekOutOfRange(_) => "out_of_range",
            Self::InvalidInterval { .. } => "non_field_error",
            Self::BlankTitle => "blank",
            Self::Duplicate => "unique",
        }
    }
}

impl From<EventValidationError> for DomainError {
    fn from(err: EventValidationError) -> Self {
        let base = match err.field() {
            Some(field) => DomainError::field_validation(field, err.to_string()),
            None => DomainError::validation(err.to_string()),
        };

        base.with_code(err.code())
    }
}

/// Event values that passed every per-event rule
///
/// Only `validate_fields` builds one, so holding a `ValidFields` means the
/// day range, interval and title rules already hold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFields {
    pub(super) day_of_week: i16,
    pub(super) start_time: NaiveTime,
    pub(super) finish_time: NaiveTime,
    pub(super) title: String,
    pub(super) description: String,
}

/// Day of week must lie in `[0, 6]`
pub fn validate_day_of_week(value: i64) -> Result<i16, EventValidationError> {
    if !(MIN_DAY_OF_WEEK..=MAX_DAY_OF_WEEK).contains(&value) {
        return Err(EventValidationError::DayOfWeekOutOfRange(value));
    }

    Ok(value as i16)
}

/// Start must be strictly before finish; equal times are rejected
pub fn validate_interval(start: NaiveTime, finish: NaiveTime) -> Result<(), EventValidationError> {
    if start >= finish {
        return Err(EventValidationError::InvalidInterval { start, finish });
    }

    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::BlankTitle);
    }

    Ok(())
}

/// `candidate` must not share `(owner, day_of_week, start_time, title)` with
/// any other event in `existing`; the candidate itself is skipped by id
pub fn check_uniqueness<'a, I>(candidate: &Event, existing: I) -> Result<(), EventValidationError>
where
    I: IntoIterator<Item = &'a Event>,
{
    if existing.into_iter().any(|other| candidate.collides_with(other)) {
        return Err(EventValidationError::Duplicate);
    }

    Ok(())
}

/// Run the per-event rules over effective values
pub fn validate_fields(fields: EventFields) -> Result<ValidFields, EventValidationError> {
    let day_of_week = validate_day_of_week(fields.day_of_week)?;
    validate_interval(fields.start_time, fields.finish_time)?;
    validate_title(&fields.title)?;

    Ok(ValidFields {
        day_of_week,
        start_time: fields.start_time,
        finish_time: fields.finish_time,
        title: fields.title,
        description: fields.description,
    })
}
