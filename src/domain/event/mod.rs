//! Weekly event domain
//!
//! An event recurs every week on one day, between a start and a finish time
//! of day, and belongs to exactly one user.

mod entity;
mod repository;
pub mod time_format;
mod validation;

pub use entity::{Event, EventFields, EventId, EventPatch};
pub use repository::EventRepository;
pub use validation::{
    check_uniqueness, validate_day_of_week, validate_fields, validate_interval, validate_title,
    EventValidationError, ValidFields, MAX_DAY_OF_WEEK, MIN_DAY_OF_WEEK,
};
