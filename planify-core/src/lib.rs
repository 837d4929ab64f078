//! planify-core: domain types and derived views for the Planify appointment store

pub mod appointment;
pub mod filter;
pub mod stats;
pub mod validate;

pub use appointment::{
    Appointment, AppointmentDraft, Category, Frequency, Priority, RecurringPattern,
};
pub use filter::{AppointmentFilters, DateRange};
pub use stats::{AppointmentStats, compute_stats};
pub use validate::{MIN_DURATION_MINUTES, ValidationError, validate_draft};
