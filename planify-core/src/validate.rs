//! Form-layer validation rules for mutation payloads.
//!
//! The store accepts any draft as-is; these rules are what the editing
//! surface enforces before calling in. Exposed here so consumers do not
//! each reimplement them.

use thiserror::Error;

use crate::appointment::AppointmentDraft;

/// Shortest allowed duration; drafts also snap to multiples of this.
pub const MIN_DURATION_MINUTES: u32 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("duration must be at least 15 minutes")]
    DurationTooShort,
    #[error("duration must be a multiple of 15 minutes")]
    DurationOffStep,
    #[error("recurrence interval must be at least 1")]
    ZeroInterval,
    #[error("day of week {0} is outside 0-6")]
    DayOfWeekOutOfRange(u8),
    #[error("day of month {0} is outside 1-31")]
    DayOfMonthOutOfRange(u8),
    #[error("recurrence end date precedes the appointment date")]
    EndBeforeStart,
}

/// First rule violation wins. A recurring flag without a pattern is fine
/// (the editing surface submits exactly that), as is a pattern without the
/// flag.
pub fn validate_draft(draft: &AppointmentDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if let Some(duration) = draft.duration {
        if duration < MIN_DURATION_MINUTES {
            return Err(ValidationError::DurationTooShort);
        }
        if duration % MIN_DURATION_MINUTES != 0 {
            return Err(ValidationError::DurationOffStep);
        }
    }

    if let Some(pattern) = &draft.recurring_pattern {
        if pattern.interval == 0 {
            return Err(ValidationError::ZeroInterval);
        }
        if let Some(days) = &pattern.days_of_week {
            if let Some(&day) = days.iter().find(|&&day| day > 6) {
                return Err(ValidationError::DayOfWeekOutOfRange(day));
            }
        }
        if let Some(day) = pattern.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(ValidationError::DayOfMonthOutOfRange(day));
            }
        }
        if let Some(end) = pattern.end_date {
            if end < draft.date {
                return Err(ValidationError::EndBeforeStart);
            }
        }
    }

    Ok(())
}
