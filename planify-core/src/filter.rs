//! Composable filtering over the appointment collection.
//!
//! Each specified field contributes one predicate pass; a record must pass
//! every one of them. Absent fields impose no constraint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, Category, Priority};

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Transient query descriptor. Held by the consumer session only, never
/// persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl AppointmentFilters {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.priority.is_none()
            && self.date_range.is_none()
            && self.search.is_none()
    }

    /// Partial update: fields set in `patch` overwrite, unset fields keep
    /// their current value.
    pub fn merge(&mut self, patch: AppointmentFilters) {
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(range) = patch.date_range {
            self.date_range = Some(range);
        }
        if let Some(search) = patch.search {
            self.search = Some(search);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when the record passes every specified predicate.
    ///
    /// A record with no category (or priority) fails an equality filter on
    /// that field. The text search is case-insensitive over title,
    /// description and location; a missing location is non-matching for
    /// that field only.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(category) = self.category {
            if appointment.category != Some(category) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if appointment.priority != Some(priority) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(appointment.date) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = appointment.title.to_lowercase().contains(&needle)
                || appointment.description.to_lowercase().contains(&needle)
                || appointment
                    .location
                    .as_deref()
                    .is_some_and(|location| location.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Derived view: the matching subset of `appointments`, ascending by
    /// combined (date, time) instant. Ordering beyond that key is not
    /// guaranteed.
    pub fn apply(&self, appointments: &[Appointment]) -> Vec<Appointment> {
        let mut out: Vec<Appointment> = appointments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect();
        out.sort_by_key(Appointment::starts_at);
        out
    }
}
