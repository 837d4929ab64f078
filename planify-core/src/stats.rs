//! Count summaries over the full, unfiltered collection.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::appointment::{Appointment, Category, Priority};

/// Derived, read-only snapshot.
///
/// Only valid for the `today` it was computed against; recompute on every
/// render rather than caching across time boundaries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total: usize,
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
    /// All six category keys are always present, zero-filled.
    pub by_category: BTreeMap<Category, usize>,
    /// All four priority keys are always present, zero-filled.
    pub by_priority: BTreeMap<Priority, usize>,
}

/// Single pass over the collection.
///
/// Records with no category or priority contribute to no bucket, so `total`
/// need not equal the sum of either bucket map. Week containment uses the
/// ISO week of `today`; month containment is the calendar month.
pub fn compute_stats(appointments: &[Appointment], today: NaiveDate) -> AppointmentStats {
    let mut by_category: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    let mut by_priority: BTreeMap<Priority, usize> =
        Priority::ALL.iter().map(|p| (*p, 0)).collect();

    let mut today_count = 0;
    let mut this_week = 0;
    let mut this_month = 0;

    for appointment in appointments {
        if let Some(category) = appointment.category {
            *by_category.entry(category).or_insert(0) += 1;
        }
        if let Some(priority) = appointment.priority {
            *by_priority.entry(priority).or_insert(0) += 1;
        }

        if appointment.date == today {
            today_count += 1;
        }
        if appointment.date.iso_week() == today.iso_week() {
            this_week += 1;
        }
        if appointment.date.year() == today.year() && appointment.date.month() == today.month() {
            this_month += 1;
        }
    }

    AppointmentStats {
        total: appointments.len(),
        today: today_count,
        this_week,
        this_month,
        by_category,
        by_priority,
    }
}
