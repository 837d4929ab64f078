//! Appointment record and mutation payload types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed category vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    #[serde(rename = "meeting")]
    Meeting,
    #[serde(rename = "appointment")]
    Appointment,
    #[serde(rename = "reminder")]
    Reminder,
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "other")]
    Other,
}

impl Category {
    /// All categories, in display order. Stats buckets are keyed off this.
    pub const ALL: [Category; 6] = [
        Category::Meeting,
        Category::Appointment,
        Category::Reminder,
        Category::Task,
        Category::Event,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Appointment => "appointment",
            Self::Reminder => "reminder",
            Self::Task => "task",
            Self::Event => "event",
            Self::Other => "other",
        }
    }
}

/// Urgency scale for an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "urgent")]
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frequency {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

/// Recurrence descriptor, stored verbatim on the record.
///
/// Patterns are never expanded into concrete occurrences; consumers that
/// need occurrences derive them on their side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPattern {
    #[serde(rename = "type")]
    pub frequency: Frequency,
    /// Every N days/weeks/months/years.
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// 0-6, Sunday through Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    /// 1-31.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u8>,
}

/// The core record.
///
/// Identity and timestamps belong to the store; everything else is replaced
/// wholesale on update from an [`AppointmentDraft`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    pub title: String,
    /// Calendar date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Wall-clock time of day, stored as HH:MM.
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn from_draft(id: impl Into<String>, draft: AppointmentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            date: draft.date,
            time: draft.time,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            duration: draft.duration,
            location: draft.location,
            attendees: draft.attendees,
            is_recurring: draft.is_recurring,
            recurring_pattern: draft.recurring_pattern,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every consumer-editable field. `id` and `created_at` are
    /// untouched; `updated_at` moves to `now`.
    pub fn apply_draft(&mut self, draft: AppointmentDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.date = draft.date;
        self.time = draft.time;
        self.description = draft.description;
        self.category = draft.category;
        self.priority = draft.priority;
        self.duration = draft.duration;
        self.location = draft.location;
        self.attendees = draft.attendees;
        self.is_recurring = draft.is_recurring;
        self.recurring_pattern = draft.recurring_pattern;
        self.updated_at = now;
    }

    /// Combined (date, time) instant, the sort key for derived views.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Full-record mutation payload: everything the consumer edits, nothing the
/// store assigns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,
}

impl AppointmentDraft {
    /// New draft with the editing surface's defaults: category
    /// `appointment`, priority `medium`, one hour long.
    pub fn new(title: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            title: title.into(),
            date,
            time,
            description: String::new(),
            category: Some(Category::Appointment),
            priority: Some(Priority::Medium),
            duration: Some(60),
            location: None,
            attendees: Vec::new(),
            is_recurring: false,
            recurring_pattern: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_recurrence(mut self, pattern: RecurringPattern) -> Self {
        self.is_recurring = true;
        self.recurring_pattern = Some(pattern);
        self
    }

    /// Add an attendee, trimming whitespace and suppressing exact-string
    /// duplicates. Returns whether the name was actually added.
    ///
    /// Dedup happens only at input time; it is not a store invariant.
    pub fn push_attendee(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.attendees.iter().any(|a| a == name) {
            return false;
        }
        self.attendees.push(name.to_string());
        true
    }
}

/// Wall-clock times travel as "HH:MM" in the storage blob.
mod time_hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
