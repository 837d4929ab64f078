//! The owned appointment store: in-memory collection, session filters,
//! write-through persistence.
//!
//! A store is constructed explicitly and handed to consumers; there is no
//! ambient global instance. Derived views (filtered list, stats, upcoming)
//! recompute in full on every read.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use planify_core::{
    Appointment, AppointmentDraft, AppointmentFilters, AppointmentStats, compute_stats,
};
use uuid::Uuid;

use crate::config::{Config, load_config};
use crate::error::{StoreError, StoreResult};
use crate::notify::{Notification, Notifier, NullNotifier};
use crate::storage::{self, FileStorage, StorageBackend};

/// Limit used by [`AppointmentStore::upcoming_default`].
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

pub struct AppointmentStore<S: StorageBackend> {
    storage: S,
    notifier: Box<dyn Notifier>,
    timezone: Tz,
    appointments: Vec<Appointment>,
    filters: AppointmentFilters,
    revision: u64,
}

impl AppointmentStore<FileStorage> {
    /// Open the store against the Planify home directory, honoring the
    /// on-disk configuration.
    pub fn open_default() -> StoreResult<Self> {
        let config = load_config()?;
        Self::open_with_config(&config)
    }

    pub fn open_with_config(config: &Config) -> StoreResult<Self> {
        let storage = FileStorage::new(config.appointments_path()?);
        Ok(Self::open(storage)?.with_timezone(config.resolve_timezone()))
    }
}

impl<S: StorageBackend> AppointmentStore<S> {
    /// Load the persisted collection once and take ownership of the
    /// backend. Corruption recovery happens here, inside the adapter.
    pub fn open(storage: S) -> StoreResult<Self> {
        let appointments = storage::load(&storage)?;
        Ok(Self {
            storage,
            notifier: Box::new(NullNotifier),
            timezone: Tz::UTC,
            appointments,
            filters: AppointmentFilters::default(),
            revision: 0,
        })
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // -- mutations --------------------------------------------------------

    /// Create a record from `draft`. Identity (UUID v4) and both timestamps
    /// are assigned here, never by the caller.
    pub fn create(&mut self, draft: AppointmentDraft) -> StoreResult<Appointment> {
        let appointment =
            Appointment::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        self.appointments.push(appointment.clone());
        self.commit()?;
        self.notifier
            .notify(Notification::new("Appointment added successfully"));
        Ok(appointment)
    }

    /// Full-record replacement. `created_at` survives, `updated_at` moves
    /// to now. An unknown id is an error, not a silent pass-through.
    pub fn update(&mut self, id: &str, draft: AppointmentDraft) -> StoreResult<Appointment> {
        let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        appointment.apply_draft(draft, Utc::now());
        let updated = appointment.clone();
        self.commit()?;
        self.notifier
            .notify(Notification::new("Appointment updated successfully"));
        Ok(updated)
    }

    /// Idempotent removal. Returns whether a record was actually removed;
    /// an unknown id removes nothing, writes nothing and notifies nobody.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.id != id);
        if self.appointments.len() == before {
            return Ok(false);
        }
        self.commit()?;
        self.notifier
            .notify(Notification::new("Appointment deleted successfully"));
        Ok(true)
    }

    /// Write-through: every mutation persists the full collection before
    /// the operation returns. The in-memory change stays applied even if
    /// the write fails.
    fn commit(&mut self) -> StoreResult<()> {
        self.revision += 1;
        storage::save(&self.storage, &self.appointments)?;
        Ok(())
    }

    // -- reads ------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// The unfiltered collection, in insertion order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Exact date matches, in collection order (not re-sorted).
    pub fn list_by_date(&self, date: NaiveDate) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect()
    }

    /// Records strictly after now in the configured timezone, ascending by
    /// start instant, truncated to `limit`.
    pub fn upcoming(&self, limit: usize) -> Vec<Appointment> {
        let now = self.now_local();
        let mut out: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.starts_at() > now)
            .cloned()
            .collect();
        out.sort_by_key(Appointment::starts_at);
        out.truncate(limit);
        out
    }

    pub fn upcoming_default(&self) -> Vec<Appointment> {
        self.upcoming(DEFAULT_UPCOMING_LIMIT)
    }

    /// The current derived view under the session filters.
    pub fn filtered(&self) -> Vec<Appointment> {
        self.filters.apply(&self.appointments)
    }

    /// Count summaries as of now. Not cached; call again whenever it is
    /// rendered.
    pub fn stats(&self) -> AppointmentStats {
        compute_stats(&self.appointments, self.today())
    }

    // -- filter control ---------------------------------------------------

    pub fn filters(&self) -> &AppointmentFilters {
        &self.filters
    }

    /// Merge `patch` into the session filters: fields set in the patch
    /// overwrite, unset fields are left alone.
    pub fn set_filters(&mut self, patch: AppointmentFilters) {
        self.filters.merge(patch);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Bumped on every successful mutation. Consumers can key memoized
    /// derived state off this instead of diffing collections.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::storage::MemoryStorage;
    use chrono::NaiveTime;
    use planify_core::{Category, Priority};

    fn draft(title: &str, date: (i32, u32, u32), time: (u32, u32)) -> AppointmentDraft {
        AppointmentDraft::new(
            title,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        )
    }

    fn store() -> AppointmentStore<MemoryStorage> {
        AppointmentStore::open(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn create_assigns_identity_and_timestamps() {
        let mut store = store();
        let a = store.create(draft("Standup", (2024, 6, 10), (9, 0))).unwrap();

        assert!(!a.id.is_empty());
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&a.id).unwrap().title, "Standup");
    }

    #[test]
    fn sequential_creates_get_distinct_ids() {
        let mut store = store();
        let mut ids = std::collections::HashSet::new();
        for i in 0..25 {
            let a = store
                .create(draft(&format!("a{i}"), (2024, 6, 10), (9, 0)))
                .unwrap();
            assert!(ids.insert(a.id));
        }
        assert_eq!(store.len(), 25);
    }

    #[test]
    fn update_preserves_created_at_and_errors_on_unknown_id() {
        let mut store = store();
        let a = store.create(draft("Standup", (2024, 6, 10), (9, 0))).unwrap();

        let updated = store
            .update(&a.id, draft("Standup (moved)", (2024, 6, 11), (9, 30)))
            .unwrap();
        assert_eq!(updated.created_at, a.created_at);
        assert!(updated.updated_at >= a.updated_at);
        assert_eq!(store.get(&a.id).unwrap().title, "Standup (moved)");

        let err = store
            .update("missing", draft("x", (2024, 6, 10), (9, 0)))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = store();
        let a = store.create(draft("Standup", (2024, 6, 10), (9, 0))).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert!(store.get(&a.id).is_none());
        assert!(!store.delete(&a.id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn mutations_write_through_and_bump_revision() {
        let mut store = store();
        assert_eq!(store.revision(), 0);

        let a = store.create(draft("Standup", (2024, 6, 10), (9, 0))).unwrap();
        assert_eq!(store.revision(), 1);

        store
            .update(&a.id, draft("Standup", (2024, 6, 10), (10, 0)))
            .unwrap();
        assert_eq!(store.revision(), 2);

        // A no-op delete leaves both the slot and the revision alone.
        store.delete("missing").unwrap();
        assert_eq!(store.revision(), 2);

        store.delete(&a.id).unwrap();
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn notifications_fire_on_successful_mutations_only() {
        let notifier = MemoryNotifier::new();
        let mut store = AppointmentStore::open(MemoryStorage::new())
            .unwrap()
            .with_notifier(Box::new(notifier.clone()));

        let a = store.create(draft("Standup", (2024, 6, 10), (9, 0))).unwrap();
        store
            .update(&a.id, draft("Standup", (2024, 6, 10), (9, 30)))
            .unwrap();
        store.delete(&a.id).unwrap();
        store.delete(&a.id).unwrap();
        let _ = store.update("missing", draft("x", (2024, 6, 10), (9, 0)));

        assert_eq!(
            notifier.messages(),
            vec![
                "Appointment added successfully",
                "Appointment updated successfully",
                "Appointment deleted successfully",
            ]
        );
    }

    #[test]
    fn list_by_date_keeps_collection_order() {
        let mut store = store();
        store.create(draft("Late", (2024, 6, 10), (15, 0))).unwrap();
        store.create(draft("Early", (2024, 6, 10), (9, 0))).unwrap();
        store.create(draft("Elsewhere", (2024, 6, 11), (9, 0))).unwrap();

        let titles: Vec<String> = store
            .list_by_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
            .into_iter()
            .map(|a| a.title)
            .collect();
        // Insertion order, deliberately not re-sorted by time.
        assert_eq!(titles, vec!["Late", "Early"]);
    }

    #[test]
    fn upcoming_is_sorted_truncated_and_strictly_future() {
        let mut store = store();
        store.create(draft("Past", (2000, 1, 1), (9, 0))).unwrap();
        store.create(draft("Far", (2999, 1, 3), (9, 0))).unwrap();
        store.create(draft("Near", (2999, 1, 1), (9, 0))).unwrap();
        store.create(draft("Mid", (2999, 1, 2), (9, 0))).unwrap();

        let titles: Vec<String> = store
            .upcoming(2)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Near", "Mid"]);

        assert_eq!(store.upcoming_default().len(), 3);
    }

    #[test]
    fn filter_control_merges_and_clears() {
        let mut store = store();
        let mut meeting = draft("Standup", (2024, 6, 10), (9, 0));
        meeting.category = Some(Category::Meeting);
        meeting.priority = Some(Priority::Medium);
        store.create(meeting).unwrap();

        let mut dentist = draft("Dentist", (2024, 6, 10), (15, 0));
        dentist.category = Some(Category::Appointment);
        dentist.priority = Some(Priority::High);
        store.create(dentist).unwrap();

        store.set_filters(AppointmentFilters {
            category: Some(Category::Meeting),
            ..Default::default()
        });
        assert_eq!(store.filtered().len(), 1);
        assert_eq!(store.filtered()[0].title, "Standup");

        // Merging another field narrows further instead of replacing.
        store.set_filters(AppointmentFilters {
            priority: Some(Priority::High),
            ..Default::default()
        });
        assert!(store.filtered().is_empty());
        assert_eq!(store.filters().category, Some(Category::Meeting));

        store.clear_filters();
        assert_eq!(store.filtered().len(), 2);
    }
}
