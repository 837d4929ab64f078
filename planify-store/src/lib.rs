//! planify-store: owned appointment store with write-through JSON persistence

pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{
    APPOINTMENTS_FILE, Config, config_path, ensure_planify_home, load_config, planify_home,
    save_config,
};
pub use error::{StoreError, StoreResult};
pub use notify::{MemoryNotifier, Notification, Notifier, NullNotifier};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, load, save};
pub use store::{AppointmentStore, DEFAULT_UPCOMING_LIMIT};
