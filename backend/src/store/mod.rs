//! Record storage behind the roster and attendance rules.
//!
//! The manager only talks to a [`RecordStore`]; `SqliteStore` is the
//! implementation the server runs on. Every call goes to the backing store,
//! nothing is cached between calls.

mod sqlite;

pub use sqlite::SqliteStore;

use common::model::attendance::{AttendanceFields, AttendanceRecord};
use common::model::roster::RosterEntry;

/// Failure reported by the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    Poisoned,
}

/// The two collections the check-in service works with.
pub trait RecordStore: Send + Sync {
    /// All roster entries in import order.
    fn members(&self) -> Result<Vec<RosterEntry>, StoreError>;

    fn member_by_id(&self, id: &str) -> Result<Option<RosterEntry>, StoreError>;

    fn member_by_token(&self, token: &str) -> Result<Option<RosterEntry>, StoreError>;

    /// Inserts or fully replaces entries keyed by `id`. Either the whole batch
    /// is written or none of it.
    fn upsert_members(&self, entries: &[RosterEntry]) -> Result<(), StoreError>;

    /// All attendance records in insertion order.
    fn attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// The earliest attendance record for a member, if any.
    fn attendance_for_member(
        &self,
        member_id: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Inserts `record` only when no record exists for its `member_id`, as a
    /// single atomic step. Returns whether the record was written.
    fn insert_attendance_if_absent(&self, record: &AttendanceRecord) -> Result<bool, StoreError>;

    /// Inserts `record` unconditionally.
    fn insert_attendance(&self, record: &AttendanceRecord) -> Result<(), StoreError>;

    /// Overwrites the display fields of record `id`. Returns whether it existed.
    fn update_attendance(&self, id: &str, fields: &AttendanceFields) -> Result<bool, StoreError>;

    /// Removes record `id`. Returns whether it existed.
    fn delete_attendance(&self, id: &str) -> Result<bool, StoreError>;
}
