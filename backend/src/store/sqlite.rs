use super::{RecordStore, StoreError};
use common::model::attendance::{AttendanceFields, AttendanceRecord, AttendanceStatus};
use common::model::roster::RosterEntry;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS members (
    id            TEXT PRIMARY KEY,
    patient_name  TEXT NOT NULL,
    hospital_name TEXT NOT NULL,
    major         TEXT NOT NULL,
    token         TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS attendance (
    id            TEXT PRIMARY KEY,
    member_id     TEXT NOT NULL,
    patient_name  TEXT NOT NULL,
    hospital_name TEXT NOT NULL,
    major         TEXT NOT NULL,
    status        TEXT NOT NULL,
    time          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS attendance_member_id ON attendance (member_id);
";

const MEMBER_COLUMNS: &str = "id, patient_name, hospital_name, major, token";
const ATTENDANCE_COLUMNS: &str = "id, member_id, patient_name, hospital_name, major, status, time";

/// Other connections may hold the write lock while we wait.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`RecordStore`].
///
/// One connection is shared behind a mutex; callers are expected to run on a
/// blocking thread since every method performs synchronous I/O.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<RosterEntry> {
    Ok(RosterEntry {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        hospital_name: row.get(2)?,
        major: row.get(3)?,
        token: row.get(4)?,
    })
}

fn attendance_from_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    let status: String = row.get(5)?;
    Ok(AttendanceRecord {
        id: row.get(0)?,
        member_id: row.get(1)?,
        patient_name: row.get(2)?,
        hospital_name: row.get(3)?,
        major: row.get(4)?,
        status: if status == AttendanceStatus::Invited.as_str() {
            AttendanceStatus::Invited
        } else {
            AttendanceStatus::Present
        },
        time: row.get(6)?,
    })
}

impl RecordStore for SqliteStore {
    fn members(&self) -> Result<Vec<RosterEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY rowid"
        ))?;
        let members = stmt
            .query_map([], member_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn member_by_id(&self, id: &str) -> Result<Option<RosterEntry>, StoreError> {
        let conn = self.lock()?;
        let member = conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"),
                params![id],
                member_from_row,
            )
            .optional()?;
        Ok(member)
    }

    fn member_by_token(&self, token: &str) -> Result<Option<RosterEntry>, StoreError> {
        let conn = self.lock()?;
        let member = conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE token = ?1"),
                params![token],
                member_from_row,
            )
            .optional()?;
        Ok(member)
    }

    fn upsert_members(&self, entries: &[RosterEntry]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO members (id, patient_name, hospital_name, major, token)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (id) DO UPDATE SET
                     patient_name = excluded.patient_name,
                     hospital_name = excluded.hospital_name,
                     major = excluded.major,
                     token = excluded.token",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.id,
                    entry.patient_name,
                    entry.hospital_name,
                    entry.major,
                    entry.token
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY rowid"
        ))?;
        let records = stmt
            .query_map([], attendance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn attendance_for_member(
        &self,
        member_id: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {ATTENDANCE_COLUMNS} FROM attendance
                     WHERE member_id = ?1 ORDER BY rowid LIMIT 1"
                ),
                params![member_id],
                attendance_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn insert_attendance_if_absent(&self, record: &AttendanceRecord) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        // Guard and insert are one statement so SQLite applies them atomically.
        let inserted = conn.execute(
            &format!(
                "INSERT INTO attendance ({ATTENDANCE_COLUMNS})
                 SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
                 WHERE NOT EXISTS (SELECT 1 FROM attendance WHERE member_id = ?2)"
            ),
            params![
                record.id,
                record.member_id,
                record.patient_name,
                record.hospital_name,
                record.major,
                record.status.as_str(),
                record.time
            ],
        )?;
        Ok(inserted == 1)
    }

    fn insert_attendance(&self, record: &AttendanceRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO attendance ({ATTENDANCE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                record.id,
                record.member_id,
                record.patient_name,
                record.hospital_name,
                record.major,
                record.status.as_str(),
                record.time
            ],
        )?;
        Ok(())
    }

    fn update_attendance(&self, id: &str, fields: &AttendanceFields) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE attendance SET patient_name = ?1, hospital_name = ?2, major = ?3
             WHERE id = ?4",
            params![fields.patient_name, fields.hospital_name, fields.major, id],
        )?;
        Ok(updated > 0)
    }

    fn delete_attendance(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM attendance WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("in-memory database")
    }

    fn entry(id: &str, token: &str) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            patient_name: format!("patient {id}"),
            hospital_name: "General".to_string(),
            major: "CS".to_string(),
            token: token.to_string(),
        }
    }

    fn record(id: &str, member_id: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            member_id: member_id.to_string(),
            patient_name: "A".to_string(),
            hospital_name: "H1".to_string(),
            major: "CS".to_string(),
            status: AttendanceStatus::Present,
            time: "2026-01-01 09:00:00".to_string(),
        }
    }

    #[rstest]
    fn upsert_replaces_existing_entry(store: SqliteStore) {
        store
            .upsert_members(&[entry("1", "t1"), entry("2", "t2")])
            .expect("first upsert");
        let mut replacement = entry("1", "t3");
        replacement.major = "Law".to_string();
        store.upsert_members(&[replacement]).expect("second upsert");

        let members = store.members().expect("members");
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, "1");
        assert_eq!(members[0].major, "Law");
        assert_eq!(members[0].token, "t3");
        assert!(store.member_by_token("t1").expect("lookup").is_none());
    }

    #[rstest]
    fn failed_upsert_writes_nothing(store: SqliteStore) {
        // The second row reuses the first row's token and violates the unique index.
        let result = store.upsert_members(&[entry("1", "same"), entry("2", "same")]);

        assert!(result.is_err());
        assert!(store.members().expect("members").is_empty());
    }

    #[rstest]
    fn lookups_return_none_for_unknown_keys(store: SqliteStore) {
        store.upsert_members(&[entry("1", "t1")]).expect("upsert");

        assert!(store.member_by_id("2").expect("by id").is_none());
        assert!(store.member_by_token("nope").expect("by token").is_none());
        assert_eq!(
            store.member_by_id("1").expect("by id").map(|m| m.token),
            Some("t1".to_string())
        );
    }

    #[rstest]
    fn conditional_insert_refuses_second_record(store: SqliteStore) {
        assert!(store
            .insert_attendance_if_absent(&record("a", "1"))
            .expect("first insert"));
        assert!(!store
            .insert_attendance_if_absent(&record("b", "1"))
            .expect("second insert"));
        assert!(store
            .insert_attendance_if_absent(&record("c", "2"))
            .expect("other member"));

        assert_eq!(store.attendance().expect("attendance").len(), 2);
    }

    #[rstest]
    fn unconditional_insert_allows_duplicates(store: SqliteStore) {
        store.insert_attendance(&record("a", "1")).expect("first");
        store.insert_attendance(&record("b", "1")).expect("second");

        let records = store.attendance().expect("attendance");
        assert_eq!(records.len(), 2);
        assert_eq!(
            store
                .attendance_for_member("1")
                .expect("lookup")
                .map(|r| r.id),
            Some("a".to_string())
        );
    }

    #[rstest]
    fn update_touches_display_fields_only(store: SqliteStore) {
        store.insert_attendance(&record("a", "1")).expect("insert");
        let fields = AttendanceFields {
            patient_name: "B".to_string(),
            hospital_name: "H2".to_string(),
            major: "Math".to_string(),
        };

        assert!(store.update_attendance("a", &fields).expect("update"));
        assert!(!store.update_attendance("missing", &fields).expect("update"));

        let updated = store
            .attendance_for_member("1")
            .expect("lookup")
            .expect("record");
        assert_eq!(updated.patient_name, "B");
        assert_eq!(updated.major, "Math");
        assert_eq!(updated.status, AttendanceStatus::Present);
        assert_eq!(updated.time, "2026-01-01 09:00:00");
    }

    #[rstest]
    fn delete_reports_whether_record_existed(store: SqliteStore) {
        store.insert_attendance(&record("a", "1")).expect("insert");

        assert!(store.delete_attendance("a").expect("delete"));
        assert!(!store.delete_attendance("a").expect("delete again"));
        assert!(store.attendance_for_member("1").expect("lookup").is_none());
    }

    #[test]
    fn file_database_survives_reopen() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        {
            let store = SqliteStore::open(file.path()).expect("open");
            store.upsert_members(&[entry("1", "t1")]).expect("upsert");
        }
        let reopened = SqliteStore::open(file.path()).expect("reopen");
        assert_eq!(reopened.members().expect("members").len(), 1);
    }
}
