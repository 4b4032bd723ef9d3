//! Roster and attendance rules.
//!
//! A roster entry starts out `Invited`. Checking it in writes an attendance
//! record, and the existence of that record is what makes the entry
//! `Present`; status is never stored on its own. The check-in transition runs
//! at most once per member: the store performs the existence check and the
//! insert as a single atomic write.
//!
//! Administrator-only operations take the caller's [`Identity`] as an
//! argument and fail with `Unauthorized` for anyone else.

use crate::error::CheckinError;
use crate::store::RecordStore;
use crate::token;
use chrono::Local;
use common::model::attendance::{
    AttendanceFields, AttendanceRecord, AttendanceStatus, NOT_CHECKED_IN,
};
use common::model::roster::{RosterEntry, RosterRow};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Format of the check-in timestamp stored on attendance records.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Who is making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Admin,
    Anonymous,
}

impl Identity {
    pub fn is_admin(self) -> bool {
        matches!(self, Identity::Admin)
    }

    pub fn require_admin(self) -> Result<(), CheckinError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CheckinError::unauthorized())
        }
    }
}

/// Derived attendance of one roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStatus {
    pub status: AttendanceStatus,
    /// Check-in time, or [`NOT_CHECKED_IN`] while invited.
    pub time: String,
}

pub struct Manager {
    store: Arc<dyn RecordStore>,
    preserve_tokens: bool,
}

impl Manager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Manager {
            store,
            preserve_tokens: false,
        }
    }

    /// When set, re-importing a known id keeps its existing token instead of
    /// issuing a new one.
    pub fn with_preserved_tokens(mut self, preserve: bool) -> Self {
        self.preserve_tokens = preserve;
        self
    }

    /// Upserts `rows` into the roster, attaching a token to each, and returns
    /// how many rows were written.
    ///
    /// Rows are not validated. By default every row gets a freshly generated
    /// token, so re-importing an id invalidates the codes already handed out
    /// for it.
    pub fn import_roster(
        &self,
        identity: Identity,
        rows: Vec<RosterRow>,
    ) -> Result<usize, CheckinError> {
        identity.require_admin()?;

        let existing: HashMap<String, String> = if self.preserve_tokens {
            self.store
                .members()?
                .into_iter()
                .map(|entry| (entry.id, entry.token))
                .collect()
        } else {
            HashMap::new()
        };

        let entries: Vec<RosterEntry> = rows
            .into_iter()
            .map(|row| {
                let token = existing
                    .get(&row.id)
                    .cloned()
                    .unwrap_or_else(token::generate);
                row.with_token(token)
            })
            .collect();

        self.store.upsert_members(&entries)?;
        info!("imported {} roster rows", entries.len());
        Ok(entries.len())
    }

    pub fn list_roster(&self, identity: Identity) -> Result<Vec<RosterEntry>, CheckinError> {
        identity.require_admin()?;
        Ok(self.store.members()?)
    }

    pub fn resolve_by_token(&self, token: &str) -> Result<RosterEntry, CheckinError> {
        self.store
            .member_by_token(token)?
            .ok_or_else(CheckinError::member_not_found)
    }

    pub fn resolve_by_id(&self, id: &str) -> Result<RosterEntry, CheckinError> {
        self.store
            .member_by_id(id)?
            .ok_or_else(CheckinError::member_not_found)
    }

    /// Reads the entry's attendance from the store on every call.
    pub fn status_of(&self, entry: &RosterEntry) -> Result<MemberStatus, CheckinError> {
        Ok(match self.store.attendance_for_member(&entry.id)? {
            Some(record) => MemberStatus {
                status: AttendanceStatus::Present,
                time: record.time,
            },
            None => MemberStatus {
                status: AttendanceStatus::Invited,
                time: NOT_CHECKED_IN.to_string(),
            },
        })
    }

    /// Scan view for a token. Holding the token is the only requirement.
    pub fn member_view(&self, token: &str) -> Result<(RosterEntry, MemberStatus), CheckinError> {
        let entry = self.resolve_by_token(token)?;
        let status = self.status_of(&entry)?;
        Ok((entry, status))
    }

    /// Moves the entry holding `token` from `Invited` to `Present`.
    ///
    /// Fails with `Conflict` when the member already has an attendance
    /// record; in that case nothing is written.
    pub fn check_in(
        &self,
        identity: Identity,
        token: &str,
    ) -> Result<AttendanceRecord, CheckinError> {
        if !identity.is_admin() {
            return Err(CheckinError::login_required());
        }
        let entry = self.resolve_by_token(token)?;
        let record = new_record(
            entry.id,
            AttendanceFields {
                patient_name: entry.patient_name,
                hospital_name: entry.hospital_name,
                major: entry.major,
            },
        );

        if self.store.insert_attendance_if_absent(&record)? {
            info!("member {} checked in at {}", record.member_id, record.time);
            Ok(record)
        } else {
            Err(CheckinError::Conflict("Already marked present".to_string()))
        }
    }

    pub fn list_attendance(
        &self,
        identity: Identity,
    ) -> Result<Vec<AttendanceRecord>, CheckinError> {
        identity.require_admin()?;
        Ok(self.store.attendance()?)
    }

    /// Writes an attendance record for `member_id` without resolving a token
    /// and without the one-record-per-member guard.
    pub fn force_add_attendance(
        &self,
        identity: Identity,
        member_id: String,
        fields: AttendanceFields,
    ) -> Result<AttendanceRecord, CheckinError> {
        identity.require_admin()?;
        if self.store.attendance_for_member(&member_id)?.is_some() {
            warn!("force-adding a second attendance record for member {member_id}");
        }
        let record = new_record(member_id, fields);
        self.store.insert_attendance(&record)?;
        info!("attendance record {} force-added", record.id);
        Ok(record)
    }

    /// Edits the display fields of record `id`. Status and time are kept.
    pub fn update_attendance(
        &self,
        identity: Identity,
        id: &str,
        fields: &AttendanceFields,
    ) -> Result<(), CheckinError> {
        identity.require_admin()?;
        if self.store.update_attendance(id, fields)? {
            Ok(())
        } else {
            Err(record_not_found())
        }
    }

    /// Deletes record `id`, which returns its member to `Invited`.
    pub fn delete_attendance(&self, identity: Identity, id: &str) -> Result<(), CheckinError> {
        identity.require_admin()?;
        if self.store.delete_attendance(id)? {
            info!("attendance record {id} deleted");
            Ok(())
        } else {
            Err(record_not_found())
        }
    }

    /// URL encoded into an entry's scannable code.
    pub fn code_url_for(entry: &RosterEntry, base_url: &str) -> String {
        format!(
            "{}/scan?token={}",
            base_url.trim_end_matches('/'),
            entry.token
        )
    }
}

fn new_record(member_id: String, fields: AttendanceFields) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        member_id,
        patient_name: fields.patient_name,
        hospital_name: fields.hospital_name,
        major: fields.major,
        status: AttendanceStatus::Present,
        time: Local::now().format(TIME_FORMAT).to_string(),
    }
}

fn record_not_found() -> CheckinError {
    CheckinError::NotFound("Attendance record not found".to_string())
}
