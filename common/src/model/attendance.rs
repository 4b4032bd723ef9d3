use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown as the check-in time of a member who has not arrived.
pub const NOT_CHECKED_IN: &str = "-";

/// Derived attendance state of a roster entry.
///
/// Never stored: a member is `Present` exactly when an attendance record
/// exists for their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Invited,
    Present,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Invited => "Invited",
            AttendanceStatus::Present => "Present",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence that a roster entry was checked in.
///
/// The display fields are copied from the roster entry at check-in time and
/// are not re-joined later, so edits to either side do not propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The record's own identifier, used by edit and delete.
    pub id: String,
    pub member_id: String,
    pub patient_name: String,
    pub hospital_name: String,
    pub major: String,
    pub status: AttendanceStatus,
    pub time: String,
}

/// Display fields an administrator may edit on an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFields {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub major: String,
}
