use serde::{Deserialize, Serialize};

/// One attendee as imported from the roster upload, plus the bearer token
/// printed in their scannable code.
///
/// The token is generated server side when the entry is imported. Anyone who
/// holds it can open the entry's scan view, so it must never be derived from
/// the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Identifier supplied by the roster file. Primary key for attendance.
    pub id: String,
    pub patient_name: String,
    pub hospital_name: String,
    pub major: String,
    pub token: String,
}

/// A decoded roster row before a token has been attached.
///
/// Columns missing from a row decode as empty strings; rows are stored as
/// they arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub major: String,
}

impl RosterRow {
    pub fn with_token(self, token: String) -> RosterEntry {
        RosterEntry {
            id: self.id,
            patient_name: self.patient_name,
            hospital_name: self.hospital_name,
            major: self.major,
            token,
        }
    }
}
