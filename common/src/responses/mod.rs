//! JSON bodies returned by the backend. Every body carries a `success` flag
//! so clients can branch without inspecting the status code.

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::roster::RosterEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Outcome {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Outcome {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub success: bool,
    pub members: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub success: bool,
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeImageResponse {
    pub success: bool,
    #[serde(rename = "qrImage")]
    pub qr_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

/// What the scan page shows for a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    pub success: bool,
    pub member: RosterEntry,
    pub status: AttendanceStatus,
    pub time: String,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}
