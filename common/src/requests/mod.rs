use crate::model::attendance::AttendanceFields;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/add-attendance`.
///
/// Creates a record directly, without resolving a token and without checking
/// whether the member is already present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceAddRequest {
    #[serde(default)]
    pub member_id: String,
    #[serde(flatten)]
    pub fields: AttendanceFields,
}

/// Body of `PUT /api/update-attendance/{id}`.
pub type UpdateAttendanceRequest = AttendanceFields;
