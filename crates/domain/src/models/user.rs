use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::staff::StaffRole;

/// The signed-in account returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
}

/// Request body for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
