// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the employee management backend and its clients.
//! This module defines the domain records, the role profiles attached at login,
//! and the request/response bodies of the HTTP API.

pub mod pagination;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a user account
pub type UserId = Uuid;

/// Supported kinds of users on this platform
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Invalid or unknown kind of user
    #[default]
    Unknown,
    /// Administrative user
    Administrator,
    /// Agent acting on behalf of partners
    Agent,
    /// Partner organisation account
    Partner,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Unknown => "Unknown",
            Kind::Administrator => "Administrator",
            Kind::Agent => "Agent",
            Kind::Partner => "Partner",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    /// Hashed password, never sent to clients
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub kind: Kind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrator profile of a user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: i64,
    pub user_id: UserId,
    pub active: bool,
}

/// Agent profile of a user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: i64,
    pub user_id: UserId,
    pub active: bool,
}

/// Link between an agent and a partner it works for
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentPartner {
    pub agent_id: i64,
    pub partner_id: i64,
}

/// Partner organisation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub active: bool,
    /// Free-form settings blob, see [`PartnerSettings`]
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// Typed view over [`Partner::settings`]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PartnerSettings {
    /// Daily work window as `("HH:MM", "HH:MM")`
    #[serde(default, alias = "workTime")]
    pub work_time: Option<(Option<String>, Option<String>)>,
}

impl Partner {
    /// Decode the settings blob. A missing blob yields the defaults.
    pub fn settings(&self) -> Result<PartnerSettings, serde_json::Error> {
        if self.settings.is_null() {
            return Ok(PartnerSettings::default());
        }
        serde_json::from_value(self.settings.clone())
    }
}

/// Agent profile with the partners resolved at login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub agent: Agent,
    pub partners: Vec<Partner>,
}

/// Role-specific record attached to a user during authentication
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum RoleProfile {
    Administrator(Admin),
    Agent(AgentProfile),
    Unknown,
}

/// A user together with its resolved role profile
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrichedUser {
    pub user: User,
    pub role: RoleProfile,
}

impl EnrichedUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }
}

/// Employee record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub department_id: i64,
    pub position: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of an employee creation request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewEmployee {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub department_id: i64,
    pub position: String,
}

/// Columns that may change on an existing employee
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub department_id: i64,
    pub position: String,
}

/// Response to an employee deletion
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeleteEmployeeResponse {
    pub deleted_employee_id: i64,
}

/// Department record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub department_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a department creation request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewDepartment {
    pub department_name: String,
}

/// Login credentials
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a refresh request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response to a successful login or refresh
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    /// Access token
    pub token: String,
    /// Refresh token
    pub refresh: String,
    pub user: EnrichedUser,
    pub access_token_expiry: DateTime<Utc>,
    pub refresh_token_expiry: DateTime<Utc>,
}
