//! Frontend Models
//!
//! Canonical shapes consumed by views, plus the exact request bodies the
//! backend accepts.

use serde::{Deserialize, Serialize};

/// Deal in canonical shape (see `normalize` for how it is built)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub deal_name: String,
    /// Only sent to admins
    pub deal_value: Option<f64>,
    /// Backend stage value; `None` when the response carried no recognizable stage
    pub stage: Option<String>,
    pub client_name: String,
    pub deal_type: Option<String>,
    pub sector: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub expected_close_date: Option<String>,
    pub created_date: Option<String>,
    pub last_modified_date: Option<String>,
    pub created_by: Option<String>,
    pub notes: Vec<DealNote>,
}

impl Deal {
    /// Name shown in lists and confirmations
    pub fn display_name(&self) -> &str {
        if self.deal_name.is_empty() { &self.client_name } else { &self.deal_name }
    }

    /// Stage resolved against the backend vocabulary (legacy values included)
    pub fn known_stage(&self) -> Option<DealStage> {
        self.stage.as_deref().and_then(DealStage::from_input)
    }
}

/// Append-only note attached to a deal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealNote {
    pub id: String,
    pub content: String,
    pub created_date: String,
    pub created_by: String,
}

/// Stage vocabulary accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStage {
    Prospect,
    UnderEvaluation,
    TermSheetSubmitted,
    Closed,
    Lost,
}

/// Older six-value UI vocabulary mapped onto the backend stages
pub const LEGACY_STAGE_ALIASES: &[(&str, DealStage)] = &[
    ("PROSPECTING", DealStage::Prospect),
    ("QUALIFICATION", DealStage::UnderEvaluation),
    ("PROPOSAL", DealStage::TermSheetSubmitted),
    ("NEGOTIATION", DealStage::TermSheetSubmitted),
    ("CLOSED_WON", DealStage::Closed),
    ("CLOSED_LOST", DealStage::Lost),
];

impl DealStage {
    pub const ALL: [DealStage; 5] = [
        DealStage::Prospect,
        DealStage::UnderEvaluation,
        DealStage::TermSheetSubmitted,
        DealStage::Closed,
        DealStage::Lost,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Prospect => "Prospect",
            DealStage::UnderEvaluation => "UnderEvaluation",
            DealStage::TermSheetSubmitted => "TermSheetSubmitted",
            DealStage::Closed => "Closed",
            DealStage::Lost => "Lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealStage::Prospect => "Prospect",
            DealStage::UnderEvaluation => "Under Evaluation",
            DealStage::TermSheetSubmitted => "Term Sheet Submitted",
            DealStage::Closed => "Closed",
            DealStage::Lost => "Lost",
        }
    }

    /// Exact match against the backend vocabulary
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == value)
    }

    /// Legacy alias first, then the backend vocabulary
    pub fn from_input(value: &str) -> Option<Self> {
        let value = value.trim();
        LEGACY_STAGE_ALIASES
            .iter()
            .find(|(legacy, _)| *legacy == value)
            .map(|(_, stage)| *stage)
            .or_else(|| Self::parse(value))
    }
}

/// Coarse role; drives the single admin gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// `ADMIN` / `ROLE_ADMIN` in any case is admin, everything else is user
    pub fn from_claim(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "ADMIN" | "ROLE_ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// User in canonical shape; also the record cached in durable storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ========================
// Form Inputs
// ========================

/// Raw create-deal form values, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealDraft {
    pub deal_name: String,
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    pub summary: String,
    pub stage: String,
}

/// Raw edit-deal form values; `None` means the field was not touched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealEdits {
    pub summary: Option<String>,
    pub sector: Option<String>,
    pub deal_type: Option<String>,
}

/// Raw create-user form values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

// ========================
// Request Bodies
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub deal_name: String,
    pub client_name: String,
    pub deal_type: String,
    pub sector: String,
    pub summary: String,
    pub current_stage: DealStage,
}

/// Partial update: omitted fields are left untouched by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<String>,
}

impl UpdateDealRequest {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.sector.is_none() && self.deal_type.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStageRequest {
    pub stage: DealStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteRequest {
    pub note_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValueRequest {
    pub deal_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Body of `PUT /admin/users/{id}/status`.
///
/// The endpoint names the flag `active` while [`User::enabled`] carries the
/// same meaning; `active == enabled`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateUserStatusRequest {
    pub active: bool,
}

impl UpdateUserStatusRequest {
    pub fn from_enabled(enabled: bool) -> Self {
        Self { active: enabled }
    }
}
