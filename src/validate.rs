//! Write-Payload Validators
//!
//! Each mutating call checks its input here first. A failure is returned as
//! [`ApiError::Validation`] and no request is sent.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AddNoteRequest, CreateDealRequest, CreateUserRequest, DealDraft, DealEdits, DealStage, Role,
    UpdateDealRequest, UpdateStageRequest, UpdateValueRequest, UserDraft,
};

fn stage_list() -> String {
    DealStage::ALL.iter().map(DealStage::as_str).collect::<Vec<_>>().join(", ")
}

/// Trimmed value, or `None` if nothing is left
fn trimmed(value: &str) -> Option<String> {
    let t = value.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// All six fields required; strings trimmed; stage must be a backend value
pub fn create_deal(draft: &DealDraft) -> ApiResult<CreateDealRequest> {
    let required = [
        trimmed(&draft.deal_name),
        trimmed(&draft.client_name),
        trimmed(&draft.deal_type),
        trimmed(&draft.sector),
        trimmed(&draft.summary),
        trimmed(&draft.stage),
    ];

    let [Some(deal_name), Some(client_name), Some(deal_type), Some(sector), Some(summary), Some(stage)] = required
    else {
        tracing::warn!("create deal rejected: missing required fields");
        return Err(ApiError::validation(
            "All fields (dealName, clientName, dealType, sector, summary, currentStage) are required",
        ));
    };

    let current_stage = DealStage::parse(&stage).ok_or_else(|| {
        tracing::warn!(stage = %stage, "create deal rejected: invalid stage");
        ApiError::validation(format!("Invalid currentStage. Must be one of: {}", stage_list()))
    })?;

    Ok(CreateDealRequest { deal_name, client_name, deal_type, sector, summary, current_stage })
}

/// Partial update: blank or missing fields are left out of the payload.
/// An edit with nothing left is still sent, as `{}`.
pub fn update_deal(edits: &DealEdits) -> UpdateDealRequest {
    UpdateDealRequest {
        summary: edits.summary.as_deref().and_then(trimmed),
        sector: edits.sector.as_deref().and_then(trimmed),
        deal_type: edits.deal_type.as_deref().and_then(trimmed),
    }
}

/// Legacy aliases are mapped before checking the backend vocabulary
pub fn change_stage(input: &str) -> ApiResult<UpdateStageRequest> {
    DealStage::from_input(input)
        .map(|stage| UpdateStageRequest { stage })
        .ok_or_else(|| {
            tracing::warn!(stage = %input, "stage change rejected");
            ApiError::validation(format!("Invalid stage. Must be one of: {}", stage_list()))
        })
}

pub fn add_note(text: &str) -> ApiResult<AddNoteRequest> {
    trimmed(text)
        .map(|note_text| AddNoteRequest { note_text })
        .ok_or_else(|| ApiError::validation("Note cannot be empty"))
}

/// Value must be a finite number greater than zero
pub fn deal_value(value: Option<f64>) -> ApiResult<UpdateValueRequest> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(UpdateValueRequest { deal_value: v }),
        _ => Err(ApiError::validation("Deal value must be a positive number")),
    }
}

pub fn create_user(draft: &UserDraft) -> ApiResult<CreateUserRequest> {
    let (Some(username), Some(email), Some(_)) =
        (trimmed(&draft.username), trimmed(&draft.email), trimmed(&draft.password))
    else {
        return Err(ApiError::validation("Username, email and password are required"));
    };

    if !email.contains('@') {
        return Err(ApiError::validation("Email address is not valid"));
    }

    let role = match draft.role.trim().to_uppercase().as_str() {
        "" | "USER" => Role::User,
        "ADMIN" => Role::Admin,
        other => return Err(ApiError::validation(format!("Unknown role: {other}"))),
    };

    // passwords are sent verbatim; only blank ones are refused
    Ok(CreateUserRequest { username, email, password: draft.password.clone(), role })
}
