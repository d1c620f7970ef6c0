//! Deal Calls
//!
//! Bindings for the `/deals` resource.

use crate::error::ApiResult;
use crate::models::{Deal, DealDraft, DealEdits};
use crate::normalize::{normalize_deal, normalize_deals};
use crate::validate;

use super::{segment, ApiClient};

fn deal_path(id: &str) -> String {
    format!("/deals/{}", segment(id))
}

// ========================
// Reads
// ========================

pub async fn list_deals(client: &ApiClient) -> ApiResult<Vec<Deal>> {
    let body = client.get("/deals").await?;
    let deals = normalize_deals(&body);
    tracing::debug!(count = deals.len(), "deals loaded");
    Ok(deals)
}

pub async fn get_deal(client: &ApiClient, id: &str) -> ApiResult<Deal> {
    let body = client.get(&deal_path(id)).await?;
    Ok(normalize_deal(&body))
}

// ========================
// Writes
// ========================

pub async fn create_deal(client: &ApiClient, draft: &DealDraft) -> ApiResult<Deal> {
    let request = validate::create_deal(draft)?;
    let body = client.post("/deals", &request).await?;
    let deal = normalize_deal(&body);
    tracing::info!(id = %deal.id, name = %deal.deal_name, "deal created");
    Ok(deal)
}

/// Create a deal, then send the optional value and first note as secondary
/// writes. Their failures are logged and never fail the create.
pub async fn create_deal_with_extras(
    client: &ApiClient,
    draft: &DealDraft,
    value: Option<f64>,
    note: Option<&str>,
) -> ApiResult<Deal> {
    let mut deal = create_deal(client, draft).await?;
    if deal.id.is_empty() {
        tracing::warn!("created deal has no id, skipping follow-up writes");
        return Ok(deal);
    }

    if let Some(value) = value.filter(|v| v.is_finite() && *v > 0.0) {
        match update_value(client, &deal.id, Some(value)).await {
            Ok(updated) => deal.deal_value = updated.deal_value.or(Some(value)),
            Err(e) => tracing::warn!(id = %deal.id, "initial deal value not saved: {}", e),
        }
    }

    if let Some(text) = note.filter(|n| !n.trim().is_empty()) {
        match add_note(client, &deal.id, text).await {
            Ok(updated) => deal.notes = updated.notes,
            Err(e) => tracing::warn!(id = %deal.id, "initial note not saved: {}", e),
        }
    }

    Ok(deal)
}

pub async fn update_deal(client: &ApiClient, id: &str, edits: &DealEdits) -> ApiResult<Deal> {
    let request = validate::update_deal(edits);
    if request.is_empty() {
        tracing::debug!(id, "deal update has no fields, sending empty body");
    }
    let body = client.put(&deal_path(id), &request).await?;
    Ok(normalize_deal(&body))
}

/// Accepts backend stage values and legacy aliases
pub async fn change_stage(client: &ApiClient, id: &str, stage: &str) -> ApiResult<Deal> {
    let request = validate::change_stage(stage)?;
    let body = client.patch(&format!("{}/stage", deal_path(id)), &request).await?;
    tracing::info!(id, stage = request.stage.as_str(), "stage changed");
    Ok(normalize_deal(&body))
}

pub async fn add_note(client: &ApiClient, id: &str, text: &str) -> ApiResult<Deal> {
    let request = validate::add_note(text)?;
    let body = client.post(&format!("{}/notes", deal_path(id)), &request).await?;
    Ok(normalize_deal(&body))
}

/// Admin only on the backend
pub async fn update_value(client: &ApiClient, id: &str, value: Option<f64>) -> ApiResult<Deal> {
    let request = validate::deal_value(value)?;
    let body = client.patch(&format!("{}/value", deal_path(id)), &request).await?;
    Ok(normalize_deal(&body))
}

pub async fn delete_deal(client: &ApiClient, id: &str) -> ApiResult<()> {
    client.delete(&deal_path(id)).await?;
    tracing::info!(id, "deal deleted");
    Ok(())
}
