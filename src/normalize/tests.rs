//! Normalizer Tests
//!
//! Each backend shape seen in the wild, mapped onto the canonical models.

use serde_json::{json, Value};

use super::*;
use crate::models::{DealStage, Role};

fn object(value: Value) -> Object {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_wrapped_deal_resolves_current_stage() {
    let deal = normalize_deal(&json!({
        "success": true,
        "data": {"id": "d1", "currentStage": "Lost", "dealName": "X", "clientName": "Acme"}
    }));
    assert_eq!(deal.id, "d1");
    assert_eq!(deal.stage.as_deref(), Some("Lost"));
    assert_eq!(deal.deal_name, "X");
    assert_eq!(deal.client_name, "Acme");
    assert!(deal.notes.is_empty());
    assert_eq!(deal.known_stage(), Some(DealStage::Lost));
}

#[test]
fn test_bare_deal_is_used_as_is() {
    let deal = normalize_deal(&json!({"id": 42, "dealName": "Bare", "stage": "Closed"}));
    assert_eq!(deal.id, "42");
    assert_eq!(deal.stage.as_deref(), Some("Closed"));
}

#[test]
fn test_stage_precedence_current_stage_first() {
    let map = object(json!({"currentStage": "Prospect", "stage": "Closed", "dealStage": "Lost"}));
    assert_eq!(resolve_stage(&map).as_deref(), Some("Prospect"));
}

#[test]
fn test_stage_object_unwrapped_by_name_then_value() {
    let by_name = object(json!({"stage": {"name": "UnderEvaluation", "value": "ignored"}}));
    assert_eq!(resolve_stage(&by_name).as_deref(), Some("UnderEvaluation"));

    let by_value = object(json!({"stage": {"value": "Closed"}}));
    assert_eq!(resolve_stage(&by_value).as_deref(), Some("Closed"));

    let opaque = object(json!({"stage": {"code": 3}}));
    assert_eq!(resolve_stage(&opaque).as_deref(), Some(r#"{"code":3}"#));
}

#[test]
fn test_stage_alternates_in_order() {
    let map = object(json!({"stage_name": "Lost", "stageType": "Closed"}));
    assert_eq!(resolve_stage(&map).as_deref(), Some("Closed"));

    let map = object(json!({"stage": null, "deal_stage": "Prospect"}));
    assert_eq!(resolve_stage(&map).as_deref(), Some("Prospect"));
}

#[test]
fn test_stage_unresolved_is_none() {
    let map = object(json!({"dealName": "No stage", "stage": ""}));
    assert_eq!(resolve_stage(&map), None);
}

#[test]
fn test_stage_extractor_table_order() {
    let names: Vec<&str> = STAGE_EXTRACTORS.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["currentStage", "stage", "alternates"]);
}

#[test]
fn test_aliases_fill_only_absent_fields() {
    let deal = normalize_deal(&json!({
        "dealName": "Camel wins",
        "deal_name": "snake loses",
        "client_name": "Snake Client",
        "expected_close_date": "2026-12-31",
        "deal_value": 2500000,
        "dealType": "",
        "deal_type": "M&A"
    }));
    assert_eq!(deal.deal_name, "Camel wins");
    assert_eq!(deal.client_name, "Snake Client");
    assert_eq!(deal.expected_close_date.as_deref(), Some("2026-12-31"));
    assert_eq!(deal.deal_value, Some(2_500_000.0));
    assert_eq!(deal.deal_type.as_deref(), Some("M&A"));
}

#[test]
fn test_summary_falls_back_to_description() {
    let deal = normalize_deal(&json!({"description": "Long form"}));
    assert_eq!(deal.summary.as_deref(), Some("Long form"));
    assert_eq!(deal.description, "Long form");

    let deal = normalize_deal(&json!({"summary": "Short", "description": "Long form"}));
    assert_eq!(deal.summary.as_deref(), Some("Short"));
}

#[test]
fn test_deal_value_accepts_decimal_string() {
    let deal = normalize_deal(&json!({"dealValue": "1250000.50"}));
    assert_eq!(deal.deal_value, Some(1_250_000.5));
}

#[test]
fn test_backend_notes_mapped() {
    let deal = normalize_deal(&json!({
        "notes": [
            {"userId": "u9", "username": "ada", "noteText": "Kickoff call", "timestamp": "2026-01-05T10:00:00"},
            {"id": "n2", "content": "Follow-up", "createdDate": "2026-01-06", "createdBy": "bob"},
            "plain text note"
        ]
    }));
    assert_eq!(deal.notes.len(), 3);
    assert_eq!(deal.notes[0].id, "0");
    assert_eq!(deal.notes[0].content, "Kickoff call");
    assert_eq!(deal.notes[0].created_by, "ada");
    assert_eq!(deal.notes[0].created_date, "2026-01-05T10:00:00");
    assert_eq!(deal.notes[1].id, "n2");
    assert_eq!(deal.notes[1].created_by, "bob");
    assert_eq!(deal.notes[2].content, "plain text note");
}

#[test]
fn test_non_array_notes_become_empty() {
    let deal = normalize_deal(&json!({"notes": "oops"}));
    assert!(deal.notes.is_empty());
    let deal = normalize_deal(&json!({"notes": null}));
    assert!(deal.notes.is_empty());
}

#[test]
fn test_collection_shapes_are_equivalent() {
    let items = json!([
        {"id": "a", "dealName": "Alpha", "currentStage": "Prospect"},
        {"id": "b", "deal_name": "Beta", "stage": {"name": "Closed"}}
    ]);
    let bare = normalize_deals(&items);
    let data = normalize_deals(&json!({"data": items.clone()}));
    let content = normalize_deals(&json!({"content": items.clone(), "totalElements": 2}));
    let named = normalize_deals(&json!({"deals": items.clone()}));

    assert_eq!(bare.len(), 2);
    assert_eq!(bare, data);
    assert_eq!(bare, content);
    assert_eq!(bare, named);
    assert_eq!(bare[1].deal_name, "Beta");
    assert_eq!(bare[1].stage.as_deref(), Some("Closed"));
}

#[test]
fn test_unrecognized_collection_is_empty() {
    assert!(normalize_deals(&json!({"data": {"not": "a list"}})).is_empty());
    assert!(normalize_deals(&json!("nope")).is_empty());
    assert!(normalize_deals(&Value::Null).is_empty());
}

#[test]
fn test_total_on_garbage() {
    for input in [json!(null), json!(7), json!("x"), json!([1, 2]), json!({"data": null})] {
        let deal = normalize_deal(&input);
        assert!(deal.notes.is_empty());
    }
}

#[test]
fn test_users_role_and_enabled() {
    let users = normalize_users(&json!({"users": [
        {"id": "1", "username": "root", "roles": ["USER", "ROLE_ADMIN"], "enabled": true},
        {"_id": "2", "username": "sam", "roles": "USER", "active": false},
        {"id": 3, "username": "lee", "role": "admin"},
        {"id": "4", "username": "kim", "authorities": [{"authority": "ROLE_ADMIN"}]},
        {"id": "5", "username": "pat"}
    ]}));

    assert_eq!(users.len(), 5);
    assert_eq!(users[0].role, Role::Admin);
    assert!(users[0].enabled);
    assert_eq!(users[1].id, "2");
    assert_eq!(users[1].role, Role::User);
    assert!(!users[1].enabled);
    assert_eq!(users[2].id, "3");
    assert_eq!(users[2].role, Role::Admin);
    assert_eq!(users[3].role, Role::Admin);
    assert_eq!(users[4].role, Role::User);
    assert!(users[4].enabled);
}

#[test]
fn test_status_update_falls_back_to_request() {
    let user = normalize_status_update(&json!({"data": {"username": "sam"}}), "u2", false);
    assert_eq!(user.id, "u2");
    assert_eq!(user.username, "sam");
    assert!(!user.enabled);

    let user = normalize_status_update(&json!({"id": "u2", "enabled": true}), "u2", false);
    assert!(user.enabled);
}

#[test]
fn test_login_token_in_data() {
    let outcome = normalize_login(&json!({
        "success": true,
        "data": {"token": "  abc.def  ", "username": "ada", "email": "ada@example.com", "roles": ["ROLE_ADMIN"], "id": "u1"}
    }))
    .unwrap();
    assert_eq!(outcome.token, "abc.def");
    assert_eq!(outcome.user.username, "ada");
    assert_eq!(outcome.user.id, "u1");
    assert_eq!(outcome.user.role, Role::Admin);
    assert!(outcome.user.enabled);
}

#[test]
fn test_login_alternate_token_keys() {
    let outcome = normalize_login(&json!({"access_token": "t1", "userName": "bob", "role": "USER"})).unwrap();
    assert_eq!(outcome.token, "t1");
    assert_eq!(outcome.user.username, "bob");
    assert_eq!(outcome.user.role, Role::User);

    let outcome = normalize_login(&json!({"data": {"username": "c"}, "accessToken": "root-level"})).unwrap();
    assert_eq!(outcome.token, "root-level");
}

#[test]
fn test_login_without_token_fails() {
    let err = normalize_login(&json!({"data": {"token": "   "}})).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(normalize_login(&json!({"token": 12345})).is_err());
}
