//! Filter evaluation and patch application

use estate_shared::GeoPoint;
use serde_json::json;

use super::doc;
use crate::store::memory::{apply_patch, matches};
use crate::store::{Filter, Patch};

const TEXT_FIELDS: &[&str] = &["title", "description"];

#[test]
fn test_eq_matches_nested_paths_and_array_members() {
    let d = doc(json!({
        "location": { "city": "Austin" },
        "amenities": ["pool", "garage"],
    }));

    assert!(matches(&d, &Filter::eq("location.city", "Austin"), None).unwrap());
    assert!(matches(&d, &Filter::eq("amenities", "pool"), None).unwrap());
    assert!(!matches(&d, &Filter::eq("amenities", "gym"), None).unwrap());
}

#[test]
fn test_null_equality_matches_missing_field() {
    let broadcast = doc(json!({ "title": "Maintenance" }));
    let direct = doc(json!({ "title": "Hi", "user_id": "u1" }));

    let filter = Filter::eq("user_id", serde_json::Value::Null);
    assert!(matches(&broadcast, &filter, None).unwrap());
    assert!(!matches(&direct, &filter, None).unwrap());
}

#[test]
fn test_numeric_bounds_compare_ints_and_floats() {
    let d = doc(json!({ "current_price": 525000.0, "bedrooms": 3 }));

    assert!(matches(&d, &Filter::gte("current_price", 500000), None).unwrap());
    assert!(matches(&d, &Filter::lte("current_price", 525000), None).unwrap());
    assert!(!matches(&d, &Filter::lte("current_price", 400000.5), None).unwrap());
    assert!(matches(&d, &Filter::eq("bedrooms", 3.0), None).unwrap());
    assert!(!matches(&d, &Filter::gte("missing", 0), None).unwrap());
}

#[test]
fn test_contains_ci_escapes_user_input() {
    let d = doc(json!({ "location": { "city": "San Antonio" } }));

    assert!(matches(&d, &Filter::contains_ci("location.city", "antonio"), None).unwrap());
    assert!(!matches(&d, &Filter::contains_ci("location.city", "San.*"), None).unwrap());

    let literal = doc(json!({ "location": { "city": "San.*" } }));
    assert!(matches(&literal, &Filter::contains_ci("location.city", "san.*"), None).unwrap());
}

#[test]
fn test_text_search_requires_text_index() {
    let d = doc(json!({ "title": "Luxury Villa", "description": "Resort-style pool" }));

    assert!(matches(&d, &Filter::Text("pool".into()), Some(TEXT_FIELDS)).unwrap());
    assert!(matches(&d, &Filter::Text("garage villa".into()), Some(TEXT_FIELDS)).unwrap());
    assert!(!matches(&d, &Filter::Text("cottage".into()), Some(TEXT_FIELDS)).unwrap());
    assert!(matches(&d, &Filter::Text("pool".into()), None).is_err());
}

#[test]
fn test_within_radius_uses_great_circle_distance() {
    let austin = GeoPoint::new(-97.7431, 30.2672).unwrap();
    let d = doc(json!({ "location": { "geo": austin } }));
    let near_downtown = GeoPoint::new(-97.75, 30.27).unwrap();
    let houston = GeoPoint::new(-95.3698, 29.7604).unwrap();

    let filter = |center, max_distance_meters| Filter::WithinRadius {
        field: "location.geo".into(),
        center,
        max_distance_meters,
    };

    assert!(matches(&d, &filter(near_downtown, 10_000.0), None).unwrap());
    assert!(!matches(&d, &filter(houston, 10_000.0), None).unwrap());
    assert!(matches(&d, &filter(houston, 300_000.0), None).unwrap());
}

#[test]
fn test_empty_or_matches_nothing_and_empty_and_matches_everything() {
    let d = doc(json!({ "status": "pending" }));

    assert!(!matches(&d, &Filter::Or(vec![]), None).unwrap());
    assert!(matches(&d, &Filter::And(vec![]), None).unwrap());
    assert!(matches(&d, &Filter::all_of(vec![]), None).unwrap());
}

#[test]
fn test_and_flattens_and_absorbs_all() {
    let combined = Filter::All
        .and(Filter::eq("a", 1))
        .and(Filter::eq("b", 2).and(Filter::eq("c", 3)));

    assert_eq!(
        combined,
        Filter::And(vec![Filter::eq("a", 1), Filter::eq("b", 2), Filter::eq("c", 3)])
    );
}

#[test]
fn test_patch_set_inc_push_and_unset() {
    let mut d = doc(json!({ "views_count": 1, "price_history": [] }));

    let patch = Patch::new()
        .set("status", "active")
        .set("location.city", "Austin")
        .inc("views_count", 2)
        .push("price_history", json!({ "price": 10 }))
        .push("tags", "new");

    assert!(apply_patch(&mut d, &patch).unwrap());
    assert_eq!(d["status"], "active");
    assert_eq!(d["location"]["city"], "Austin");
    assert_eq!(d["views_count"], 3);
    assert_eq!(d["price_history"].as_array().unwrap().len(), 1);
    assert_eq!(d["tags"], json!(["new"]));

    assert!(apply_patch(&mut d, &Patch::new().unset("tags")).unwrap());
    assert!(!d.contains_key("tags"));
}

#[test]
fn test_patch_reports_unchanged_documents() {
    let mut d = doc(json!({ "status": "verified" }));
    assert!(!apply_patch(&mut d, &Patch::new().set("status", "verified")).unwrap());
}

#[test]
fn test_patch_rejects_id_and_type_mismatches() {
    let mut d = doc(json!({ "_id": "x", "title": "text" }));

    assert!(apply_patch(&mut d, &Patch::new().set("_id", "y")).is_err());
    assert!(apply_patch(&mut d, &Patch::new().inc("title", 1)).is_err());
    assert!(apply_patch(&mut d, &Patch::new().push("title", 1)).is_err());
    assert_eq!(d["_id"], "x");
}
