mod evaluator_tests;
mod memory_tests;
mod transaction_tests;

use serde_json::{json, Value};

use crate::store::Document;

/// Build a document from a JSON object literal
pub(super) fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub(super) fn house(id: &str, city: &str, price: f64) -> Document {
    doc(json!({
        "_id": id,
        "title": format!("House in {city}"),
        "description": "Open floor plan with granite countertops",
        "property_type": "residential",
        "current_price": price,
        "location": { "city": city, "state": "TX" },
    }))
}
