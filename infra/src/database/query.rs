//! Translation between the core query language and BSON.

use bson::oid::ObjectId;
use bson::{doc, Bson};
use estate_core::errors::{StoreError, StoreResult};
use estate_core::store::{Document, Filter, FindOptions, IndexKey, Patch, PatchOp, Sort, SortOrder, ID_FIELD};
use estate_shared::EARTH_RADIUS_METERS;
use serde_json::Value;

/// Convert a JSON value into BSON
pub fn to_bson(value: &Value) -> StoreResult<Bson> {
    bson::to_bson(value).map_err(|e| StoreError::serialization(e.to_string()))
}

pub fn to_bson_document(document: &Document) -> StoreResult<bson::Document> {
    bson::to_document(document).map_err(|e| StoreError::serialization(e.to_string()))
}

/// Convert a stored document back to JSON. Server-generated `ObjectId`
/// identifiers become their hex string.
pub fn from_bson_document(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Bson::ObjectId(oid) if key == ID_FIELD => Value::String(oid.to_hex()),
                other => other.into_relaxed_extjson(),
            };
            (key, value)
        })
        .collect()
}

/// Translate a filter into a query document
pub fn filter_to_bson(filter: &Filter) -> StoreResult<bson::Document> {
    Ok(match filter {
        Filter::All => doc! {},
        Filter::Eq(field, value) if field == ID_FIELD => id_condition(value)?,
        Filter::Eq(field, value) => doc! { field: to_bson(value)? },
        Filter::Ne(field, value) => doc! { field: { "$ne": to_bson(value)? } },
        Filter::Gte(field, value) => doc! { field: { "$gte": to_bson(value)? } },
        Filter::Lte(field, value) => doc! { field: { "$lte": to_bson(value)? } },
        Filter::In(field, values) => {
            let values = values.iter().map(to_bson).collect::<StoreResult<Vec<_>>>()?;
            doc! { field: { "$in": values } }
        }
        Filter::Exists(field, exists) => doc! { field: { "$exists": *exists } },
        Filter::Matches { field, pattern } => doc! { field: { "$regex": pattern.as_str(), "$options": "i" } },
        Filter::Text(query) => doc! { "$text": { "$search": query.as_str() } },
        Filter::WithinRadius {
            field,
            center,
            max_distance_meters,
        } => {
            let radians = max_distance_meters / EARTH_RADIUS_METERS;
            doc! {
                field: {
                    "$geoWithin": {
                        "$centerSphere": [[center.longitude(), center.latitude()], radians]
                    }
                }
            }
        }
        Filter::And(filters) if filters.is_empty() => doc! {},
        Filter::And(filters) => doc! { "$and": translate_all(filters)? },
        // Nothing satisfies an empty disjunction
        Filter::Or(filters) if filters.is_empty() => doc! { ID_FIELD: { "$in": [] } },
        Filter::Or(filters) => doc! { "$or": translate_all(filters)? },
    })
}

fn translate_all(filters: &[Filter]) -> StoreResult<Vec<bson::Document>> {
    filters.iter().map(filter_to_bson).collect()
}

/// Identifier match. A hex string that parses as an `ObjectId` also matches
/// documents whose `_id` was generated by the server.
fn id_condition(value: &Value) -> StoreResult<bson::Document> {
    match value.as_str().map(ObjectId::parse_str) {
        Some(Ok(oid)) => Ok(doc! { ID_FIELD: { "$in": [to_bson(value)?, oid] } }),
        _ => Ok(doc! { ID_FIELD: to_bson(value)? }),
    }
}

/// Translate a patch into an update document grouped by operator
pub fn patch_to_update(patch: &Patch) -> StoreResult<bson::Document> {
    let mut set = bson::Document::new();
    let mut unset = bson::Document::new();
    let mut inc = bson::Document::new();
    let mut push = bson::Document::new();

    for op in patch.ops() {
        match op {
            PatchOp::Set(field, value) => {
                set.insert(field.as_str(), to_bson(value)?);
            }
            PatchOp::Unset(field) => {
                unset.insert(field.as_str(), "");
            }
            PatchOp::Inc(field, by) => {
                inc.insert(field.as_str(), *by);
            }
            PatchOp::Push(field, value) => {
                push.insert(field.as_str(), to_bson(value)?);
            }
        }
    }

    let mut update = bson::Document::new();
    for (operator, fields) in [("$set", set), ("$unset", unset), ("$inc", inc), ("$push", push)] {
        if !fields.is_empty() {
            update.insert(operator, fields);
        }
    }
    Ok(update)
}

pub fn sort_to_bson(sort: &Sort) -> bson::Document {
    let direction = match sort.order {
        SortOrder::Ascending => 1,
        SortOrder::Descending => -1,
    };
    doc! { sort.field.as_str(): direction }
}

pub fn find_options(options: &FindOptions) -> mongodb::options::FindOptions {
    let mut find = mongodb::options::FindOptions::default();
    find.limit = options.limit.map(|limit| limit as i64);
    find.sort = options.sort.as_ref().map(sort_to_bson);
    find
}

/// Key document for an index specification
pub fn index_keys(keys: &[IndexKey]) -> bson::Document {
    keys.iter()
        .map(|key| {
            let kind = match key {
                IndexKey::Ascending(_) => Bson::Int32(1),
                IndexKey::Descending(_) => Bson::Int32(-1),
                IndexKey::Text(_) => Bson::String("text".to_string()),
                IndexKey::Geo2dSphere(_) => Bson::String("2dsphere".to_string()),
            };
            (key.field().to_string(), kind)
        })
        .collect()
}
