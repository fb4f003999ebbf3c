//! Filter evaluation and patch application over JSON documents.

use std::cmp::Ordering;

use estate_shared::GeoPoint;
use regex::RegexBuilder;
use serde_json::{Map, Number, Value};

use crate::errors::{StoreError, StoreResult};
use crate::store::query::{Document, Filter, Patch, PatchOp, Sort, SortOrder};

/// Resolve a dotted path inside a document
pub(crate) fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn parent_mut<'a>(doc: &'a mut Document, path: &str) -> StoreResult<(&'a mut Map<String, Value>, String)> {
    let mut parts: Vec<&str> = path.split('.').collect();
    let last = parts
        .pop()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| StoreError::backend(format!("invalid field path '{}'", path)))?;

    let mut current = doc;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::backend(format!(
                    "cannot create field '{}' inside non-object '{}'",
                    path, part
                )))
            }
        };
    }
    Ok((current, last.to_string()))
}

/// Evaluate `filter` against `doc`. `text_fields` lists the fields covered
/// by the collection's text index; `None` means the collection has none.
pub(crate) fn matches(doc: &Document, filter: &Filter, text_fields: Option<&[&str]>) -> StoreResult<bool> {
    Ok(match filter {
        Filter::All => true,
        Filter::Eq(field, expected) => field_equals(get_path(doc, field), expected),
        Filter::Ne(field, expected) => !field_equals(get_path(doc, field), expected),
        Filter::Gte(field, bound) => any_value(get_path(doc, field), |v| {
            matches!(compare(v, bound), Some(Ordering::Greater | Ordering::Equal))
        }),
        Filter::Lte(field, bound) => any_value(get_path(doc, field), |v| {
            matches!(compare(v, bound), Some(Ordering::Less | Ordering::Equal))
        }),
        Filter::In(field, candidates) => {
            let actual = get_path(doc, field);
            candidates.iter().any(|c| field_equals(actual, c))
        }
        Filter::Exists(field, exists) => get_path(doc, field).is_some() == *exists,
        Filter::Matches { field, pattern } => {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| StoreError::backend(format!("invalid pattern '{}': {}", pattern, e)))?;
            any_value(get_path(doc, field), |v| v.as_str().map(|s| regex.is_match(s)).unwrap_or(false))
        }
        Filter::Text(term) => {
            let fields = text_fields.ok_or_else(|| StoreError::backend("text search requires a text index"))?;
            text_matches(doc, fields, term)
        }
        Filter::WithinRadius {
            field,
            center,
            max_distance_meters,
        } => match get_path(doc, field).map(|v| serde_json::from_value::<GeoPoint>(v.clone())) {
            Some(Ok(point)) => point.distance_meters(center) <= *max_distance_meters,
            _ => false,
        },
        Filter::And(filters) => {
            for f in filters {
                if !matches(doc, f, text_fields)? {
                    return Ok(false);
                }
            }
            true
        }
        Filter::Or(filters) => {
            for f in filters {
                if matches(doc, f, text_fields)? {
                    return Ok(true);
                }
            }
            false
        }
    })
}

/// Whether any term of `query` occurs in any text-indexed field
fn text_matches(doc: &Document, fields: &[&str], query: &str) -> bool {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return false;
    }
    fields
        .iter()
        .filter_map(|field| get_path(doc, field).and_then(Value::as_str))
        .map(str::to_lowercase)
        .any(|text| terms.iter().any(|term| text.contains(term.as_str())))
}

/// Equality with array-contains semantics; `null` also matches a missing field
fn field_equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(Value::Array(items)) if !expected.is_array() => items.iter().any(|item| values_equal(item, expected)),
        Some(value) => values_equal(value, expected),
    }
}

fn any_value(actual: Option<&Value>, predicate: impl Fn(&Value) -> bool) -> bool {
    match actual {
        None => false,
        Some(Value::Array(items)) => items.iter().any(&predicate),
        Some(value) => predicate(value),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between two scalars of the same kind
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Sort documents in place; missing fields order before present ones
pub(crate) fn sort_documents<T>(items: &mut [T], sort: &Sort, doc_of: impl Fn(&T) -> &Document) {
    items.sort_by(|a, b| {
        let ordering = match (get_path(doc_of(a), &sort.field), get_path(doc_of(b), &sort.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
        };
        match sort.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Apply a patch to a document; returns whether its content changed
pub(crate) fn apply_patch(doc: &mut Document, patch: &Patch) -> StoreResult<bool> {
    let before = doc.clone();
    for op in patch.ops() {
        if op.field() == crate::store::record::ID_FIELD {
            return Err(StoreError::backend("the _id field is immutable"));
        }
        match op {
            PatchOp::Set(field, value) => {
                let (parent, key) = parent_mut(doc, field)?;
                parent.insert(key, value.clone());
            }
            PatchOp::Unset(field) => {
                let (parent, key) = parent_mut(doc, field)?;
                parent.remove(&key);
            }
            PatchOp::Inc(field, by) => {
                let (parent, key) = parent_mut(doc, field)?;
                let next = match parent.get(&key) {
                    None | Some(Value::Null) => Value::from(*by),
                    Some(Value::Number(n)) => increment(n, *by)?,
                    Some(_) => {
                        return Err(StoreError::backend(format!("cannot increment non-numeric field '{}'", field)))
                    }
                };
                parent.insert(key, next);
            }
            PatchOp::Push(field, value) => {
                let (parent, key) = parent_mut(doc, field)?;
                let slot = parent.entry(key).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                match slot {
                    Value::Array(items) => items.push(value.clone()),
                    _ => return Err(StoreError::backend(format!("cannot push onto non-array field '{}'", field))),
                }
            }
        }
    }
    Ok(*doc != before)
}

fn increment(current: &Number, by: i64) -> StoreResult<Value> {
    if let Some(i) = current.as_i64() {
        return Ok(Value::from(i.saturating_add(by)));
    }
    current
        .as_f64()
        .and_then(|f| Number::from_f64(f + by as f64))
        .map(Value::Number)
        .ok_or_else(|| StoreError::backend("numeric overflow"))
}
