//! Backend-neutral query language: filters, patches and find options.

use estate_shared::GeoPoint;
use serde_json::{Map, Value};

/// A stored document: a JSON object keyed by field name
pub type Document = Map<String, Value>;

/// Predicate over documents. Field names are dotted paths
/// (`"location.city"`).
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    Eq(String, Value),
    Ne(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    In(String, Vec<Value>),
    Exists(String, bool),
    /// Case-insensitive regular expression match on a string field
    Matches { field: String, pattern: String },
    /// Free-text search over the collection's text-indexed fields
    Text(String),
    /// GeoJSON point field within `max_distance_meters` of `center`
    WithinRadius {
        field: String,
        center: GeoPoint,
        max_distance_meters: f64,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Match on the record identifier
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Eq(super::record::ID_FIELD.to_string(), Value::String(id.into()))
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gte(field.into(), value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lte(field.into(), value.into())
    }

    pub fn exists(field: impl Into<String>, exists: bool) -> Self {
        Filter::Exists(field.into(), exists)
    }

    /// Case-insensitive substring match; the needle is escaped so user
    /// input never acts as a pattern
    pub fn contains_ci(field: impl Into<String>, needle: &str) -> Self {
        Filter::Matches {
            field: field.into(),
            pattern: regex::escape(needle),
        }
    }

    /// Conjunction with another filter, flattening nested `And`s
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (left, right) => Filter::And(vec![left, right]),
        }
    }

    /// Build a conjunction from a list of predicates
    pub fn all_of(filters: impl IntoIterator<Item = Filter>) -> Self {
        filters.into_iter().fold(Filter::All, Filter::and)
    }
}

/// One field-level modification
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    Set(String, Value),
    Unset(String),
    Inc(String, i64),
    Push(String, Value),
}

impl PatchOp {
    pub fn field(&self) -> &str {
        match self {
            PatchOp::Set(field, _) | PatchOp::Unset(field) | PatchOp::Inc(field, _) | PatchOp::Push(field, _) => {
                field
            }
        }
    }
}

/// An ordered list of field modifications applied to a single document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Set(field.into(), value.into()));
        self
    }

    /// Set the field when a value is present, otherwise leave it untouched
    pub fn set_opt<V: Into<Value>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(field, value),
            None => self,
        }
    }

    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.ops.push(PatchOp::Unset(field.into()));
        self
    }

    pub fn inc(mut self, field: impl Into<String>, by: i64) -> Self {
        self.ops.push(PatchOp::Inc(field.into(), by));
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Push(field.into(), value.into()));
        self
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort specification for `find_many`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Options for bounded multi-document reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub limit: Option<usize>,
    pub sort: Option<Sort>,
}

impl FindOptions {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Result of an `update_one`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCount {
    /// Documents matched by the filter (0 or 1)
    pub matched: u64,
    /// Documents whose content actually changed
    pub modified: u64,
}

impl UpdateCount {
    pub fn none() -> Self {
        Self::default()
    }
}
