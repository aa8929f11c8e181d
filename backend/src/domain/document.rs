//! Document primitives shared by the collection store port and its adapters.
//!
//! Stored records are schemaless JSON objects grouped into named collections.
//! Every document carries its identifier under `_id`; references between
//! collections hold the referenced id either as a plain string or in the
//! extended form `{"$oid": "<hex>"}`. Both forms denote the same id.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value, json};
use thiserror::Error;
use uuid::Uuid;

/// A stored record.
pub type Document = Map<String, Value>;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

const OID_KEY: &str = "$oid";
const OBJECT_ID_LEN: usize = 24;

/// Validation errors raised by [`CollectionName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionNameError {
    /// The name was blank once trimmed.
    #[error("collection name must not be empty")]
    Empty,
    /// The name contains characters outside `[a-z0-9_]`.
    #[error("collection name '{0}' must use lowercase letters, digits, or underscores")]
    InvalidCharacters(String),
}

/// Validated name of a logical collection such as `users` or `menuitems`.
///
/// # Examples
/// ```
/// use backend::domain::CollectionName;
///
/// let name = CollectionName::new("  menuitems ").expect("valid name");
/// assert_eq!(name.as_str(), "menuitems");
/// assert!(CollectionName::new("Menu Items").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CollectionName(Cow<'static, str>);

impl CollectionName {
    /// Parse and validate a collection name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CollectionNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CollectionNameError::Empty);
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(CollectionNameError::InvalidCharacters(trimmed.to_owned()));
        }
        Ok(Self(Cow::Owned(trimmed.to_owned())))
    }

    /// Wrap a compile-time literal from a rule table.
    ///
    /// The literal is not re-validated; rule table tests cover every name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for CollectionName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for CollectionName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<'de> Deserialize<'de> for CollectionName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(de::Error::custom)
    }
}

/// Validation errors raised by [`DocumentId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdError {
    /// The id was blank once trimmed.
    #[error("document id must not be empty")]
    Empty,
}

/// Opaque document identifier.
///
/// Serialises as a plain string and deserialises from either a string or the
/// extended `{"$oid": "..."}` form.
///
/// # Examples
/// ```
/// use backend::domain::DocumentId;
/// use serde_json::json;
///
/// let plain = DocumentId::from_value(&json!("65f0c0ffee0000000000abcd"));
/// let extended = DocumentId::from_value(&json!({"$oid": "65f0c0ffee0000000000abcd"}));
/// assert_eq!(plain, extended);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate a raw id.
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentIdError> {
        let value = raw.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh 24-character lowercase hex id.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex.chars().take(OBJECT_ID_LEN).collect())
    }

    /// Read an id held as a plain string or as `{"$oid": "..."}`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(raw) => Self::new(raw.as_str()).ok(),
            Value::Object(map) => map
                .get(OID_KEY)
                .and_then(Value::as_str)
                .and_then(|raw| Self::new(raw).ok()),
            _ => None,
        }
    }

    /// The id of a document, read from its `_id` field.
    pub fn of(document: &Document) -> Option<Self> {
        document.get(ID_FIELD).and_then(Self::from_value)
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extended `{"$oid": ...}` representation of this id.
    pub fn to_oid_value(&self) -> Value {
        json!({ OID_KEY: self.0 })
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<DocumentId> for Value {
    fn from(id: DocumentId) -> Self {
        Value::String(id.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| de::Error::custom("expected an id string or {\"$oid\": \"...\"}"))
    }
}

/// Values reached by following a dotted path through `document`.
///
/// Arrays met along the way fan out, so `participants.userId` yields the
/// `userId` of every participant.
pub fn values_at<'a>(document: &'a Document, path: &str) -> Vec<&'a Value> {
    let mut segments = path.split('.');
    let mut current: Vec<&Value> = segments
        .next()
        .and_then(|first| document.get(first))
        .into_iter()
        .collect();
    for segment in segments {
        current = current
            .into_iter()
            .flat_map(|value| descend(value, segment))
            .collect();
    }
    current
}

fn descend<'a>(value: &'a Value, segment: &str) -> Vec<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().and_then(|map| map.get(segment)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Leaf values at `path`, with arrays at the leaf expanded into elements.
fn leaf_values<'a>(document: &'a Document, path: &str) -> Vec<&'a Value> {
    values_at(document, path)
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect()
}

/// Ids referenced at `path`, skipping null or non-id values.
pub fn referenced_ids(document: &Document, path: &str) -> Vec<DocumentId> {
    leaf_values(document, path)
        .into_iter()
        .filter_map(DocumentId::from_value)
        .collect()
}

/// JavaScript-style truthiness: missing, `null`, `false`, `0`, and `""` are
/// falsy; everything else is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Selection criteria understood by every collection store.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// The path resolves to at least one non-null value.
    Exists(String),
    /// A value at the path equals the target. Ids compare equal in plain and
    /// `$oid` form.
    Equals(String, Value),
    /// A value at the path equals any of the targets.
    AnyOf(String, Vec<Value>),
    /// The top-level `left` field is greater than or equal to `right`.
    FieldGteField(String, String),
    /// All nested filters match.
    And(Vec<Filter>),
}

impl Filter {
    /// Shorthand for [`Filter::Equals`].
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals(path.into(), value.into())
    }

    /// Shorthand for [`Filter::Exists`].
    pub fn exists(path: impl Into<String>) -> Self {
        Self::Exists(path.into())
    }

    /// Whether `document` satisfies the filter.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Exists(path) => values_at(document, path).iter().any(|v| !v.is_null()),
            Self::Equals(path, target) => leaf_values(document, path)
                .into_iter()
                .any(|value| values_equal(value, target)),
            Self::AnyOf(path, targets) => leaf_values(document, path)
                .into_iter()
                .any(|value| targets.iter().any(|target| values_equal(value, target))),
            Self::FieldGteField(left, right) => {
                match (document.get(left), document.get(right)) {
                    (Some(l), Some(r)) => matches!(
                        compare_scalars(l, r),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    _ => false,
                }
            }
            Self::And(filters) => filters.iter().all(|filter| filter.matches(document)),
        }
    }
}

fn values_equal(value: &Value, target: &Value) -> bool {
    match (DocumentId::from_value(value), DocumentId::from_value(target)) {
        (Some(left), Some(right)) => left == right,
        _ => value == target,
    }
}

fn compare_scalars(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
