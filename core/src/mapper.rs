//! Tolerant JSON-to-record mapping.
//!
//! # Design
//! The backend is loose about types: numbers show up where strings are
//! expected, nested objects may be missing, and an unknown ID comes back as
//! an object with a blank identifier rather than a 404. Records are therefore
//! mapped field by field from a `serde_json::Value` instead of through a
//! derived `Deserialize`:
//!
//! - a string field accepts strings, and the textual form of numbers and
//!   booleans; absent or null yields `""`;
//! - an integer field accepts integers, truncated floats and numeric strings;
//!   anything else yields `0`;
//! - structurally wrong values (an object where a string belongs, a `name`
//!   that is not an object) yield the default and are recorded as issues.
//!
//! A record whose identifier is blank maps to `Mapped::NotFound`. A record
//! with issues maps to `Mapped::Partial`, so callers can tell a clean record
//! from a best-effort one.

use serde_json::{Map, Value};

use crate::types::{Author, Hologram, Patient, PersonName, Record};

/// Outcome of mapping one JSON object to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapped<T> {
    /// Identifier present and every field well-formed.
    Found(T),
    /// The server returned no data for the requested ID.
    NotFound,
    /// Identifier present but some fields were malformed and defaulted.
    Partial { record: T, issues: Vec<String> },
}

impl<T: Record> Mapped<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Mapped::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Mapped::NotFound)
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            Mapped::Found(record) | Mapped::Partial { record, .. } => Some(record),
            Mapped::NotFound => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Mapped::Found(record) | Mapped::Partial { record, .. } => Some(record),
            Mapped::NotFound => None,
        }
    }

    /// The record, or the zero-value record when nothing was found.
    pub fn into_record_or_default(self) -> T {
        self.into_record().unwrap_or_default()
    }

    /// Update a caller-owned record in place.
    ///
    /// `Found` and `Partial` overwrite every field of `target`; `NotFound`
    /// resets it to the zero value.
    pub fn merge_into(self, target: &mut T) {
        *target = self.into_record_or_default();
    }
}

/// Reads fields out of one JSON object, collecting issues as it goes.
pub(crate) struct Fields<'a> {
    object: &'a Map<String, Value>,
    prefix: &'static str,
    issues: Vec<String>,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            prefix: "",
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, key: &str, found: &Value) {
        self.issues.push(format!(
            "{}{key}: unexpected {}",
            self.prefix,
            json_type_name(found)
        ));
    }

    pub(crate) fn string(&mut self, key: &str) -> String {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => {
                self.issue(key, other);
                String::new()
            }
        }
    }

    pub(crate) fn integer(&mut self, key: &str) -> i64 {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => parse_integer(s).unwrap_or_else(|| {
                self.issues
                    .push(format!("{}{key}: unexpected string", self.prefix));
                0
            }),
            Some(other) => {
                self.issue(key, other);
                0
            }
        }
    }

    pub(crate) fn name(&mut self, key: &str) -> PersonName {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => PersonName::default(),
            Some(Value::Object(inner)) => {
                let mut nested = Fields {
                    object: inner,
                    prefix: "name.",
                    issues: Vec::new(),
                };
                let name = PersonName {
                    title: nested.string("title"),
                    full: nested.string("full"),
                    given: nested.string("given"),
                    family: nested.string("family"),
                };
                self.issues.append(&mut nested.issues);
                name
            }
            Some(other) => {
                self.issue(key, other);
                PersonName::default()
            }
        }
    }
}

fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Records that can be read out of a `Fields` cursor.
pub(crate) trait FromFields: Record {
    fn from_fields(fields: &mut Fields<'_>) -> Self;
}

impl FromFields for Patient {
    fn from_fields(f: &mut Fields<'_>) -> Self {
        Patient {
            pid: f.string("pid"),
            gender: f.string("gender"),
            birth_date: f.string("birthDate"),
            name: f.name("name"),
        }
    }
}

impl FromFields for Hologram {
    fn from_fields(f: &mut Fields<'_>) -> Self {
        Hologram {
            hid: f.string("hid"),
            title: f.string("title"),
            description: f.string("description"),
            content_type: f.string("contentType"),
            file_size_in_kb: f.integer("fileSizeInkb"),
            body_site: f.string("bodySite"),
            date_of_imaging: f.string("dateOfImaging"),
            creation_date: f.string("creationDate"),
            creation_mode: f.string("creationMode"),
            creation_description: f.string("creationDescription"),
            aid: f.string("aid"),
            pid: f.string("pid"),
        }
    }
}

impl FromFields for Author {
    fn from_fields(f: &mut Fields<'_>) -> Self {
        Author {
            aid: f.string("aid"),
            name: f.name("name"),
        }
    }
}

/// Map one JSON value to a record. `requested_id` is only used for logging.
pub(crate) fn map_record<T: FromFields>(value: &Value, requested_id: &str) -> Mapped<T> {
    let kind = T::KIND.path();
    let Value::Object(object) = value else {
        tracing::warn!(kind, id = %requested_id, "empty response for ID");
        return Mapped::NotFound;
    };

    let mut fields = Fields::new(object);
    let record = T::from_fields(&mut fields);
    if !record.is_present() {
        tracing::warn!(kind, id = %requested_id, "empty response for ID");
        return Mapped::NotFound;
    }

    if fields.issues.is_empty() {
        Mapped::Found(record)
    } else {
        tracing::error!(
            kind,
            id = %requested_id,
            issues = ?fields.issues,
            "failed to map every field from response data"
        );
        Mapped::Partial {
            record,
            issues: fields.issues,
        }
    }
}

pub fn map_patient(value: &Value, requested_id: &str) -> Mapped<Patient> {
    map_record(value, requested_id)
}

pub fn map_hologram(value: &Value, requested_id: &str) -> Mapped<Hologram> {
    map_record(value, requested_id)
}

pub fn map_author(value: &Value, requested_id: &str) -> Mapped<Author> {
    map_record(value, requested_id)
}

/// Split a comma-separated ID list, skipping empty segments.
pub fn split_ids(ids: &str) -> impl Iterator<Item = &str> {
    ids.split(',').filter(|id| !id.is_empty())
}

/// Map a `{ "<id>": {...}, ... }` batch body.
///
/// The caller's ID list drives iteration, so keys the server added are
/// ignored and IDs it left out are simply skipped. Only present records are
/// returned, in ID-list order.
pub(crate) fn map_keyed_batch<T: FromFields>(body: &Map<String, Value>, ids: &str) -> Vec<T> {
    split_ids(ids)
        .filter_map(|id| match body.get(id) {
            Some(value) => map_record::<T>(value, id).into_record(),
            None => {
                tracing::warn!(kind = T::KIND.path(), id = %id, "empty response for ID");
                None
            }
        })
        .collect()
}

pub fn map_patient_batch(body: &Map<String, Value>, ids: &str) -> Vec<Patient> {
    map_keyed_batch(body, ids)
}

pub fn map_author_batch(body: &Map<String, Value>, ids: &str) -> Vec<Author> {
    map_keyed_batch(body, ids)
}

/// Map a `{ "<id>": [ {...}, ... ], ... }` batch body.
///
/// Every element of each ID's array is mapped and appended in order. An
/// empty array is logged as an error and contributes nothing; so does a
/// missing key or a value that is not an array. Elements with a blank `hid`
/// are dropped like in the keyed batches.
pub fn map_hologram_batch(body: &Map<String, Value>, ids: &str) -> Vec<Hologram> {
    let mut holograms = Vec::new();
    for id in split_ids(ids) {
        match body.get(id) {
            Some(Value::Array(items)) if items.is_empty() => {
                tracing::error!(id = %id, "response from server is empty for hologram ID");
            }
            Some(Value::Array(items)) => {
                holograms.extend(
                    items
                        .iter()
                        .filter_map(|item| map_hologram(item, id).into_record()),
                );
            }
            Some(other) => {
                tracing::error!(
                    id = %id,
                    found = json_type_name(other),
                    "expected an array of holograms"
                );
            }
            None => {
                tracing::error!(id = %id, "response from server is empty for hologram ID");
            }
        }
    }
    holograms
}
