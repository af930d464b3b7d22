//! Metadata records served by the storage accessor.
//!
//! # Design
//! These types mirror the backend's JSON but are defined independently from
//! the mock-server crate; integration tests catch schema drift. Field names
//! are snake_case in Rust and renamed to the wire's camelCase by serde, so
//! serializing a record reproduces the JSON it was mapped from.
//!
//! `Default` is the zero-value record: every string empty, every number 0.

use serde::{Deserialize, Serialize};

/// The three fetchable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Patients,
    Holograms,
    Authors,
}

impl ResourceKind {
    /// Path segment under `/api/{version}`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Patients => "patients",
            ResourceKind::Holograms => "holograms",
            ResourceKind::Authors => "authors",
        }
    }

    /// Query key for batch requests, which is also the identifier field name.
    pub fn query_key(self) -> &'static str {
        match self {
            ResourceKind::Patients => "pid",
            ResourceKind::Holograms => "hid",
            ResourceKind::Authors => "aid",
        }
    }
}

/// A person's name as the backend models it. Each part is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonName {
    pub title: String,
    pub full: String,
    pub given: String,
    pub family: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Patient {
    pub pid: String,
    pub gender: String,
    /// ISO-like date, passed through unvalidated.
    pub birth_date: String,
    pub name: PersonName,
}

/// Metadata of one stored 3D model.
///
/// `aid` and `pid` reference an `Author` and a `Patient`; resolving them takes
/// a separate fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hologram {
    pub hid: String,
    pub title: String,
    pub description: String,
    pub content_type: String,
    #[serde(rename = "fileSizeInkb")]
    pub file_size_in_kb: i64,
    pub body_site: String,
    pub date_of_imaging: String,
    pub creation_date: String,
    pub creation_mode: String,
    pub creation_description: String,
    pub aid: String,
    pub pid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub aid: String,
    pub name: PersonName,
}

/// Behaviour shared by the three record kinds.
pub trait Record: Default + Clone {
    const KIND: ResourceKind;

    /// The identifier field's value.
    fn id(&self) -> &str;

    /// Whether the server actually returned data for this record.
    fn is_present(&self) -> bool {
        !self.id().is_empty()
    }
}

impl Record for Patient {
    const KIND: ResourceKind = ResourceKind::Patients;

    fn id(&self) -> &str {
        &self.pid
    }
}

impl Record for Hologram {
    const KIND: ResourceKind = ResourceKind::Holograms;

    fn id(&self) -> &str {
        &self.hid
    }
}

impl Record for Author {
    const KIND: ResourceKind = ResourceKind::Authors;

    fn id(&self) -> &str {
        &self.aid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hologram_serializes_wire_names() {
        let hologram = Hologram {
            hid: "h1".to_string(),
            file_size_in_kb: 2048,
            date_of_imaging: "2019-01-01".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&hologram).unwrap();
        assert_eq!(json["hid"], "h1");
        assert_eq!(json["fileSizeInkb"], 2048);
        assert_eq!(json["dateOfImaging"], "2019-01-01");
        assert!(json.get("file_size_in_kb").is_none());
    }

    #[test]
    fn patient_serializes_birth_date_in_camel_case() {
        let patient = Patient {
            pid: "p1".to_string(),
            birth_date: "1970-01-01".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["birthDate"], "1970-01-01");
        assert_eq!(json["name"]["full"], "");
    }

    #[test]
    fn zero_value_record_is_not_present() {
        assert!(!Patient::default().is_present());
        assert!(!Hologram::default().is_present());
        assert!(!Author::default().is_present());
    }

    #[test]
    fn kind_paths_and_keys() {
        assert_eq!(ResourceKind::Patients.path(), "patients");
        assert_eq!(ResourceKind::Holograms.query_key(), "hid");
        assert_eq!(Author::KIND.query_key(), "aid");
    }
}
