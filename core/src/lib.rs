//! Client core for the hologram storage accessor.
//!
//! # Overview
//! Fetches patient, hologram and author metadata from the storage REST API
//! and maps the JSON into typed records, plus downloads of the binary GLB
//! behind a hologram.
//!
//! # Design
//! - `HoloStorageClient` is stateless beyond its `ClientConfig`: `build_*`
//!   produces an `HttpRequest`, `parse_*` consumes an `HttpResponse`, and the
//!   round-trip in between is executed by the host or by a `Transport`.
//! - `HoloStorage` pairs a client with a `Transport` (a `ureq` agent by
//!   default) for callers that just want the records.
//! - Mapping is tolerant field by field; outcomes are typed (`Mapped`) and
//!   failures are `ApiError`s, so "not found", "partially mapped",
//!   "transport failed" and "unparseable" stay distinguishable.
//! - Records are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod asset;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapper;
pub mod storage;
pub mod transport;
pub mod types;

pub use asset::{GlbHeader, HologramAsset};
pub use client::HoloStorageClient;
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use mapper::Mapped;
pub use storage::HoloStorage;
pub use transport::{Transport, UreqTransport};
pub use types::{Author, Hologram, Patient, PersonName, Record, ResourceKind};
