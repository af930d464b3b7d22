//! Stateless HTTP request builder and response parser for the storage API.
//!
//! # Design
//! `HoloStorageClient` holds only its `ClientConfig` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes the matching
//! `HttpResponse`. Executing the round-trip is someone else's job (see
//! `HoloStorage` for the batteries-included version), which keeps this type
//! deterministic and free of I/O.
//!
//! IDs are spliced into URIs verbatim: callers pass pre-encoded values, and a
//! batch is a comma-separated list.

use serde_json::{Map, Value};

use crate::asset::HologramAsset;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, ACCEPT_GLB, ACCEPT_JSON};
use crate::mapper::{self, FromFields, Mapped};
use crate::types::{Author, Hologram, Patient, ResourceKind};

/// Synchronous, stateless client for the hologram storage API.
#[derive(Debug, Clone)]
pub struct HoloStorageClient {
    config: ClientConfig,
    base_uri: String,
}

impl Default for HoloStorageClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl HoloStorageClient {
    pub fn new(config: ClientConfig) -> Self {
        let base_uri = config.base_uri();
        Self { config, base_uri }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn single(&self, kind: ResourceKind, id: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{}/{id}", self.base_uri, kind.path()), ACCEPT_JSON)
    }

    fn batch(&self, kind: ResourceKind, ids: &str) -> HttpRequest {
        HttpRequest::get(
            format!("{}/{}?{}={ids}", self.base_uri, kind.path(), kind.query_key()),
            ACCEPT_JSON,
        )
    }

    pub fn build_get_patient(&self, pid: &str) -> HttpRequest {
        self.single(ResourceKind::Patients, pid)
    }

    pub fn build_get_patients(&self, pids: &str) -> HttpRequest {
        self.batch(ResourceKind::Patients, pids)
    }

    pub fn build_get_hologram(&self, hid: &str) -> HttpRequest {
        self.single(ResourceKind::Holograms, hid)
    }

    pub fn build_get_holograms(&self, hids: &str) -> HttpRequest {
        self.batch(ResourceKind::Holograms, hids)
    }

    pub fn build_get_author(&self, aid: &str) -> HttpRequest {
        self.single(ResourceKind::Authors, aid)
    }

    pub fn build_get_authors(&self, aids: &str) -> HttpRequest {
        self.batch(ResourceKind::Authors, aids)
    }

    /// Request for the binary GLB behind a hologram.
    pub fn build_download_hologram(&self, hid: &str) -> HttpRequest {
        HttpRequest::get(
            format!("{}/holograms/{hid}/download", self.base_uri),
            ACCEPT_GLB,
        )
    }

    pub fn parse_get_patient(
        &self,
        pid: &str,
        response: HttpResponse,
    ) -> Result<Mapped<Patient>, ApiError> {
        parse_single(pid, &response)
    }

    pub fn parse_get_patients(
        &self,
        pids: &str,
        response: HttpResponse,
    ) -> Result<Vec<Patient>, ApiError> {
        let body = parse_object(&response)?;
        Ok(mapper::map_patient_batch(&body, pids))
    }

    pub fn parse_get_hologram(
        &self,
        hid: &str,
        response: HttpResponse,
    ) -> Result<Mapped<Hologram>, ApiError> {
        parse_single(hid, &response)
    }

    pub fn parse_get_holograms(
        &self,
        hids: &str,
        response: HttpResponse,
    ) -> Result<Vec<Hologram>, ApiError> {
        let body = parse_object(&response)?;
        Ok(mapper::map_hologram_batch(&body, hids))
    }

    pub fn parse_get_author(
        &self,
        aid: &str,
        response: HttpResponse,
    ) -> Result<Mapped<Author>, ApiError> {
        parse_single(aid, &response)
    }

    pub fn parse_get_authors(
        &self,
        aids: &str,
        response: HttpResponse,
    ) -> Result<Vec<Author>, ApiError> {
        let body = parse_object(&response)?;
        Ok(mapper::map_author_batch(&body, aids))
    }

    pub fn parse_download_hologram(
        &self,
        hid: &str,
        response: HttpResponse,
    ) -> Result<HologramAsset, ApiError> {
        check_status(&response)?;
        HologramAsset::new(hid, response.body)
    }
}

/// A 404 on a single-entity fetch means the entity does not exist.
fn parse_single<T: FromFields>(id: &str, response: &HttpResponse) -> Result<Mapped<T>, ApiError> {
    if response.status == 404 {
        tracing::warn!(kind = T::KIND.path(), id = %id, "entity not found");
        return Ok(Mapped::NotFound);
    }
    let body = parse_object(response)?;
    Ok(mapper::map_record(&Value::Object(body), id))
}

/// Map non-success status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.text(),
    })
}

/// Check the status and decode a body whose root must be a JSON object.
fn parse_object(response: &HttpResponse) -> Result<Map<String, Value>, ApiError> {
    check_status(response)?;
    match serde_json::from_slice(&response.body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ApiError::Deserialization(
            "expected a JSON object at the root".to_string(),
        )),
        Err(e) => {
            tracing::error!(error = %e, "failed to parse response data");
            Err(e.into())
        }
    }
}
