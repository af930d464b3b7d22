//! Blocking fetch façade: a `HoloStorageClient` paired with a `Transport`.
//!
//! # Design
//! Each method builds a request, executes it, and parses the response it got
//! back. The response is a local value of that call, so concurrent fetches on
//! one `HoloStorage` (it is `Sync` whenever its transport is) never observe
//! each other's bodies.
//!
//! Transport failures are logged and returned as `ApiError::Transport`.

use crate::asset::HologramAsset;
use crate::client::HoloStorageClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::Mapped;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Author, Hologram, Patient};

pub struct HoloStorage<T: Transport = UreqTransport> {
    client: HoloStorageClient,
    transport: T,
}

impl HoloStorage<UreqTransport> {
    /// Storage backed by a fresh `ureq` agent.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> HoloStorage<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: HoloStorageClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &HoloStorageClient {
        &self.client
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(url = %request.path, "GET");
        match self.transport.execute(&request) {
            Ok(response) => {
                tracing::debug!(url = %request.path, status = response.status, "response");
                Ok(response)
            }
            Err(e) => {
                tracing::error!(url = %request.path, error = %e, "web request failed");
                Err(ApiError::Transport {
                    url: request.path,
                    message: e.message,
                })
            }
        }
    }

    pub fn get_patient(&self, pid: &str) -> Result<Mapped<Patient>, ApiError> {
        let response = self.execute(self.client.build_get_patient(pid))?;
        self.client.parse_get_patient(pid, response)
    }

    pub fn get_hologram(&self, hid: &str) -> Result<Mapped<Hologram>, ApiError> {
        let response = self.execute(self.client.build_get_hologram(hid))?;
        self.client.parse_get_hologram(hid, response)
    }

    pub fn get_author(&self, aid: &str) -> Result<Mapped<Author>, ApiError> {
        let response = self.execute(self.client.build_get_author(aid))?;
        self.client.parse_get_author(aid, response)
    }

    /// Fetch `pid` and update `target` in place.
    ///
    /// On error `target` is left untouched; otherwise it follows
    /// `Mapped::merge_into`. The outcome is returned without its record.
    pub fn get_patient_into(&self, pid: &str, target: &mut Patient) -> Result<Mapped<()>, ApiError> {
        let mapped = self.get_patient(pid)?;
        Ok(merge(mapped, target))
    }

    pub fn get_hologram_into(
        &self,
        hid: &str,
        target: &mut Hologram,
    ) -> Result<Mapped<()>, ApiError> {
        let mapped = self.get_hologram(hid)?;
        Ok(merge(mapped, target))
    }

    pub fn get_author_into(&self, aid: &str, target: &mut Author) -> Result<Mapped<()>, ApiError> {
        let mapped = self.get_author(aid)?;
        Ok(merge(mapped, target))
    }

    /// `pids` is a comma-separated list.
    pub fn get_multiple_patients(&self, pids: &str) -> Result<Vec<Patient>, ApiError> {
        let response = self.execute(self.client.build_get_patients(pids))?;
        self.client.parse_get_patients(pids, response)
    }

    pub fn get_multiple_holograms(&self, hids: &str) -> Result<Vec<Hologram>, ApiError> {
        let response = self.execute(self.client.build_get_holograms(hids))?;
        self.client.parse_get_holograms(hids, response)
    }

    pub fn get_multiple_authors(&self, aids: &str) -> Result<Vec<Author>, ApiError> {
        let response = self.execute(self.client.build_get_authors(aids))?;
        self.client.parse_get_authors(aids, response)
    }

    /// Replace the contents of `out` with the patients for `pids`.
    ///
    /// `out` is cleared first, so it ends up empty when the fetch fails.
    pub fn get_multiple_patients_into(
        &self,
        pids: &str,
        out: &mut Vec<Patient>,
    ) -> Result<(), ApiError> {
        out.clear();
        out.extend(self.get_multiple_patients(pids)?);
        Ok(())
    }

    pub fn get_multiple_holograms_into(
        &self,
        hids: &str,
        out: &mut Vec<Hologram>,
    ) -> Result<(), ApiError> {
        out.clear();
        out.extend(self.get_multiple_holograms(hids)?);
        Ok(())
    }

    pub fn get_multiple_authors_into(
        &self,
        aids: &str,
        out: &mut Vec<Author>,
    ) -> Result<(), ApiError> {
        out.clear();
        out.extend(self.get_multiple_authors(aids)?);
        Ok(())
    }

    /// Download the GLB file behind `hid`.
    pub fn download_hologram(&self, hid: &str) -> Result<HologramAsset, ApiError> {
        let response = self.execute(self.client.build_download_hologram(hid))?;
        let asset = self.client.parse_download_hologram(hid, response)?;
        tracing::info!(hid, bytes = asset.bytes.len(), "downloaded hologram");
        Ok(asset)
    }
}

fn merge<R: crate::types::Record>(mapped: Mapped<R>, target: &mut R) -> Mapped<()> {
    let outcome = match &mapped {
        Mapped::Found(_) => Mapped::Found(()),
        Mapped::NotFound => Mapped::NotFound,
        Mapped::Partial { issues, .. } => Mapped::Partial {
            record: (),
            issues: issues.clone(),
        },
    };
    mapped.merge_into(target);
    outcome
}
