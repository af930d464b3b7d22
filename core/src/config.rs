//! Backend location for a `HoloStorageClient`.
//!
//! # Design
//! The endpoint, port and API version travel together as one value owned by
//! each client. Two clients built from different configs talk to different
//! backends; mutating a config after a client was built has no effect on it.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost";
pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Where the storage accessor lives.
///
/// None of the parts are validated; they are spliced verbatim into
/// `{endpoint}:{port}/api/{api_version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub endpoint: String,
    pub port: String,
    pub api_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            port: DEFAULT_PORT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: &str, port: &str, api_version: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            port: port.to_string(),
            api_version: api_version.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: &str) -> Self {
        self.port = port.to_string();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// `{endpoint}:{port}/api/{api_version}`, with any trailing slash on the
    /// endpoint dropped.
    pub fn base_uri(&self) -> String {
        format!(
            "{}:{}/api/{}",
            self.endpoint.trim_end_matches('/'),
            self.port,
            self.api_version
        )
    }
}
