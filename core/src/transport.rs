//! Executes `HttpRequest`s against the network.
//!
//! # Design
//! Every call returns its own response value; nothing is buffered on the
//! transport, so any number of fetches may be in flight at once. Status codes
//! are data, not errors: a 404 or 500 comes back as an `HttpResponse` and the
//! client decides what it means.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Upper bound on a response body. Hologram downloads can be large.
pub const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

/// Performs one GET round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_agent(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }

    /// Wrap a preconfigured agent, e.g. one with timeouts or a proxy. The
    /// agent must not turn HTTP status codes into errors.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.get(&request.path);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = HttpRequest {
            path: format!("http://127.0.0.1:{port}/api/1.0.0/patients/p1"),
            headers: Vec::new(),
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(!err.message.is_empty());
    }
}
