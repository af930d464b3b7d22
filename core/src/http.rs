//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `HoloStorageClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; whoever executes the round-trip (a `Transport`, or a host engine
//! over the C ABI) sits in between. Every request the storage API accepts is
//! an unauthenticated GET without a body, so there is no method or body field.
//!
//! Bodies are raw bytes because hologram downloads are binary GLB files.

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_GLB: &str = "model/gltf-binary";

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub(crate) fn get(path: String, accept: &str) -> Self {
        Self {
            path,
            headers: vec![("accept".to_string(), accept.to_string())],
        }
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `HoloStorageClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Shorthand for a header-less response, mostly useful in tests and hosts.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
