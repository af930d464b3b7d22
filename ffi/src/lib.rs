//! C-ABI wrapper around `holostorage-core`.
//!
//! # Overview
//! Exposes the storage client's build/parse surface through `extern "C"`
//! functions so a rendering host (a game engine, typically) can fetch
//! metadata and hologram files with its own HTTP stack while reusing the
//! Rust request building and tolerant response mapping.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiHoloResult` envelope with `FfiDataTag` + `void* data`
//!   conveys records, lists, asset bytes and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `holo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use holostorage_core::{ApiError, ClientConfig, HoloStorageClient, HttpRequest, HttpResponse};

use types::*;

/// Borrow a C string argument. Returns `None` for null or non-UTF-8 input.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client for `{endpoint}:{port}/api/{api_version}`.
///
/// Returns null if any argument is null or not UTF-8, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `holo_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn holo_client_new(
    endpoint: *const c_char,
    port: *const c_char,
    api_version: *const c_char,
) -> *mut FfiHoloClient {
    catch_unwind(|| {
        let args = unsafe { (str_arg(endpoint), str_arg(port), str_arg(api_version)) };
        let (Some(endpoint), Some(port), Some(api_version)) = args else {
            return std::ptr::null_mut();
        };
        let client = HoloStorageClient::new(ClientConfig::new(endpoint, port, api_version));
        Box::into_raw(Box::new(FfiHoloClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client with the default endpoint, port and API version.
#[unsafe(no_mangle)]
pub extern "C" fn holo_client_new_default() -> *mut FfiHoloClient {
    catch_unwind(|| Box::into_raw(Box::new(FfiHoloClient { inner: HoloStorageClient::default() })))
        .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `holo_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn holo_client_free(client: *mut FfiHoloClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

type BuildFn = fn(&HoloStorageClient, &str) -> HttpRequest;

fn build_with(
    client: *const FfiHoloClient,
    ids: *const c_char,
    build: BuildFn,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(ids) = (unsafe { str_arg(ids) }) else {
            return std::ptr::null_mut();
        };
        FfiHttpRequest::from_core(build(&client.inner, ids))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request for one patient.
///
/// Returns null if `client` or `pid` is null.
/// The caller must free the returned pointer with `holo_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_patient(
    client: *const FfiHoloClient,
    pid: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, pid, HoloStorageClient::build_get_patient)
}

/// Build a batch request; `pids` is a comma-separated list.
#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_patients(
    client: *const FfiHoloClient,
    pids: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, pids, HoloStorageClient::build_get_patients)
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_hologram(
    client: *const FfiHoloClient,
    hid: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, hid, HoloStorageClient::build_get_hologram)
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_holograms(
    client: *const FfiHoloClient,
    hids: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, hids, HoloStorageClient::build_get_holograms)
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_author(
    client: *const FfiHoloClient,
    aid: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, aid, HoloStorageClient::build_get_author)
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_build_get_authors(
    client: *const FfiHoloClient,
    aids: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, aids, HoloStorageClient::build_get_authors)
}

/// Build a request for the GLB file behind `hid`.
#[unsafe(no_mangle)]
pub extern "C" fn holo_build_download_hologram(
    client: *const FfiHoloClient,
    hid: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, hid, HoloStorageClient::build_download_hologram)
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Copy an `FfiHttpResponse` into a core `HttpResponse`. A null body is an
/// empty body.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() || resp.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
    };
    HttpResponse::new(resp.status, body)
}

fn parse_with<T>(
    op: &str,
    client: *const FfiHoloClient,
    ids: *const c_char,
    response: *const FfiHttpResponse,
    parse: fn(&HoloStorageClient, &str, HttpResponse) -> Result<T, ApiError>,
    wrap: fn(T) -> *mut FfiHoloResult,
) -> *mut FfiHoloResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiHoloResult::null_arg("client");
        }
        if response.is_null() {
            return FfiHoloResult::null_arg("response");
        }
        let Some(ids) = (unsafe { str_arg(ids) }) else {
            return FfiHoloResult::null_arg("id");
        };
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match parse(&client.inner, ids, ffi_response_to_core(resp)) {
            Ok(value) => wrap(value),
            Err(e) => FfiHoloResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiHoloResult::panic(&format!("panic in {op}")))
}

/// Parse the response to `holo_build_get_patient`.
///
/// Returns `data_tag = Patient` with `Ok` or `Partial`, or `NotFound`.
#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_patient(
    client: *const FfiHoloClient,
    pid: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_patient",
        client,
        pid,
        response,
        HoloStorageClient::parse_get_patient,
        FfiHoloResult::patient,
    )
}

/// Parse the response to `holo_build_get_patients`.
///
/// Returns `data_tag = PatientList`; IDs without data are left out.
#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_patients(
    client: *const FfiHoloClient,
    pids: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_patients",
        client,
        pids,
        response,
        HoloStorageClient::parse_get_patients,
        FfiHoloResult::patient_list,
    )
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_hologram(
    client: *const FfiHoloClient,
    hid: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_hologram",
        client,
        hid,
        response,
        HoloStorageClient::parse_get_hologram,
        FfiHoloResult::hologram,
    )
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_holograms(
    client: *const FfiHoloClient,
    hids: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_holograms",
        client,
        hids,
        response,
        HoloStorageClient::parse_get_holograms,
        FfiHoloResult::hologram_list,
    )
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_author(
    client: *const FfiHoloClient,
    aid: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_author",
        client,
        aid,
        response,
        HoloStorageClient::parse_get_author,
        FfiHoloResult::author,
    )
}

#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_get_authors(
    client: *const FfiHoloClient,
    aids: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_get_authors",
        client,
        aids,
        response,
        HoloStorageClient::parse_get_authors,
        FfiHoloResult::author_list,
    )
}

/// Parse a download response.
///
/// Returns `data_tag = Asset` when the body is a well-formed GLB container,
/// `InvalidAsset` otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn holo_parse_download_hologram(
    client: *const FfiHoloClient,
    hid: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHoloResult {
    parse_with(
        "holo_parse_download_hologram",
        client,
        hid,
        response,
        HoloStorageClient::parse_download_hologram,
        FfiHoloResult::asset,
    )
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by any `holo_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn holo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        let headers = unsafe { vec_from_raw(req.headers, req.headers_len as usize) };
        for h in headers {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    });
}

fn free_name_fields(name: &FfiPersonName) {
    free_c_string(name.title);
    free_c_string(name.full);
    free_c_string(name.given);
    free_c_string(name.family);
}

fn free_patient_fields(p: &FfiPatient) {
    free_c_string(p.pid);
    free_c_string(p.gender);
    free_c_string(p.birth_date);
    free_name_fields(&p.name);
}

fn free_hologram_fields(h: &FfiHologram) {
    for s in [
        h.hid,
        h.title,
        h.description,
        h.content_type,
        h.body_site,
        h.date_of_imaging,
        h.creation_date,
        h.creation_mode,
        h.creation_description,
        h.aid,
        h.pid,
    ] {
        free_c_string(s);
    }
}

fn free_author_fields(a: &FfiAuthor) {
    free_c_string(a.aid);
    free_name_fields(&a.name);
}

/// Free a boxed `FfiRecordList` of `T`, releasing each item's fields.
fn free_list<T>(data: *mut std::ffi::c_void, free_fields: fn(&T)) {
    let list = unsafe { Box::from_raw(data as *mut FfiRecordList) };
    let items = unsafe { vec_from_raw(list.items as *mut T, list.len as usize) };
    for item in &items {
        free_fields(item);
    }
}

/// Free an `FfiHoloResult` returned by any `holo_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn holo_free_result(result: *mut FfiHoloResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Patient => {
                let p = unsafe { Box::from_raw(result.data as *mut FfiPatient) };
                free_patient_fields(&p);
            }
            FfiDataTag::Hologram => {
                let h = unsafe { Box::from_raw(result.data as *mut FfiHologram) };
                free_hologram_fields(&h);
            }
            FfiDataTag::Author => {
                let a = unsafe { Box::from_raw(result.data as *mut FfiAuthor) };
                free_author_fields(&a);
            }
            FfiDataTag::PatientList => free_list(result.data, free_patient_fields),
            FfiDataTag::HologramList => free_list(result.data, free_hologram_fields),
            FfiDataTag::AuthorList => free_list(result.data, free_author_fields),
            FfiDataTag::Asset => {
                let asset = unsafe { Box::from_raw(result.data as *mut FfiAsset) };
                drop(unsafe { vec_from_raw(asset.bytes, asset.len) });
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn holo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiHoloClient {
        let endpoint = CString::new("http://localhost").unwrap();
        let port = CString::new("3000").unwrap();
        let version = CString::new("1.0.0").unwrap();
        holo_client_new(endpoint.as_ptr(), port.as_ptr(), version.as_ptr())
    }

    fn response(status: u16, body: &[u8]) -> FfiHttpResponse {
        FfiHttpResponse {
            status,
            body: body.as_ptr(),
            body_len: body.len(),
        }
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        holo_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let port = CString::new("3000").unwrap();
        let client = holo_client_new(std::ptr::null(), port.as_ptr(), port.as_ptr());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        holo_client_free(std::ptr::null_mut());
    }

    #[test]
    fn default_client_targets_localhost_8080() {
        let client = holo_client_new_default();
        let id = CString::new("p1").unwrap();
        let req = holo_build_get_patient(client, id.as_ptr());
        let path = c_str(unsafe { &*req }.path);
        assert_eq!(path, "http://localhost:8080/api/1.0.0/patients/p1");
        holo_free_request(req);
        holo_client_free(client);
    }

    #[test]
    fn build_get_patient_returns_correct_request() {
        let client = new_client();
        let id = CString::new("p-100").unwrap();
        let req = holo_build_get_patient(client, id.as_ptr());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.path), "http://localhost:3000/api/1.0.0/patients/p-100");
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "accept");
        assert_eq!(c_str(header.value), "application/json");

        holo_free_request(req);
        holo_client_free(client);
    }

    #[test]
    fn build_batch_uses_query_key() {
        let client = new_client();
        let ids = CString::new("h1,h2").unwrap();
        let req = holo_build_get_holograms(client, ids.as_ptr());
        let path = c_str(unsafe { &*req }.path);
        assert_eq!(path, "http://localhost:3000/api/1.0.0/holograms?hid=h1,h2");
        holo_free_request(req);
        holo_client_free(client);
    }

    #[test]
    fn build_download_requests_glb() {
        let client = new_client();
        let id = CString::new("h1").unwrap();
        let req = holo_build_download_hologram(client, id.as_ptr());
        let req_ref = unsafe { &*req };
        assert!(c_str(req_ref.path).ends_with("/holograms/h1/download"));
        assert_eq!(c_str(unsafe { &*req_ref.headers }.value), "model/gltf-binary");
        holo_free_request(req);
        holo_client_free(client);
    }

    #[test]
    fn build_null_client_returns_null() {
        let id = CString::new("a1").unwrap();
        assert!(holo_build_get_author(std::ptr::null(), id.as_ptr()).is_null());
    }

    #[test]
    fn build_null_id_returns_null() {
        let client = new_client();
        assert!(holo_build_get_authors(client, std::ptr::null()).is_null());
        holo_client_free(client);
    }

    #[test]
    fn parse_get_patient_success() {
        let client = new_client();
        let id = CString::new("p1").unwrap();
        let body = br#"{"pid":"p1","gender":"female","name":{"full":"Jane Doe"}}"#;
        let resp = response(200, body);
        let result = holo_parse_get_patient(client, id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.data_tag, FfiDataTag::Patient);

        let patient = unsafe { &*(r.data as *const FfiPatient) };
        assert_eq!(c_str(patient.pid), "p1");
        assert_eq!(c_str(patient.name.full), "Jane Doe");
        assert_eq!(c_str(patient.birth_date), "");

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_get_patient_blank_id_is_not_found() {
        let client = new_client();
        let id = CString::new("p1").unwrap();
        let resp = response(200, br#"{"pid":""}"#);
        let result = holo_parse_get_patient(client, id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NotFound);
        assert_eq!(r.data_tag, FfiDataTag::None);
        assert!(r.data.is_null());

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_get_hologram_partial_carries_record_and_message() {
        let client = new_client();
        let id = CString::new("h1").unwrap();
        let resp = response(200, br#"{"hid":"h1","fileSizeInkb":"lots"}"#);
        let result = holo_parse_get_hologram(client, id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Partial);
        assert_eq!(r.data_tag, FfiDataTag::Hologram);
        assert!(c_str(r.error_message).contains("fileSizeInkb"));

        let hologram = unsafe { &*(r.data as *const FfiHologram) };
        assert_eq!(c_str(hologram.hid), "h1");
        assert_eq!(hologram.file_size_in_kb, 0);

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_get_authors_list() {
        let client = new_client();
        let ids = CString::new("a1,a2").unwrap();
        let resp = response(200, br#"{"a1":{"aid":"a1","name":{"given":"Ada"}},"a2":{"aid":""}}"#);
        let result = holo_parse_get_authors(client, ids.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::AuthorList);

        let list = unsafe { &*(r.data as *const FfiRecordList) };
        assert_eq!(list.len, 1);
        let items =
            unsafe { std::slice::from_raw_parts(list.items as *const FfiAuthor, list.len as usize) };
        assert_eq!(c_str(items[0].aid), "a1");
        assert_eq!(c_str(items[0].name.given), "Ada");

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_get_holograms_empty_list() {
        let client = new_client();
        let ids = CString::new("1").unwrap();
        let resp = response(200, br#"{"1":[]}"#);
        let result = holo_parse_get_holograms(client, ids.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.data_tag, FfiDataTag::HologramList);
        let list = unsafe { &*(r.data as *const FfiRecordList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_server_error_sets_http_status() {
        let client = new_client();
        let ids = CString::new("p1").unwrap();
        let resp = response(502, b"bad gateway");
        let result = holo_parse_get_patients(client, ids.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 502);
        assert!(c_str(r.error_message).contains("bad gateway"));

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_download_rejects_non_glb() {
        let client = new_client();
        let id = CString::new("h1").unwrap();
        let resp = response(200, b"<html></html>");
        let result = holo_parse_download_hologram(client, id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidAsset);

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_download_returns_bytes() {
        let client = new_client();
        let id = CString::new("h1").unwrap();
        let mut glb = b"glTF".to_vec();
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&16u32.to_le_bytes());
        glb.extend_from_slice(&[0; 4]);
        let resp = response(200, &glb);
        let result = holo_parse_download_hologram(client, id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::Asset);
        let asset = unsafe { &*(r.data as *const FfiAsset) };
        assert_eq!(asset.len, 16);
        assert_eq!(asset.glb_version, 2);

        holo_free_result(result);
        holo_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let id = CString::new("p1").unwrap();
        let resp = response(200, b"{}");
        let result = holo_parse_get_patient(std::ptr::null(), id.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        holo_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let id = CString::new("p1").unwrap();
        let result = holo_parse_get_patient(client, id.as_ptr(), std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert!(c_str(r.error_message).contains("response"));
        holo_free_result(result);
        holo_client_free(client);
    }

    /// Play the host: build through the C surface, execute with a real HTTP
    /// client against the mock server, and hand the bytes back to parse.
    #[test]
    fn host_round_trip_against_mock_server() {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = std_listener.local_addr().unwrap().port();
        std_listener.set_nonblocking(true).unwrap();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        let endpoint = CString::new("http://127.0.0.1").unwrap();
        let port = CString::new(port.to_string()).unwrap();
        let version = CString::new("1.0.0").unwrap();
        let client = holo_client_new(endpoint.as_ptr(), port.as_ptr(), version.as_ptr());
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let execute = |req: *mut FfiHttpRequest| -> (u16, Vec<u8>) {
            let path = c_str(unsafe { &*req }.path).to_string();
            holo_free_request(req);
            let mut resp = agent.get(&path).call().unwrap();
            let status = resp.status().as_u16();
            (status, resp.body_mut().read_to_vec().unwrap())
        };

        let ids = CString::new("p-100,missing,p-101").unwrap();
        let (status, body) = execute(holo_build_get_patients(client, ids.as_ptr()));
        let resp = response(status, &body);
        let result = holo_parse_get_patients(client, ids.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        let list = unsafe { &*(r.data as *const FfiRecordList) };
        assert_eq!(list.len, 2);
        holo_free_result(result);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["missing"]["pid"], "");

        let hid = CString::new("h-1").unwrap();
        let (status, body) = execute(holo_build_download_hologram(client, hid.as_ptr()));
        let resp = response(status, &body);
        let result = holo_parse_download_hologram(client, hid.as_ptr(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(unsafe { &*(r.data as *const FfiAsset) }.glb_version, 2);
        holo_free_result(result);

        holo_client_free(client);
    }

    #[test]
    fn free_request_null_is_safe() {
        holo_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        holo_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        holo_free_string(std::ptr::null_mut());
    }
}
