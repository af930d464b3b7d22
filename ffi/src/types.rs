//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer plus length instead of
//! `Vec`, and tagged enums with explicit discriminants. Conversion functions
//! live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use holostorage_core::{ApiError, Author, Hologram, HologramAsset, Mapped, Patient, PersonName};

/// Opaque handle to a `HoloStorageClient`. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiHoloClient {
    pub(crate) inner: holostorage_core::HoloStorageClient,
}

/// Copy `s` into a heap C string. Interior NULs are dropped rather than
/// failing the whole conversion.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

/// Hand a `Vec` over to C as pointer plus length. Empty vectors become null.
pub(crate) fn vec_into_raw<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len();
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Take back a `Vec` produced by `vec_into_raw`.
///
/// # Safety
/// `ptr` and `len` must come from one `vec_into_raw` call.
pub(crate) unsafe fn vec_from_raw<T>(ptr: *mut T, len: usize) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
///
/// Built by `holo_build_*` functions. The C caller executes the request
/// and passes the response back through `holo_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: holostorage_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = vec_into_raw(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            path: c_string(req.path),
            headers,
            headers_len: headers_len as u32,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller fills this in after executing a request, then passes a
/// pointer to a `holo_parse_*` function. The body is raw bytes because
/// hologram downloads are binary. The FFI layer reads but does not free it.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

#[repr(C)]
pub struct FfiPersonName {
    pub title: *mut c_char,
    pub full: *mut c_char,
    pub given: *mut c_char,
    pub family: *mut c_char,
}

impl From<PersonName> for FfiPersonName {
    fn from(n: PersonName) -> Self {
        FfiPersonName {
            title: c_string(n.title),
            full: c_string(n.full),
            given: c_string(n.given),
            family: c_string(n.family),
        }
    }
}

#[repr(C)]
pub struct FfiPatient {
    pub pid: *mut c_char,
    pub gender: *mut c_char,
    pub birth_date: *mut c_char,
    pub name: FfiPersonName,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        FfiPatient {
            pid: c_string(p.pid),
            gender: c_string(p.gender),
            birth_date: c_string(p.birth_date),
            name: p.name.into(),
        }
    }
}

#[repr(C)]
pub struct FfiHologram {
    pub hid: *mut c_char,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub content_type: *mut c_char,
    pub file_size_in_kb: i64,
    pub body_site: *mut c_char,
    pub date_of_imaging: *mut c_char,
    pub creation_date: *mut c_char,
    pub creation_mode: *mut c_char,
    pub creation_description: *mut c_char,
    pub aid: *mut c_char,
    pub pid: *mut c_char,
}

impl From<Hologram> for FfiHologram {
    fn from(h: Hologram) -> Self {
        FfiHologram {
            hid: c_string(h.hid),
            title: c_string(h.title),
            description: c_string(h.description),
            content_type: c_string(h.content_type),
            file_size_in_kb: h.file_size_in_kb,
            body_site: c_string(h.body_site),
            date_of_imaging: c_string(h.date_of_imaging),
            creation_date: c_string(h.creation_date),
            creation_mode: c_string(h.creation_mode),
            creation_description: c_string(h.creation_description),
            aid: c_string(h.aid),
            pid: c_string(h.pid),
        }
    }
}

#[repr(C)]
pub struct FfiAuthor {
    pub aid: *mut c_char,
    pub name: FfiPersonName,
}

impl From<Author> for FfiAuthor {
    fn from(a: Author) -> Self {
        FfiAuthor {
            aid: c_string(a.aid),
            name: a.name.into(),
        }
    }
}

/// A list of records exposed to C. `data_tag` on the enclosing result says
/// which record type `items` points to.
#[repr(C)]
pub struct FfiRecordList {
    pub items: *mut c_void,
    pub len: u32,
}

/// The bytes of a downloaded GLB container.
#[repr(C)]
pub struct FfiAsset {
    pub bytes: *mut u8,
    pub len: usize,
    pub glb_version: u32,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiHoloResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    /// `data` holds a record whose malformed fields were defaulted;
    /// `error_message` lists them.
    Partial = 2,
    Http = 3,
    Deserialization = 4,
    InvalidAsset = 5,
    Transport = 6,
    Panic = 7,
    NullArg = 8,
}

/// Tag that tells `holo_free_result` what `FfiHoloResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Patient = 1,
    PatientList = 2,
    Hologram = 3,
    HologramList = 4,
    Author = 5,
    AuthorList = 6,
    Asset = 7,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`). `Partial` carries
/// both a payload and a message. Every other code carries only a message.
#[repr(C)]
pub struct FfiHoloResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

fn boxed<T>(value: T) -> *mut c_void {
    Box::into_raw(Box::new(value)) as *mut c_void
}

fn list<C, T: Into<C>>(records: Vec<T>) -> *mut c_void {
    let items: Vec<C> = records.into_iter().map(Into::into).collect();
    let (items, len) = vec_into_raw(items);
    boxed(FfiRecordList {
        items: items as *mut c_void,
        len: len as u32,
    })
}

impl FfiHoloResult {
    fn new(
        error_code: FfiErrorCode,
        error_message: Option<String>,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiHoloResult {
            error_code,
            error_message: error_message.map_or(std::ptr::null_mut(), c_string),
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a result from a single-entity outcome.
    fn from_mapped<T, C>(mapped: Mapped<T>, tag: FfiDataTag) -> *mut Self
    where
        T: Into<C>,
    {
        match mapped {
            Mapped::Found(record) => {
                Self::new(FfiErrorCode::Ok, None, 0, tag, boxed::<C>(record.into()))
            }
            Mapped::Partial { record, issues } => Self::new(
                FfiErrorCode::Partial,
                Some(issues.join("; ")),
                0,
                tag,
                boxed::<C>(record.into()),
            ),
            Mapped::NotFound => Self::new(
                FfiErrorCode::NotFound,
                Some("resource not found".to_string()),
                0,
                FfiDataTag::None,
                std::ptr::null_mut(),
            ),
        }
    }

    pub(crate) fn patient(mapped: Mapped<Patient>) -> *mut Self {
        Self::from_mapped::<_, FfiPatient>(mapped, FfiDataTag::Patient)
    }

    pub(crate) fn hologram(mapped: Mapped<Hologram>) -> *mut Self {
        Self::from_mapped::<_, FfiHologram>(mapped, FfiDataTag::Hologram)
    }

    pub(crate) fn author(mapped: Mapped<Author>) -> *mut Self {
        Self::from_mapped::<_, FfiAuthor>(mapped, FfiDataTag::Author)
    }

    pub(crate) fn patient_list(records: Vec<Patient>) -> *mut Self {
        let data = list::<FfiPatient, _>(records);
        Self::new(FfiErrorCode::Ok, None, 0, FfiDataTag::PatientList, data)
    }

    pub(crate) fn hologram_list(records: Vec<Hologram>) -> *mut Self {
        let data = list::<FfiHologram, _>(records);
        Self::new(FfiErrorCode::Ok, None, 0, FfiDataTag::HologramList, data)
    }

    pub(crate) fn author_list(records: Vec<Author>) -> *mut Self {
        let data = list::<FfiAuthor, _>(records);
        Self::new(FfiErrorCode::Ok, None, 0, FfiDataTag::AuthorList, data)
    }

    pub(crate) fn asset(asset: HologramAsset) -> *mut Self {
        let glb_version = asset.header.version;
        let (bytes, len) = vec_into_raw(asset.bytes);
        let data = boxed(FfiAsset {
            bytes,
            len,
            glb_version,
        });
        Self::new(FfiErrorCode::Ok, None, 0, FfiDataTag::Asset, data)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Transport { .. } => (FfiErrorCode::Transport, 0),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::InvalidAsset(_) => (FfiErrorCode::InvalidAsset, 0),
        };
        Self::new(
            error_code,
            Some(err.to_string()),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::new(
            FfiErrorCode::NullArg,
            Some(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::new(
            FfiErrorCode::Panic,
            Some(msg.to_string()),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
