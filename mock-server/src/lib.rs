use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

pub const API_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersonName {
    pub title: String,
    pub full: String,
    pub given: String,
    pub family: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub pid: String,
    pub gender: String,
    pub birth_date: String,
    pub name: PersonName,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Author {
    pub aid: String,
    pub name: PersonName,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
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

/// Everything the server knows, keyed by identifier.
#[derive(Debug, Default)]
pub struct Store {
    pub patients: HashMap<String, Patient>,
    pub authors: HashMap<String, Author>,
    pub holograms: HashMap<String, Hologram>,
    pub assets: HashMap<String, Vec<u8>>,
}

impl Store {
    pub fn insert_patient(&mut self, patient: Patient) {
        self.patients.insert(patient.pid.clone(), patient);
    }

    pub fn insert_author(&mut self, author: Author) {
        self.authors.insert(author.aid.clone(), author);
    }

    /// Inserts the metadata and serves `minimal_glb()` as its download.
    pub fn insert_hologram(&mut self, hologram: Hologram) {
        self.assets.insert(hologram.hid.clone(), minimal_glb());
        self.holograms.insert(hologram.hid.clone(), hologram);
    }

    /// A small fixed data set: two patients, one author, two holograms.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.insert_patient(Patient {
            pid: "p-100".to_string(),
            gender: "female".to_string(),
            birth_date: "1974-11-02".to_string(),
            name: name("Ms", "Jane Doe", "Jane", "Doe"),
        });
        store.insert_patient(Patient {
            pid: "p-101".to_string(),
            gender: "male".to_string(),
            birth_date: "1990-03-15".to_string(),
            name: name("Mr", "John Roe", "John", "Roe"),
        });
        store.insert_author(Author {
            aid: "a-1".to_string(),
            name: name("Dr", "Ada Byron", "Ada", "Byron"),
        });
        store.insert_hologram(hologram("h-1", "Heart", "chest", 5120));
        store.insert_hologram(hologram("h-2", "Left femur", "leg", 2048));
        store
    }
}

fn name(title: &str, full: &str, given: &str, family: &str) -> PersonName {
    PersonName {
        title: title.to_string(),
        full: full.to_string(),
        given: given.to_string(),
        family: family.to_string(),
    }
}

fn hologram(hid: &str, title: &str, body_site: &str, file_size_in_kb: i64) -> Hologram {
    Hologram {
        hid: hid.to_string(),
        title: title.to_string(),
        description: format!("{title} segmented from CT"),
        content_type: "model/gltf-binary".to_string(),
        file_size_in_kb,
        body_site: body_site.to_string(),
        date_of_imaging: "2019-07-01".to_string(),
        creation_date: "2019-07-03".to_string(),
        creation_mode: "GENERATE_FROM_IMAGING_STUDY".to_string(),
        creation_description: "automatic segmentation".to_string(),
        aid: "a-1".to_string(),
        pid: "p-100".to_string(),
    }
}

/// Smallest valid GLB: header plus a JSON chunk declaring glTF 2.0.
pub fn minimal_glb() -> Vec<u8> {
    let mut json = br#"{"asset":{"version":"2.0"}}"#.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let total = 12 + 8 + json.len();

    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb
}

pub type Db = Arc<Store>;

/// Router over the seeded store.
pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(store);
    Router::new()
        .route("/api/{version}/patients", get(batch_patients))
        .route("/api/{version}/patients/{pid}", get(get_patient))
        .route("/api/{version}/authors", get(batch_authors))
        .route("/api/{version}/authors/{aid}", get(get_author))
        .route("/api/{version}/holograms", get(batch_holograms))
        .route("/api/{version}/holograms/{hid}", get(get_hologram))
        .route("/api/{version}/holograms/{hid}/download", get(download_hologram))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Params = Query<HashMap<String, String>>;

fn check_version(version: &str) -> Result<(), StatusCode> {
    if version == API_VERSION {
        Ok(())
    } else {
        tracing::warn!(version, "unsupported api version");
        Err(StatusCode::NOT_FOUND)
    }
}

fn ids<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<Vec<&'a str>, StatusCode> {
    let list = params.get(key).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(list.split(',').filter(|id| !id.is_empty()).collect())
}

/// `{ "<id>": record }`, with a blank-identifier object for unknown IDs.
fn keyed<T: Serialize>(
    ids: Vec<&str>,
    id_field: &str,
    lookup: impl Fn(&str) -> Option<T>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let mut out = Map::new();
    for id in ids {
        let value = match lookup(id) {
            Some(record) => {
                serde_json::to_value(record).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            }
            None => serde_json::json!({ id_field: "" }),
        };
        out.insert(id.to_string(), value);
    }
    Ok(Json(out))
}

async fn batch_patients(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    check_version(&version)?;
    let ids = ids(&params, "pid")?;
    tracing::info!(count = ids.len(), "batch patients");
    keyed(ids, "pid", |id| db.patients.get(id).cloned())
}

async fn batch_authors(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    check_version(&version)?;
    let ids = ids(&params, "aid")?;
    tracing::info!(count = ids.len(), "batch authors");
    keyed(ids, "aid", |id| db.authors.get(id).cloned())
}

/// `{ "<id>": [record, ...] }`; unknown IDs map to an empty array.
async fn batch_holograms(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Params,
) -> Result<Json<HashMap<String, Vec<Hologram>>>, StatusCode> {
    check_version(&version)?;
    let ids = ids(&params, "hid")?;
    tracing::info!(count = ids.len(), "batch holograms");
    Ok(Json(
        ids.into_iter()
            .map(|id| (id.to_string(), db.holograms.get(id).cloned().into_iter().collect()))
            .collect(),
    ))
}

async fn get_patient(
    State(db): State<Db>,
    Path((version, pid)): Path<(String, String)>,
) -> Result<Json<Patient>, StatusCode> {
    check_version(&version)?;
    db.patients.get(&pid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_author(
    State(db): State<Db>,
    Path((version, aid)): Path<(String, String)>,
) -> Result<Json<Author>, StatusCode> {
    check_version(&version)?;
    db.authors.get(&aid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_hologram(
    State(db): State<Db>,
    Path((version, hid)): Path<(String, String)>,
) -> Result<Json<Hologram>, StatusCode> {
    check_version(&version)?;
    db.holograms.get(&hid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn download_hologram(
    State(db): State<Db>,
    Path((version, hid)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    check_version(&version)?;
    let bytes = db.assets.get(&hid).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, "model/gltf-binary")], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hologram_serializes_wire_names() {
        let json = serde_json::to_value(hologram("h", "T", "site", 7)).unwrap();
        assert_eq!(json["fileSizeInkb"], 7);
        assert_eq!(json["bodySite"], "site");
        assert_eq!(json["creationDescription"], "automatic segmentation");
    }

    #[test]
    fn patient_serializes_birth_date_in_camel_case() {
        let store = Store::seeded();
        let json = serde_json::to_value(&store.patients["p-100"]).unwrap();
        assert_eq!(json["birthDate"], "1974-11-02");
        assert_eq!(json["name"]["family"], "Doe");
    }

    #[test]
    fn minimal_glb_declares_its_own_length() {
        let glb = minimal_glb();
        assert_eq!(&glb[..4], b"glTF");
        let declared = u32::from_le_bytes([glb[8], glb[9], glb[10], glb[11]]);
        assert_eq!(declared as usize, glb.len());
        assert_eq!(glb.len() % 4, 0);
    }

    #[test]
    fn seeded_holograms_have_assets() {
        let store = Store::seeded();
        for hid in store.holograms.keys() {
            assert!(store.assets.contains_key(hid));
        }
    }

    #[test]
    fn ids_requires_query_key() {
        let params = HashMap::from([("pid".to_string(), "1,,2".to_string())]);
        assert_eq!(ids(&params, "pid").unwrap(), vec!["1", "2"]);
        assert_eq!(ids(&params, "aid").unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
