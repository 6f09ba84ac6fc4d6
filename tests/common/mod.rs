//! Shared test utilities: an in-process mock of the Servimatch backend and
//! the geocoding service.
//!
//! `MockBackend::start()` binds an Axum server to a random local port and
//! records every request (headers, query, multipart parts) so tests can
//! assert on exactly what the client sent.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use servimatch::config::Config;
use servimatch::session::Session;
use servimatch::ApiClient;

pub const TEST_TOKEN: &str = "test-access-token";

/// File part received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub files: BTreeMap<String, UploadedFile>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    notifications: Arc<Mutex<Vec<Value>>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        *state.notifications.lock().unwrap() = vec![
            json!({"id": 1, "mensaje": "Nueva reserva", "leido": false}),
            json!({"id": 2, "mensaje": "Reserva cancelada", "leido": false}),
            json!({"id": 3, "mensaje": "Bienvenido", "leido": true}),
        ];

        let app = Router::new()
            .route("/api/usuarios/me/", get(me))
            .route("/api/profesiones/", get(professions))
            .route("/api/servicios/", get(services))
            .route("/api/usuarios/actualizar-perfil/", put(update_profile))
            .route("/api/fotos-trabajador/", post(upload_gallery_photo))
            .route("/api/notificaciones/", get(notifications))
            .route("/api/notificaciones/marcar_como_leidas/", post(mark_read))
            .route("/api/planes/{id}/", get(plan))
            .route("/api/reservas/", get(reservations))
            .route("/search", get(search))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        // Give the server a moment to start accepting connections.
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// Config pointing both the backend and geocoding at this server.
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.base_url.clone(),
            geocoding_url: self.base_url.clone(),
            ..Config::default()
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_token(TEST_TOKEN)
    }

    pub fn client_with_token(&self, token: &str) -> ApiClient {
        ApiClient::new(&self.config(), Session::new(token)).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_request_to(&self, path: &str) -> Option<RecordedRequest> {
        self.requests_to(path).pop()
    }
}

fn record(state: &MockState, method: &Method, uri: &Uri, headers: &HeaderMap) -> RecordedRequest {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        user_agent: header("user-agent"),
        fields: BTreeMap::new(),
        files: BTreeMap::new(),
    };
    state.requests.lock().unwrap().push(request.clone());
    request
}

fn store_parts(state: &MockState, request: RecordedRequest) {
    let mut requests = state.requests.lock().unwrap();
    if let Some(last) = requests
        .iter_mut()
        .rev()
        .find(|r| r.path == request.path && r.method == request.method)
    {
        *last = request;
    }
}

async fn read_multipart(mut multipart: Multipart, request: &mut RecordedRequest) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        match file_name {
            Some(file_name) => {
                request.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        size: bytes.len(),
                    },
                );
            }
            None => {
                request
                    .fields
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", TEST_TOKEN);
    let ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if ok {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Token inválido"})),
            )
                .into_response(),
        )
    }
}

async fn me(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let availability = json!({
        "lunes": [{"inicio": "09:00", "fin": "13:00"}, {"inicio": "15:00", "fin": ""}],
        "miercoles": [{"inicio": "10:00", "fin": "18:00"}]
    });
    Json(json!({
        "id": 5,
        "nombre": "Ana",
        "apellido": "Pérez",
        "telefono": "+56912345678",
        "biografia": null,
        "direccion": "Av. Providencia 1234, Providencia",
        "rol": "trabajador",
        "latitud": -33.4263,
        "longitud": -70.6170,
        "foto_perfil": "/media/fotos/ana.jpg",
        "trabajador_profile": {
            "disponibilidad": availability.to_string(),
            "servicios": [2, {"id": 3}],
            "profesion": {"id": 1, "nombre": "Gasfiter"},
            "anos_experiencia": 7,
            "descripcion_breve": "Gasfitería domiciliaria",
            "idiomas": "Español"
        }
    }))
    .into_response()
}

async fn professions() -> Json<Value> {
    Json(json!([
        {"id": 1, "nombre": "Gasfiter"},
        {"id": 2, "nombre": "Electricista"}
    ]))
}

async fn services() -> Json<Value> {
    Json(json!([
        {"id": 2, "nombre": "Reparación de fugas"},
        {"id": 3, "nombre": "Instalación de calefont"},
        {"id": 4, "nombre": "Cambio de enchufes"}
    ]))
}

async fn update_profile(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let mut request = record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    read_multipart(multipart, &mut request).await;
    let rejected = request.fields.get("telefono").is_some_and(|t| t.is_empty());
    store_parts(&state, request);
    if rejected {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "El teléfono es obligatorio"})),
        )
            .into_response();
    }
    Json(json!({"mensaje": "Perfil actualizado"})).into_response()
}

async fn upload_gallery_photo(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let mut request = record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    read_multipart(multipart, &mut request).await;
    store_parts(&state, request);
    (StatusCode::CREATED, Json(json!({"id": 42, "imagen": "/media/galeria/1.jpg"}))).into_response()
}

async fn notifications(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let list = state.notifications.lock().unwrap().clone();
    Json(Value::Array(list)).into_response()
}

async fn mark_read(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    for n in state.notifications.lock().unwrap().iter_mut() {
        n["leido"] = json!(true);
    }
    Json(json!({})).into_response()
}

async fn plan(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    if id == 999 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "No encontrado."}))).into_response();
    }
    Json(json!({
        "id": id,
        "nombre": "Mantención de calefont",
        "duracion_estimado": "02:00:00",
        "trabajador": 5
    }))
    .into_response()
}

async fn reservations(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri, &headers);
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    Json(json!([
        {"id": 10, "hora_inicio": "10:00:00", "hora_fin": "12:00:00"},
        {"id": 11, "hora_inicio": "15:00:00", "hora_fin": "17:00:00"}
    ]))
    .into_response()
}

async fn search(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap) -> Json<Value> {
    record(&state, &method, &uri, &headers);
    let places: Vec<Value> = (1..=7)
        .map(|i| {
            // Place 2 carries coordinates the client must skip
            let lat = if i == 2 {
                "not-a-number".to_string()
            } else {
                format!("-33.42{}", i)
            };
            json!({
                "place_id": i,
                "display_name": format!("Avenida Providencia {}, Providencia, Chile", i * 100),
                "lat": lat,
                "lon": format!("-70.61{}", i)
            })
        })
        .collect();
    Json(Value::Array(places))
}
