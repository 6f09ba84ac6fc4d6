//! Authenticated REST client for the Servimatch backend.

use crate::config::Config;
use crate::profile::availability::AvailabilityMap;
use crate::profile::submission::{image_mime, ProfileSubmission};
use crate::session::Session;
use crate::utils::null_as_empty;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the Servimatch backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    session: Session,
}

/// Current user as returned by `GET /api/usuarios/me/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteProfile {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nombre: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub apellido: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub telefono: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub biografia: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub direccion: String,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub foto_perfil: Option<String>,
    #[serde(default)]
    pub trabajador_profile: Option<WorkerProfile>,
}

/// Worker block nested in the current user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerProfile {
    /// JSON string in most responses, sometimes an object
    #[serde(default)]
    pub disponibilidad: Option<Value>,
    #[serde(default)]
    pub servicios: Vec<Value>,
    /// Id, numeric string or `{ "id": .. }` depending on the serializer
    #[serde(default)]
    pub profesion: Option<Value>,
    #[serde(default)]
    pub anos_experiencia: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub descripcion_breve: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub idiomas: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profession {
    pub id: u64,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    pub id: u64,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mensaje: String,
    #[serde(default)]
    pub leido: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nombre: String,
    /// "HH:MM" or "HH:MM:SS"
    pub duracion_estimado: String,
    #[serde(default)]
    pub trabajador: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<u64>,
    pub hora_inicio: String,
    #[serde(default)]
    pub hora_fin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GalleryPhoto {
    id: u64,
}

fn value_as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map.get("id").and_then(value_as_id),
        _ => None,
    }
}

impl WorkerProfile {
    pub fn profession_id(&self) -> Option<u64> {
        self.profesion.as_ref().and_then(value_as_id)
    }

    pub fn service_ids(&self) -> Vec<u64> {
        self.servicios.iter().filter_map(value_as_id).collect()
    }

    /// Parsed weekly availability; malformed data degrades to an empty map.
    pub fn availability(&self) -> AvailabilityMap {
        match &self.disponibilidad {
            Some(Value::String(raw)) => AvailabilityMap::from_backend_json(raw),
            Some(obj @ Value::Object(_)) => AvailabilityMap::from_backend_json(&obj.to_string()),
            _ => AvailabilityMap::new(),
        }
    }
}

impl RemoteProfile {
    /// Absolute URL of the avatar; the backend may return a path.
    pub fn photo_url(&self, base_url: &str) -> Option<String> {
        let photo = self.foto_perfil.as_deref().filter(|p| !p.is_empty())?;
        if photo.starts_with("http") {
            Some(photo.to_string())
        } else {
            Some(format!("{}{}", base_url, photo))
        }
    }
}

/// Best-effort message from an error response body.
///
/// Looks at `detail`, `error` and `message` in a JSON body, then the raw text,
/// then falls back to the status line.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error", "message"] {
            match json.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
                Some(other @ (Value::Array(_) | Value::Object(_))) => return other.to_string(),
                _ => {}
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}

impl ApiClient {
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", self.session.bearer())
            .header("Accept", "application/json")
    }

    /// Send a request and turn non-2xx statuses into errors.
    async fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Response> {
        debug!(
            "{} {} (token {})",
            method,
            path,
            self.session.token_preview()
        );
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach the server ({} {})", method, path))?;

        let status = response.status();
        if status.is_success() {
            debug!("{} {} -> {}", method, path, status.as_u16());
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("{} {} failed with {}: {}", method, path, status, body);
        if status == StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "Sesión expirada o inválida: {}",
                extract_error_message(status, &body)
            );
        }
        anyhow::bail!("{}", extract_error_message(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .send("GET", path, self.http_client.get(self.url(path)))
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }

    pub async fn get_profile(&self) -> Result<RemoteProfile> {
        info!("Fetching current profile");
        self.get_json("/api/usuarios/me/").await
    }

    pub async fn list_professions(&self) -> Result<Vec<Profession>> {
        self.get_json("/api/profesiones/").await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.get_json("/api/servicios/").await
    }

    /// Send the assembled profile as one multipart PUT.
    pub async fn update_profile(&self, submission: ProfileSubmission) -> Result<()> {
        let path = "/api/usuarios/actualizar-perfil/";
        info!(
            "Submitting profile update (rol={}, trabajador={}, foto={})",
            submission.field("rol").unwrap_or_default(),
            submission.has_field("trabajador"),
            submission.photo().is_some()
        );
        let form = submission.into_form().await?;
        self.send(
            "PUT",
            path,
            self.http_client.put(self.url(path)).multipart(form),
        )
        .await?;
        info!("Profile updated");
        Ok(())
    }

    /// Add a photo to the worker gallery. Returns the new photo id.
    pub async fn upload_gallery_photo(&self, path: &Path) -> Result<u64> {
        let endpoint = "/api/fotos-trabajador/";
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read photo: {:?}", path))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("foto.jpg")
            .to_string();
        let part = Part::bytes(bytes)
            .mime_str(&image_mime(&file_name))
            .context("Invalid photo content type")?
            .file_name(file_name);
        let form = Form::new().part("imagen", part);

        let response = self
            .send(
                "POST",
                endpoint,
                self.http_client.post(self.url(endpoint)).multipart(form),
            )
            .await?;
        let photo: GalleryPhoto = response
            .json()
            .await
            .context("Failed to parse gallery photo response")?;
        info!("Uploaded gallery photo {}", photo.id);
        Ok(photo.id)
    }

    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get_json("/api/notificaciones/").await
    }

    pub async fn unread_notifications(&self) -> Result<usize> {
        Ok(count_unread(&self.list_notifications().await?))
    }

    pub async fn mark_notifications_read(&self) -> Result<()> {
        let path = "/api/notificaciones/marcar_como_leidas/";
        self.send(
            "POST",
            path,
            self.http_client
                .post(self.url(path))
                .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }

    pub async fn get_plan(&self, id: u64) -> Result<Plan> {
        self.get_json(&format!("/api/planes/{}/", id)).await
    }

    pub async fn list_reservations(&self, plan: u64, date: NaiveDate) -> Result<Vec<Reservation>> {
        let path = "/api/reservas/";
        let fecha = date.format("%Y-%m-%d").to_string();
        let response = self
            .send(
                "GET",
                path,
                self.http_client
                    .get(self.url(path))
                    .query(&[("plan", plan.to_string()), ("fecha", fecha)]),
            )
            .await?;
        response
            .json()
            .await
            .context("Failed to parse reservations")
    }
}

pub fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.leido).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Teléfono ya registrado"}"#),
            "Teléfono ya registrado"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"error": "x", "message": "y"}"#),
            "x"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"message": "y"}"#),
            "y"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, r#"{"telefono": ["inválido"]}"#),
            r#"{"telefono": ["inválido"]}"#
        );
        assert_eq!(
            extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_remote_profile_tolerates_nulls_and_string_availability() {
        let json = r#"{
            "id": 3,
            "nombre": "Ana",
            "apellido": null,
            "rol": "ambos",
            "foto_perfil": "/media/fotos/ana.jpg",
            "trabajador_profile": {
                "disponibilidad": "{\"lunes\": [{\"inicio\": \"09:00\", \"fin\": \"13:00\"}]}",
                "servicios": [1, "4"],
                "profesion": {"id": 2, "nombre": "Gasfíter"}
            }
        }"#;
        let profile: RemoteProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.apellido, "");
        assert_eq!(
            profile.photo_url("http://api").as_deref(),
            Some("http://api/media/fotos/ana.jpg")
        );
        let worker = profile.trabajador_profile.unwrap();
        assert_eq!(worker.profession_id(), Some(2));
        assert_eq!(worker.service_ids(), vec![1, 4]);
        let availability = worker.availability();
        assert_eq!(
            availability.summary(crate::profile::Weekday::Lunes),
            "09:00–13:00"
        );
    }

    #[test]
    fn test_count_unread() {
        let list: Vec<Notification> = serde_json::from_str(
            r#"[{"id":1,"mensaje":"a","leido":false},{"id":2,"mensaje":"b","leido":true},{"id":3,"mensaje":null}]"#,
        )
        .unwrap();
        assert_eq!(count_unread(&list), 2);
    }
}
