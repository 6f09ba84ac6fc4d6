//! Assembly of the multipart profile-update request.

use crate::profile::availability::AvailabilityMap;
use crate::profile::draft::ProfileDraft;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name used when the photo path has no usable last segment.
pub const DEFAULT_PHOTO_NAME: &str = "photo.jpg";

/// Worker data sent as the `trabajador` JSON text part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerPayload {
    pub profesion: Option<u64>,
    pub anos_experiencia: Option<u32>,
    pub descripcion_breve: String,
    pub idiomas: String,
    pub disponibilidad: AvailabilityMap,
    pub servicios: Vec<u64>,
}

/// Image attached as `foto_perfil`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl PhotoAttachment {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PHOTO_NAME)
            .to_string();
        let mime = image_mime(&file_name);
        Self {
            path: path.to_path_buf(),
            file_name,
            mime,
        }
    }
}

/// `image/{ext}` with `jpg` normalized to `jpeg`.
pub fn image_mime(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "jpeg".to_string());
    match ext.as_str() {
        "jpg" => "image/jpeg".to_string(),
        other => format!("image/{}", other),
    }
}

/// A fully assembled profile update, ready to be turned into a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSubmission {
    fields: Vec<(String, String)>,
    photo: Option<PhotoAttachment>,
}

impl ProfileSubmission {
    /// Collect the draft into text parts plus the optional photo.
    ///
    /// Incomplete availability rows are dropped. Only worker roles carry a
    /// `trabajador` part.
    pub fn assemble(
        draft: &ProfileDraft,
        availability: &AvailabilityMap,
        services: &[u64],
    ) -> Result<Self> {
        let mut fields = vec![
            ("nombre".to_string(), draft.first_name.trim().to_string()),
            ("apellido".to_string(), draft.last_name.trim().to_string()),
            ("telefono".to_string(), draft.phone.trim().to_string()),
            ("biografia".to_string(), draft.description.trim().to_string()),
            ("rol".to_string(), draft.role.as_str().to_string()),
            ("direccion".to_string(), draft.address.trim().to_string()),
        ];

        if let Some(location) = draft.location {
            fields.push(("latitud".to_string(), location.latitude.to_string()));
            fields.push(("longitud".to_string(), location.longitude.to_string()));
        }

        if draft.role.is_worker() {
            let worker = WorkerPayload {
                profesion: draft.profession_id,
                anos_experiencia: draft.years_experience.trim().parse().ok(),
                descripcion_breve: draft.short_description.trim().to_string(),
                idiomas: draft.languages.trim().to_string(),
                disponibilidad: availability.filtered(),
                servicios: services.to_vec(),
            };
            let json =
                serde_json::to_string(&worker).context("Failed to serialize worker profile")?;
            fields.push(("trabajador".to_string(), json));
        }

        Ok(Self {
            fields,
            photo: draft.photo.as_deref().map(PhotoAttachment::from_path),
        })
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of a text part.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn photo(&self) -> Option<&PhotoAttachment> {
        self.photo.as_ref()
    }

    /// Build the multipart form, reading the photo from disk.
    pub async fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(photo) = self.photo {
            let bytes = tokio::fs::read(&photo.path)
                .await
                .with_context(|| format!("Failed to read photo: {:?}", photo.path))?;
            let part = Part::bytes(bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.mime)
                .context("Invalid photo content type")?;
            form = form.part("foto_perfil", part);
        }
        Ok(form)
    }
}
