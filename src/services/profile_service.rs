//! Loading and submitting the user's profile.

use crate::api::{ApiClient, Profession, RemoteProfile, Service};
use crate::profile::availability::AvailabilityMap;
use crate::profile::draft::{Location, ProfileDraft, Role};
use crate::profile::submission::ProfileSubmission;
use crate::services::task::{spawn_task, TaskHandle};
use anyhow::Result;
use tokio::runtime::Handle;
use tracing::{info, warn};

/// Everything the wizard needs to start editing.
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub draft: ProfileDraft,
    /// Every day has at least one row to edit
    pub availability: AvailabilityMap,
    pub selected_services: Vec<u64>,
    pub professions: Vec<Profession>,
    pub services: Vec<Service>,
}

pub struct ProfileService;

impl ProfileService {
    /// Fetch the profile and the catalogues concurrently.
    pub async fn load(api: &ApiClient, communes: &[String]) -> Result<LoadedProfile> {
        let (remote, professions, services) = tokio::try_join!(
            api.get_profile(),
            api.list_professions(),
            api.list_services()
        )?;
        info!(
            "Loaded profile ({} professions, {} services)",
            professions.len(),
            services.len()
        );

        let (availability, selected_services) = match &remote.trabajador_profile {
            Some(worker) => (worker.availability(), worker.service_ids()),
            None => (AvailabilityMap::new(), Vec::new()),
        };

        Ok(LoadedProfile {
            draft: Self::draft_from_remote(&remote, communes),
            availability: availability.with_placeholder_rows(),
            selected_services,
            professions,
            services,
        })
    }

    /// Pre-fill a draft from the backend profile.
    ///
    /// The backend does not store the commune, so it is recovered from the
    /// address text when one of `communes` appears in it.
    pub fn draft_from_remote(remote: &RemoteProfile, communes: &[String]) -> ProfileDraft {
        let mut draft = ProfileDraft::new();
        draft.first_name = remote.nombre.clone();
        draft.last_name = remote.apellido.clone();
        draft.phone = remote.telefono.clone();
        draft.description = remote.biografia.clone();

        let address_lower = remote.direccion.to_lowercase();
        if let Some(commune) = communes
            .iter()
            .find(|c| address_lower.contains(&c.to_lowercase()))
            .or_else(|| communes.first())
        {
            draft.commune = commune.clone();
        }
        draft.address = remote.direccion.clone();
        if let (Some(latitude), Some(longitude)) = (remote.latitud, remote.longitud) {
            draft.location = Some(Location {
                latitude,
                longitude,
            });
        }

        draft.role = match remote.rol.as_deref() {
            Some(rol) => rol.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to cliente", e);
                Role::Cliente
            }),
            None => Role::Cliente,
        };

        if let Some(worker) = &remote.trabajador_profile {
            draft.profession_id = worker.profession_id();
            draft.years_experience = worker
                .anos_experiencia
                .map(|y| y.to_string())
                .unwrap_or_default();
            draft.short_description = worker.descripcion_breve.clone();
            draft.languages = worker.idiomas.clone();
        }
        draft
    }

    pub fn start_load(runtime: &Handle, api: ApiClient, communes: Vec<String>) -> TaskHandle<LoadedProfile> {
        spawn_task(runtime, async move { Self::load(&api, &communes).await })
    }

    pub fn start_submit(
        runtime: &Handle,
        api: ApiClient,
        submission: ProfileSubmission,
    ) -> TaskHandle<()> {
        spawn_task(runtime, async move { api.update_profile(submission).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn communes() -> Vec<String> {
        vec!["Santiago".to_string(), "Ñuñoa".to_string()]
    }

    #[test]
    fn test_draft_from_remote_worker() {
        let remote: RemoteProfile = serde_json::from_str(
            r#"{
                "nombre": "Luis",
                "apellido": "Soto",
                "telefono": "+56911112222",
                "biografia": "bio",
                "direccion": "Irarrázaval 3000, ÑUÑOA",
                "rol": "trabajador",
                "latitud": -33.45,
                "longitud": -70.6,
                "trabajador_profile": {
                    "profesion": 5,
                    "anos_experiencia": 12,
                    "descripcion_breve": "Pintor de interiores",
                    "idiomas": "Español"
                }
            }"#,
        )
        .unwrap();

        let draft = ProfileService::draft_from_remote(&remote, &communes());
        assert_eq!(draft.commune, "Ñuñoa");
        assert_eq!(draft.role, Role::Trabajador);
        assert_eq!(draft.profession_id, Some(5));
        assert_eq!(draft.years_experience, "12");
        assert!(draft.location.is_some());
    }

    #[test]
    fn test_draft_from_remote_unknown_role_is_client() {
        let remote = RemoteProfile {
            rol: Some("admin".to_string()),
            direccion: "Sin comuna".to_string(),
            latitud: Some(1.0),
            ..RemoteProfile::default()
        };
        let draft = ProfileService::draft_from_remote(&remote, &communes());
        assert_eq!(draft.role, Role::Cliente);
        assert_eq!(draft.commune, "Santiago");
        assert!(draft.location.is_none());
    }
}
