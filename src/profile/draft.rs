//! In-memory profile draft edited by the wizard.

use crate::profile::validators::{self, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Communes offered when no list is configured.
pub const DEFAULT_COMMUNES: [&str; 7] = [
    "Santiago",
    "Providencia",
    "Las Condes",
    "Ñuñoa",
    "La Florida",
    "San Bernardo",
    "El Bosque",
];

/// Marketplace role of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Cliente,
    Trabajador,
    Ambos,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Cliente, Role::Trabajador, Role::Ambos];

    /// Wire value sent in the `rol` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cliente => "cliente",
            Role::Trabajador => "trabajador",
            Role::Ambos => "ambos",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Cliente => "Cliente",
            Role::Trabajador => "Trabajador",
            Role::Ambos => "Ambos",
        }
    }

    /// Roles that offer services and therefore fill the worker step.
    pub fn is_worker(&self) -> bool {
        matches!(self, Role::Trabajador | Role::Ambos)
    }

    pub fn next(&self) -> Role {
        match self {
            Role::Cliente => Role::Trabajador,
            Role::Trabajador => Role::Ambos,
            Role::Ambos => Role::Cliente,
        }
    }

    pub fn prev(&self) -> Role {
        match self {
            Role::Cliente => Role::Ambos,
            Role::Trabajador => Role::Cliente,
            Role::Ambos => Role::Trabajador,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cliente" => Ok(Role::Cliente),
            "trabajador" => Ok(Role::Trabajador),
            "ambos" => Ok(Role::Ambos),
            other => anyhow::bail!("Unknown role: {}", other),
        }
    }
}

/// Coordinates fixed by picking an address suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Text fields of the draft that carry a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Description,
    Address,
    Profession,
    YearsExperience,
    ShortDescription,
    Languages,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "Nombre",
            Field::LastName => "Apellido",
            Field::Phone => "Teléfono",
            Field::Description => "Descripción",
            Field::Address => "Dirección",
            Field::Profession => "Profesión",
            Field::YearsExperience => "Años de experiencia",
            Field::ShortDescription => "Breve descripción",
            Field::Languages => "Idiomas",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::FirstName => "Ingresa tu nombre",
            Field::LastName => "Ingresa tu apellido",
            Field::Phone => "Ej: +56912345678",
            Field::Description => "Cuéntanos sobre ti (mínimo 50 caracteres)",
            Field::Address => "Ej: Calle Libertad 123",
            Field::Profession => "-- elige profesión --",
            Field::YearsExperience => "Ej: 5",
            Field::ShortDescription => "Describe tu experiencia breve",
            Field::Languages => "Ej: Español, Inglés",
        }
    }

    pub fn validator(&self) -> Validator {
        match self {
            Field::FirstName => validators::first_name,
            Field::LastName => validators::last_name,
            Field::Phone => validators::phone,
            Field::Description => validators::description,
            Field::Address => validators::address,
            Field::Profession => validators::profession,
            Field::YearsExperience => validators::years_experience,
            Field::ShortDescription => validators::short_description,
            Field::Languages => validators::languages,
        }
    }
}

/// Unsaved profile data collected across the wizard steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub description: String,
    pub photo: Option<PathBuf>,
    pub commune: String,
    pub address: String,
    pub location: Option<Location>,
    pub role: Role,
    pub profession_id: Option<u64>,
    pub years_experience: String,
    pub short_description: String,
    pub languages: String,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            description: String::new(),
            photo: None,
            commune: DEFAULT_COMMUNES[0].to_string(),
            address: String::new(),
            location: None,
            role: Role::Cliente,
            profession_id: None,
            years_experience: String::new(),
            short_description: String::new(),
            languages: String::new(),
        }
    }
}

impl ProfileDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of a field. The profession is rendered as its id.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::FirstName => self.first_name.clone(),
            Field::LastName => self.last_name.clone(),
            Field::Phone => self.phone.clone(),
            Field::Description => self.description.clone(),
            Field::Address => self.address.clone(),
            Field::Profession => self.profession_id.map(|id| id.to_string()).unwrap_or_default(),
            Field::YearsExperience => self.years_experience.clone(),
            Field::ShortDescription => self.short_description.clone(),
            Field::Languages => self.languages.clone(),
        }
    }

    /// Overwrite a field from text.
    ///
    /// Typing into the address invalidates any previously picked coordinates.
    /// A profession value that is not a number clears the selection.
    pub fn set_value(&mut self, field: Field, value: &str) {
        match field {
            Field::FirstName => self.first_name = value.to_string(),
            Field::LastName => self.last_name = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::Description => self.description = value.to_string(),
            Field::Address => {
                if self.address != value {
                    self.location = None;
                }
                self.address = value.to_string();
            }
            Field::Profession => self.profession_id = value.trim().parse().ok(),
            Field::YearsExperience => self.years_experience = value.to_string(),
            Field::ShortDescription => self.short_description = value.to_string(),
            Field::Languages => self.languages = value.to_string(),
        }
    }

    /// Switch commune. The address and its coordinates belong to the old commune and are cleared.
    pub fn set_commune(&mut self, commune: &str) {
        if self.commune != commune {
            self.commune = commune.to_string();
            self.address.clear();
            self.location = None;
        }
    }

    /// Accept a geocoding candidate as the address.
    pub fn choose_address(&mut self, display_name: &str, location: Location) {
        self.address = display_name.to_string();
        self.location = Some(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_and_worker_flag() {
        assert_eq!("Trabajador".parse::<Role>().unwrap(), Role::Trabajador);
        assert_eq!(" ambos ".parse::<Role>().unwrap(), Role::Ambos);
        assert!("admin".parse::<Role>().is_err());
        assert!(!Role::Cliente.is_worker());
        assert!(Role::Trabajador.is_worker());
        assert!(Role::Ambos.is_worker());
    }

    #[test]
    fn test_role_cycles() {
        let mut role = Role::Cliente;
        for _ in 0..3 {
            role = role.next();
        }
        assert_eq!(role, Role::Cliente);
        assert_eq!(Role::Cliente.prev(), Role::Ambos);
    }

    #[test]
    fn test_editing_address_drops_location() {
        let mut draft = ProfileDraft::new();
        draft.choose_address(
            "Av. Providencia 1234, Providencia",
            Location {
                latitude: -33.42,
                longitude: -70.61,
            },
        );
        assert!(draft.location.is_some());

        draft.set_value(Field::Address, "Av. Providencia 12");
        assert!(draft.location.is_none());
    }

    #[test]
    fn test_changing_commune_clears_address() {
        let mut draft = ProfileDraft::new();
        draft.set_value(Field::Address, "Calle Libertad 123");
        draft.set_commune("Providencia");
        assert!(draft.address.is_empty());
        assert_eq!(draft.commune, "Providencia");

        draft.set_value(Field::Address, "Calle Libertad 123");
        draft.set_commune("Providencia");
        assert_eq!(draft.address, "Calle Libertad 123");
    }

    #[test]
    fn test_profession_round_trips_as_text() {
        let mut draft = ProfileDraft::new();
        draft.set_value(Field::Profession, "7");
        assert_eq!(draft.profession_id, Some(7));
        assert_eq!(draft.value(Field::Profession), "7");
        draft.set_value(Field::Profession, "");
        assert_eq!(draft.profession_id, None);
    }
}
