//! Field validators for the profile wizard.
//!
//! Every validator takes the raw field text and returns `None` when the value
//! is acceptable or `Some(message)` with a message meant to be shown next to
//! the field. They never panic and have no side effects, so screens can run
//! them on every keystroke.

use regex::Regex;
use std::sync::LazyLock;

/// Signature shared by all field validators.
pub type Validator = fn(&str) -> Option<String>;

/// Minimum length (in characters, after trimming) of the profile description.
pub const DESCRIPTION_MIN_CHARS: usize = 50;

/// Minimum length (in characters, after trimming) of the worker short description.
pub const SHORT_DESCRIPTION_MIN_CHARS: usize = 10;

/// Upper bound accepted for years of experience.
pub const MAX_YEARS_EXPERIENCE: u32 = 80;

/// Chilean mobile numbers: optional `+`, country code 56, optional space, 9 and eight digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?56\s?9[0-9]{8}$").expect("phone pattern is valid"));

const SPANISH_LETTERS: &str = "áéíóúÁÉÍÓÚñÑüÜ";

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || SPANISH_LETTERS.contains(c)
}

fn validate_person_name(value: &str, empty_message: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(empty_message.to_string());
    }
    if value.chars().all(is_name_char) {
        None
    } else {
        Some(format!("{} solo puede contener letras y espacios", label))
    }
}

/// Validate a first name.
pub fn first_name(value: &str) -> Option<String> {
    validate_person_name(value, "Ingresa tu nombre", "El nombre")
}

/// Validate a surname.
pub fn last_name(value: &str) -> Option<String> {
    validate_person_name(value, "Ingresa tu apellido", "El apellido")
}

/// Validate a Chilean mobile phone number (`+56 9XXXXXXXX`).
pub fn phone(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("Ingresa tu teléfono".to_string());
    }
    if PHONE_PATTERN.is_match(value) {
        None
    } else {
        Some("Formato inválido, usa +56 9XXXXXXXX".to_string())
    }
}

/// Validate the free-text profile description.
pub fn description(value: &str) -> Option<String> {
    if value.trim().chars().count() < DESCRIPTION_MIN_CHARS {
        Some(format!(
            "La descripción debe tener al menos {} caracteres",
            DESCRIPTION_MIN_CHARS
        ))
    } else {
        None
    }
}

/// Validate the worker short description.
pub fn short_description(value: &str) -> Option<String> {
    if value.trim().chars().count() < SHORT_DESCRIPTION_MIN_CHARS {
        Some(format!(
            "Describe tu experiencia en al menos {} caracteres",
            SHORT_DESCRIPTION_MIN_CHARS
        ))
    } else {
        None
    }
}

/// Validate the street address chosen on the address step.
pub fn address(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Selecciona tu dirección".to_string())
    } else {
        None
    }
}

/// Validate years of experience: a whole number between 0 and [`MAX_YEARS_EXPERIENCE`].
pub fn years_experience(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("Indica tus años de experiencia".to_string());
    }
    match trimmed.parse::<u32>() {
        Ok(years) if years <= MAX_YEARS_EXPERIENCE => None,
        Ok(_) => Some(format!("Máximo {} años", MAX_YEARS_EXPERIENCE)),
        Err(_) => Some("Ingresa un número entero".to_string()),
    }
}

/// Validate the spoken languages field.
pub fn languages(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Indica tus idiomas".to_string())
    } else {
        None
    }
}

/// Validate that a profession was picked. The value is the profession id as text.
pub fn profession(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Selecciona tu profesión".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_rejects_digits_with_letters_hint() {
        let error = first_name("Ana123").unwrap();
        assert!(error.contains("letras"));
        assert!(first_name("Ana").is_none());
    }

    #[test]
    fn test_names_accept_spanish_letters_and_spaces() {
        assert!(first_name("José María").is_none());
        assert!(last_name("Muñoz Güemes").is_none());
        assert!(last_name("Ñúñez").is_none());
    }

    #[test]
    fn test_names_reject_empty_and_symbols() {
        assert_eq!(first_name("   ").as_deref(), Some("Ingresa tu nombre"));
        assert_eq!(last_name("").as_deref(), Some("Ingresa tu apellido"));
        assert!(last_name("O'Higgins").is_some());
        assert!(first_name("Ana-María").is_some());
    }

    #[test]
    fn test_phone_accepts_chilean_mobile_variants() {
        assert!(phone("+56912345678").is_none());
        assert!(phone("56912345678").is_none());
        assert!(phone("+56 912345678").is_none());
        assert!(phone("56 912345678").is_none());
    }

    #[test]
    fn test_phone_rejects_everything_else() {
        assert!(phone("").is_some());
        assert!(phone("+56812345678").is_some()); // landline prefix
        assert!(phone("+5691234567").is_some()); // seven digits
        assert!(phone("+569123456789").is_some()); // nine digits
        assert!(phone("+56  912345678").is_some()); // two spaces
        assert!(phone(" +56912345678").is_some());
        assert!(phone("+56912345678 ").is_some());
        assert!(phone("912345678").is_some());
        assert!(phone("++56912345678").is_some());
    }

    #[test]
    fn test_description_threshold_is_fifty_trimmed_chars() {
        let exactly = "a".repeat(50);
        let short = "a".repeat(49);
        assert!(description(&exactly).is_none());
        assert!(description(&short).is_some());
        assert!(description(&format!("   {}   ", short)).is_some());
        assert!(description(&format!("  {}  ", exactly)).is_none());
        // Characters, not bytes
        assert!(description(&"ñ".repeat(50)).is_none());
    }

    #[test]
    fn test_short_description_threshold() {
        assert!(short_description("123456789").is_some());
        assert!(short_description("1234567890").is_none());
        assert!(short_description("   abc   ").is_some());
    }

    #[test]
    fn test_years_experience() {
        assert!(years_experience("5").is_none());
        assert!(years_experience(" 0 ").is_none());
        assert!(years_experience("").is_some());
        assert!(years_experience("cinco").is_some());
        assert!(years_experience("-1").is_some());
        assert!(years_experience("81").is_some());
    }

    #[test]
    fn test_required_fields() {
        assert!(address("").is_some());
        assert!(address("Av. Providencia 1234").is_none());
        assert!(languages(" ").is_some());
        assert!(languages("Español").is_none());
        assert!(profession("").is_some());
        assert!(profession("3").is_none());
    }
}
