use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{AuthorId, FieldErrors, required};

/// An author as returned by the remote author service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(rename = "tipoIdentificacion")]
    pub identification_type: IdentificationType,
    #[serde(rename = "identificacion")]
    pub identification: String,
    #[serde(rename = "nacionalidad")]
    pub nationality: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "biografia", default)]
    pub biography: Option<String>,
    #[serde(rename = "generoLiterario")]
    pub literary_genre: String,
}

impl Author {
    /// Name shown wherever a publication refers to this author.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentificationType {
    #[serde(rename = "CEDULA")]
    NationalId,
    #[serde(rename = "PASAPORTE")]
    Passport,
    #[serde(rename = "RUC")]
    TaxId,
}

impl IdentificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentificationType::NationalId => "CEDULA",
            IdentificationType::Passport => "PASAPORTE",
            IdentificationType::TaxId => "RUC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown identification type '{0}'")]
pub struct UnknownIdentificationType(pub String);

impl FromStr for IdentificationType {
    type Err = UnknownIdentificationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            IdentificationType::NationalId,
            IdentificationType::Passport,
            IdentificationType::TaxId,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownIdentificationType(s.to_owned()))
    }
}

// Deliberately loose: something@something.something
pub const EMAIL_REGEX: &str = r"\S+@\S+\.\S+";

static EMAIL_REGEX_COMPILED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("EMAIL_REGEX must be a valid regex"));

pub fn is_plausible_email(value: &str) -> bool {
    EMAIL_REGEX_COMPILED.is_match(value)
}

/// Raw values of the author registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorDraft {
    #[serde(rename = "tipoIdentificacion")]
    pub identification_type: String,
    #[serde(rename = "identificacion")]
    pub identification: String,
    #[serde(rename = "nacionalidad")]
    pub nationality: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "biografia")]
    pub biography: String,
    #[serde(rename = "generoLiterario")]
    pub literary_genre: String,
}

/// Trimmed, validated registration request sent to the author service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuthor {
    #[serde(rename = "tipoIdentificacion")]
    pub identification_type: IdentificationType,
    #[serde(rename = "identificacion")]
    pub identification: String,
    #[serde(rename = "nacionalidad")]
    pub nationality: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "biografia", skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(rename = "generoLiterario")]
    pub literary_genre: String,
}

impl AuthorDraft {
    pub fn validate(&self) -> Result<NewAuthor, FieldErrors> {
        let mut errors = FieldErrors::new();

        let identification = required(&mut errors, "identificacion", &self.identification);
        let nationality = required(&mut errors, "nacionalidad", &self.nationality);
        let first_name = required(&mut errors, "nombre", &self.first_name);
        let last_name = required(&mut errors, "apellido", &self.last_name);
        let phone = required(&mut errors, "telefono", &self.phone);
        let literary_genre = required(&mut errors, "generoLiterario", &self.literary_genre);

        let email = required(&mut errors, "email", &self.email);
        if !email.is_empty() && !is_plausible_email(&email) {
            errors.add("email", crate::INVALID_EMAIL_MESSAGE);
        }

        let identification_type = if self.identification_type.trim().is_empty() {
            errors.add("tipoIdentificacion", crate::REQUIRED_FIELD_MESSAGE);
            None
        } else {
            self.identification_type
                .parse::<IdentificationType>()
                .map_err(|err| errors.add("tipoIdentificacion", err.to_string()))
                .ok()
        };

        let biography = Some(self.biography.trim().to_owned()).filter(|b| !b.is_empty());

        match identification_type {
            Some(identification_type) => errors.into_result(NewAuthor {
                identification_type,
                identification,
                nationality,
                first_name,
                last_name,
                email,
                phone,
                biography,
                literary_genre,
            }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> AuthorDraft {
        AuthorDraft {
            identification_type: "CEDULA".into(),
            identification: " 0102030405 ".into(),
            nationality: "Ecuadorian".into(),
            first_name: " Ana ".into(),
            last_name: "Lopez".into(),
            email: "ana@example.org".into(),
            phone: "0999999999".into(),
            biography: "   ".into(),
            literary_genre: "Essay".into(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let author = complete_draft().validate().unwrap();

        assert_eq!(author.identification, "0102030405");
        assert_eq!(author.first_name, "Ana");
        assert_eq!(author.identification_type, IdentificationType::NationalId);
        assert_eq!(author.biography, None);

        let wire = serde_json::to_value(&author).unwrap();
        assert_eq!(wire["nombre"], "Ana");
        assert!(wire.get("biografia").is_none());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("plain"));

        let draft = AuthorDraft { email: "ana@example".into(), ..complete_draft() };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(crate::INVALID_EMAIL_MESSAGE));
    }

    #[test]
    fn test_unknown_identification_type() {
        assert_eq!(" ruc ".parse::<IdentificationType>(), Ok(IdentificationType::TaxId));

        let err = "DNI".parse::<IdentificationType>().unwrap_err();
        assert_eq!(err, UnknownIdentificationType("DNI".into()));

        let draft = AuthorDraft { identification_type: "DNI".into(), ..complete_draft() };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("tipoIdentificacion"), Some("unknown identification type 'DNI'"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_biography_is_optional() {
        let errors = AuthorDraft::default().validate().unwrap_err();
        assert!(errors.get("biografia").is_none());
        assert_eq!(errors.len(), 8);
    }

    #[test]
    fn test_display_name() {
        let author: Author = serde_json::from_value(serde_json::json!({
            "id": "a-1",
            "tipoIdentificacion": "PASAPORTE",
            "identificacion": "X1",
            "nacionalidad": "Chilean",
            "nombre": "Gabriela",
            "apellido": "Mistral",
            "email": "g@m.cl",
            "telefono": "1",
            "generoLiterario": "Poetry"
        }))
        .unwrap();

        assert_eq!(author.display_name(), "Gabriela Mistral");
        assert_eq!(author.biography, None);
    }
}
