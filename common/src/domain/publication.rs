use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{AuthorId, EditorialStatus, FieldErrors, PublicationId, required};

/// A publication as returned by the remote publication service.
///
/// Only `status` and `published_at` ever change, and only through a status
/// transition answered by the service. Fields this console does not know
/// about are kept in `extra`, so replacing a cached entry with a service
/// response never drops server-derived data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: PublicationId,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    /// Absent when the service holds no usable author reference
    #[serde(default, deserialize_with = "deserialize_author_id")]
    pub author_id: Option<AuthorId>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub summary: String,
    /// Body text
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "tipoPublicacion", default)]
    pub kind: PublicationKind,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub category: String,
    pub status: EditorialStatus,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Publication type. Values outside the form's list are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicationKind {
    Article,
    Book,
    Research,
    Report,
    Other,
    Unrecognized(String),
}

impl PublicationKind {
    pub const ALL: [PublicationKind; 5] = [
        PublicationKind::Article,
        PublicationKind::Book,
        PublicationKind::Research,
        PublicationKind::Report,
        PublicationKind::Other,
    ];

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            PublicationKind::Article => "ARTICULO",
            PublicationKind::Book => "LIBRO",
            PublicationKind::Research => "INVESTIGACION",
            PublicationKind::Report => "INFORME",
            PublicationKind::Other => "OTRO",
            PublicationKind::Unrecognized(raw) => raw,
        }
    }
}

impl Default for PublicationKind {
    fn default() -> Self {
        PublicationKind::Unrecognized(String::new())
    }
}

impl Display for PublicationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown publication kind '{0}'")]
pub struct UnknownPublicationKind(pub String);

/// Accepts only the kinds the creation form offers.
impl FromStr for PublicationKind {
    type Err = UnknownPublicationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PublicationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPublicationKind(s.to_owned()))
    }
}

impl Serialize for PublicationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PublicationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.parse().unwrap_or(PublicationKind::Unrecognized(raw)))
    }
}

/// Raw values of the publication creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicationDraft {
    pub title: String,
    pub author_id: String,
    pub summary: String,
    pub content: String,
    #[serde(rename = "tipoPublicacion")]
    pub kind: String,
    pub category: String,
}

/// Trimmed, validated creation request sent to the publication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPublication {
    pub title: String,
    pub author_id: AuthorId,
    pub summary: String,
    pub content: String,
    #[serde(rename = "tipoPublicacion")]
    pub kind: PublicationKind,
    pub category: String,
}

impl PublicationDraft {
    /// Checks every field at once so the form can flag all of them together.
    pub fn validate(&self) -> Result<NewPublication, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        let summary = required(&mut errors, "summary", &self.summary);
        let content = required(&mut errors, "content", &self.content);
        let category = required(&mut errors, "category", &self.category);

        let author_id = AuthorId::try_new(self.author_id.as_str()).ok();
        if author_id.is_none() {
            errors.add("authorId", crate::SELECT_AUTHOR_MESSAGE);
        }

        let kind = if self.kind.trim().is_empty() {
            errors.add("tipoPublicacion", crate::REQUIRED_FIELD_MESSAGE);
            None
        } else {
            self.kind
                .parse::<PublicationKind>()
                .map_err(|err| errors.add("tipoPublicacion", err.to_string()))
                .ok()
        };

        match (author_id, kind) {
            (Some(author_id), Some(kind)) => errors.into_result(NewPublication {
                title,
                author_id,
                summary,
                content,
                kind,
                category,
            }),
            _ => Err(errors),
        }
    }
}

/// Parses a service timestamp: RFC 3339, or a zone-less ISO datetime taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
}

// null and absent both read as empty text
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_author_id<'de, D>(deserializer: D) -> Result<Option<AuthorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| AuthorId::try_new(raw).ok()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
