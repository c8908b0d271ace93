use std::collections::BTreeMap;

use nutype::nutype;
use serde::{Deserialize, Serialize};

pub mod author;
pub mod publication;
pub mod status;

pub use author::{Author, AuthorDraft, IdentificationType, NewAuthor, UnknownIdentificationType};
pub use publication::{
    NewPublication, Publication, PublicationDraft, PublicationKind, UnknownPublicationKind,
};
pub use status::{EditorialStatus, TransitionPolicy, TransitionRule, UnknownStatus};

/// Server-assigned publication identifier.
///
/// Raw input is trimmed before validation, so a blank search box never
/// produces an id.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct PublicationId(String);

/// Server-assigned author identifier.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct AuthorId(String);

/// Field-level validation messages keyed by wire field name.
///
/// Produced locally by draft validation and by the remote services when they
/// answer `400` with a `messages` object; both render the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(value)` when no message was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

/// Trims a form value and records a "required" message when nothing is left.
pub(crate) fn required(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, crate::REQUIRED_FIELD_MESSAGE);
    }
    value.to_owned()
}
