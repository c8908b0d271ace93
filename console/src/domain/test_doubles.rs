use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use editorial_common::{
    Author, AuthorId, EditorialStatus, NewAuthor, NewPublication, Publication, PublicationId,
};
use tokio::sync::oneshot;

use crate::domain::error::RemoteError;
use crate::domain::{AuthorService, PublicationService};

/// Lets a test pause one operation: it reports when it started and waits
/// for the release signal before answering.
struct Hold {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Shared bookkeeping of the in-memory services.
#[derive(Default)]
struct Script {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
    holds: Mutex<HashMap<&'static str, Hold>>,
}

impl Script {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self, operation: &'static str) -> Result<(), RemoteError> {
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn pause(&self, operation: &'static str) {
        let hold = self.holds.lock().unwrap().remove(operation);
        if let Some(Hold { started, release }) = hold {
            let _ = started.send(());
            let _ = release.await;
        }
    }

    fn hold(&self, operation: &'static str) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.holds.lock().unwrap().insert(
            operation,
            Hold {
                started: started_tx,
                release: release_rx,
            },
        );
        (started_rx, release_tx)
    }
}

/// In-memory publication service.
///
/// Publishing stamps `2024-05-01T00:00:00Z` and every status change bumps a
/// `revision` field, so tests can tell a merged service copy from a local edit.
#[derive(Default)]
pub struct FakePublications {
    records: Mutex<Vec<Publication>>,
    get_override: Mutex<Option<Publication>>,
    script: Script,
}

impl FakePublications {
    pub fn with(records: Vec<Publication>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn replace(&self, records: Vec<Publication>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail(&self, operation: &'static str, err: RemoteError) {
        self.script.failures.lock().unwrap().insert(operation, err);
    }

    pub fn recover(&self, operation: &'static str) {
        self.script.failures.lock().unwrap().remove(operation);
    }

    pub fn hold(&self, operation: &'static str) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        self.script.hold(operation)
    }

    pub fn answer_get_with(&self, publication: Publication) {
        *self.get_override.lock().unwrap() = Some(publication);
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.calls.lock().unwrap().clone()
    }
}

impl PublicationService for FakePublications {
    async fn list(&self) -> Result<Vec<Publication>, RemoteError> {
        self.script.record("list".to_string());
        self.script.failure("list")?;
        let snapshot = self.records.lock().unwrap().clone();
        self.script.pause("list").await;
        Ok(snapshot)
    }

    async fn get(&self, id: &PublicationId) -> Result<Publication, RemoteError> {
        self.script.record(format!("get {id}"));
        self.script.failure("get")?;
        let found = self.get_override.lock().unwrap().clone().or_else(|| {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.id == id)
                .cloned()
        });
        self.script.pause("get").await;
        found.ok_or(RemoteError::NotFound)
    }

    async fn create(&self, publication: &NewPublication) -> Result<Publication, RemoteError> {
        self.script.record("create".to_string());
        self.script.failure("create")?;
        let mut records = self.records.lock().unwrap();
        let created = Publication {
            id: PublicationId::try_new(format!("p-new-{}", records.len() + 1)).unwrap(),
            title: publication.title.clone(),
            author_id: Some(publication.author_id.clone()),
            summary: publication.summary.clone(),
            content: Some(publication.content.clone()),
            kind: publication.kind.clone(),
            category: publication.category.clone(),
            status: EditorialStatus::Draft,
            published_at: None,
            extra: Default::default(),
        };
        records.push(created.clone());
        Ok(created)
    }

    async fn set_status(
        &self,
        id: &PublicationId,
        status: EditorialStatus,
    ) -> Result<Publication, RemoteError> {
        self.script.record(format!("set_status {id} {status}"));
        self.script.pause("set_status").await;
        self.script.failure("set_status")?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RemoteError::NotFound)?;

        record.status = status;
        if status == EditorialStatus::Published {
            record.published_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        }
        let revision = record
            .extra
            .get("revision")
            .and_then(|v| v.as_u64())
            .unwrap_or(1);
        record
            .extra
            .insert("revision".to_string(), serde_json::json!(revision + 1));
        Ok(record.clone())
    }
}

/// In-memory author service.
#[derive(Default)]
pub struct FakeAuthors {
    records: Mutex<Vec<Author>>,
    script: Script,
}

impl FakeAuthors {
    pub fn with(records: Vec<Author>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn replace(&self, records: Vec<Author>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail(&self, operation: &'static str, err: RemoteError) {
        self.script.failures.lock().unwrap().insert(operation, err);
    }

    pub fn recover(&self, operation: &'static str) {
        self.script.failures.lock().unwrap().remove(operation);
    }

    pub fn hold(&self, operation: &'static str) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        self.script.hold(operation)
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.calls.lock().unwrap().clone()
    }
}

impl AuthorService for FakeAuthors {
    async fn list(&self) -> Result<Vec<Author>, RemoteError> {
        self.script.record("list".to_string());
        self.script.failure("list")?;
        let snapshot = self.records.lock().unwrap().clone();
        self.script.pause("list").await;
        Ok(snapshot)
    }

    async fn get(&self, id: &AuthorId) -> Result<Author, RemoteError> {
        self.script.record(format!("get {id}"));
        self.script.failure("get")?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn create(&self, author: &NewAuthor) -> Result<Author, RemoteError> {
        self.script.record("create".to_string());
        self.script.failure("create")?;
        let mut records = self.records.lock().unwrap();
        let created = Author {
            id: AuthorId::try_new(format!("a-new-{}", records.len() + 1)).unwrap(),
            identification_type: author.identification_type,
            identification: author.identification.clone(),
            nationality: author.nationality.clone(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            email: author.email.clone(),
            phone: author.phone.clone(),
            biography: author.biography.clone(),
            literary_genre: author.literary_genre.clone(),
        };
        records.push(created.clone());
        Ok(created)
    }
}
