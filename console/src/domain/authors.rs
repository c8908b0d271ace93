use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use editorial_common::{Author, AuthorDraft, AuthorId};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::AuthorService;
use crate::domain::error::{
    AUTHOR_NOT_FOUND, AUTHORS_UNREACHABLE, RemoteError, SubmitFailure, WorkflowError,
};

/// Load-once lookup from author id to display name.
///
/// Filled by a single bulk fetch the first time a name is needed; callers
/// racing on the first use share that fetch. A failed fetch is not kept, the
/// next caller tries again. Entries are never invalidated, only added when an
/// author is registered through this console.
#[derive(Debug, Default)]
pub struct AuthorDirectory {
    names: OnceCell<RwLock<HashMap<AuthorId, String>>>,
}

/// Point-in-time copy of the directory used while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorNames(HashMap<AuthorId, String>);

impl AuthorNames {
    pub fn name_of(&self, id: &AuthorId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl AuthorDirectory {
    #[cfg(test)]
    pub(crate) fn is_loaded(&self) -> bool {
        self.names.initialized()
    }

    pub async fn load<F, Fut>(&self, fetch: F) -> Result<AuthorNames, RemoteError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Author>, RemoteError>>,
    {
        let names = self
            .names
            .get_or_try_init(|| async {
                let authors = fetch().await?;
                debug!(total = authors.len(), "author directory loaded");
                Ok::<_, RemoteError>(RwLock::new(
                    authors
                        .into_iter()
                        .map(|author| (author.id.clone(), author.display_name()))
                        .collect(),
                ))
            })
            .await?;

        let names = names.read().unwrap_or_else(PoisonError::into_inner);
        Ok(AuthorNames(names.clone()))
    }

    /// Adds a freshly registered author, if the directory is already loaded.
    pub fn remember(&self, author: &Author) {
        if let Some(names) = self.names.get() {
            names
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(author.id.clone(), author.display_name());
        }
    }
}

/// Snapshot of the author collection and of its error banner.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorBoard {
    pub authors: Vec<Author>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct RegistryState {
    clock: u64,
    authors: Vec<Author>,
    list_error: Option<String>,
    // start stamp of the list response currently shown
    applied_list: Option<u64>,
    detail: Option<Author>,
}

impl RegistryState {
    fn board(&self) -> AuthorBoard {
        AuthorBoard {
            authors: self.authors.clone(),
            error: self.list_error.clone(),
        }
    }
}

/// Author-side controller: list, lookup and registration.
pub struct AuthorRegistry<A> {
    service: A,
    directory: AuthorDirectory,
    state: Mutex<RegistryState>,
}

impl<A> AuthorRegistry<A> {
    pub fn new(service: A) -> Self {
        Self {
            service,
            directory: AuthorDirectory::default(),
            state: Mutex::new(RegistryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn board(&self) -> AuthorBoard {
        self.state().board()
    }

    pub fn detail(&self) -> Option<Author> {
        self.state().detail.clone()
    }

    pub fn close_detail(&self) {
        self.state().detail = None;
    }

    pub fn dismiss_error(&self) {
        self.state().list_error = None;
    }

    #[cfg(test)]
    pub(crate) fn service(&self) -> &A {
        &self.service
    }

    #[cfg(test)]
    pub(crate) fn directory(&self) -> &AuthorDirectory {
        &self.directory
    }
}

impl<A: AuthorService> AuthorRegistry<A> {
    /// Names for rendering; empty when the author service cannot be reached.
    pub async fn author_names(&self) -> AuthorNames {
        match self.directory.load(|| self.service.list()).await {
            Ok(names) => names,
            Err(err) => {
                warn!(error = %err, "author names unavailable");
                AuthorNames::default()
            }
        }
    }

    /// Reloads the author table. A response overtaken by a newer list is dropped.
    pub async fn list(&self) -> Result<AuthorBoard, WorkflowError> {
        let started = {
            let mut state = self.state();
            state.clock += 1;
            state.clock
        };
        let result = self.service.list().await;

        match result {
            Ok(authors) => {
                let mut state = self.state();
                if state.applied_list.is_some_and(|applied| applied > started) {
                    debug!(started, "dropping author list overtaken by a newer one");
                    return Ok(state.board());
                }
                state.authors = authors;
                state.applied_list = Some(started);
                state.list_error = None;
                Ok(state.board())
            }
            Err(err) => {
                warn!(error = %err, "failed to load authors");
                self.state().list_error = Some(AUTHORS_UNREACHABLE.to_string());
                Err(WorkflowError::FetchFailed(AUTHORS_UNREACHABLE.to_string()))
            }
        }
    }

    /// Blank input is not a search: `Ok(None)` and no request.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Option<Author>, WorkflowError> {
        let Ok(id) = AuthorId::try_new(raw_id) else {
            return Ok(None);
        };

        match self.service.get(&id).await {
            Ok(author) if author.id == id => {
                self.state().detail = Some(author.clone());
                Ok(Some(author))
            }
            Ok(other) => {
                warn!(requested = %id, received = %other.id, "author service answered another record");
                Err(WorkflowError::LookupFailed(AUTHOR_NOT_FOUND.to_string()))
            }
            Err(err) => {
                warn!(author = %id, error = %err, "author lookup failed");
                Err(WorkflowError::LookupFailed(AUTHOR_NOT_FOUND.to_string()))
            }
        }
    }

    pub async fn create(&self, draft: &AuthorDraft) -> Result<Author, WorkflowError> {
        let author = draft
            .validate()
            .map_err(|fields| WorkflowError::ValidationFailed(SubmitFailure::Fields(fields)))?;

        let created = self.service.create(&author).await.map_err(|err| {
            warn!(error = %err, "author registration failed");
            WorkflowError::ValidationFailed(SubmitFailure::from(err))
        })?;
        info!(author = %created.id, "author registered");

        self.directory.remember(&created);
        if let Err(err) = self.list().await {
            debug!(error = %err, "reload after registration failed");
        }
        Ok(created)
    }
}
