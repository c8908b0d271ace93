use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use editorial_common::{
    EditorialStatus, Publication, PublicationDraft, PublicationId, TransitionPolicy,
};
use tracing::{debug, info, warn};

use crate::domain::PublicationService;
use crate::domain::error::{
    PUBLICATION_NOT_FOUND, PUBLICATION_NOT_LOADED, PUBLICATIONS_UNREACHABLE, SubmitFailure,
    WorkflowError,
};

/// Owns the publications the console shows and is the only writer of them.
///
/// The collection changes in exactly two ways: a successful list replaces it,
/// and a confirmed status transition replaces one record with the copy the
/// service answered. Nothing is ever updated ahead of a service response.
pub struct PublicationWorkflow<P> {
    service: P,
    policy: TransitionPolicy,
    state: Mutex<WorkflowState>,
}

/// Snapshot of the collection and of the list-level error banner.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationBoard {
    pub publications: Vec<Publication>,
    pub error: Option<String>,
}

/// What the status dialog needs when it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionDialog {
    pub publication: Publication,
    /// Pre-selected target: always the current status
    pub target: EditorialStatus,
    pub options: Vec<EditorialStatus>,
    /// A change for this record is already waiting on the service
    pub pending: bool,
}

#[derive(Debug, Default)]
struct WorkflowState {
    // logical clock ordering request starts and confirmations
    clock: u64,
    publications: Vec<Publication>,
    list_error: Option<String>,
    // start stamp of the list response currently shown
    applied_list: Option<u64>,
    detail: Option<Publication>,
    // transitions confirmed after the shown list or a pending lookup was requested
    confirmed: HashMap<PublicationId, (u64, Publication)>,
    // start stamps of lookups still waiting on the service
    lookups: BTreeSet<u64>,
    in_flight: HashSet<PublicationId>,
}

impl WorkflowState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn board(&self) -> PublicationBoard {
        PublicationBoard {
            publications: self.publications.clone(),
            error: self.list_error.clone(),
        }
    }

    fn held(&self, id: &PublicationId) -> Option<&Publication> {
        self.publications
            .iter()
            .find(|p| &p.id == id)
            .or_else(|| self.detail.as_ref().filter(|p| &p.id == id))
    }

    /// The newest confirmed copy of `fetched`, if a transition answered after `started`.
    fn newest(&self, fetched: Publication, started: u64) -> Publication {
        match self.confirmed.get(&fetched.id) {
            Some((confirmed_at, confirmed)) if *confirmed_at > started => confirmed.clone(),
            _ => fetched,
        }
    }

    fn merge(&mut self, updated: Publication, confirmed_at: u64) {
        if let Some(entry) = self.publications.iter_mut().find(|p| p.id == updated.id) {
            *entry = updated.clone();
        }
        if let Some(detail) = self.detail.as_mut().filter(|p| p.id == updated.id) {
            *detail = updated.clone();
        }
        self.confirmed
            .insert(updated.id.clone(), (confirmed_at, updated));
    }
}

/// Releases the double-submission lock of one publication when dropped.
struct InFlight<'a, P> {
    workflow: &'a PublicationWorkflow<P>,
    id: PublicationId,
}

impl<P> Drop for InFlight<'_, P> {
    fn drop(&mut self) {
        self.workflow.state().in_flight.remove(&self.id);
    }
}

/// Marks a lookup as outstanding until dropped.
struct Lookup<'a, P> {
    workflow: &'a PublicationWorkflow<P>,
    started: u64,
}

impl<P> Drop for Lookup<'_, P> {
    fn drop(&mut self) {
        self.workflow.state().lookups.remove(&self.started);
    }
}

impl<P> PublicationWorkflow<P> {
    pub fn new(service: P, policy: TransitionPolicy) -> Self {
        Self {
            service,
            policy,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn service(&self) -> &P {
        &self.service
    }

    pub fn board(&self) -> PublicationBoard {
        self.state().board()
    }

    /// Record currently held for `id`, from the collection or the open detail.
    #[cfg(test)]
    pub(crate) fn cached(&self, id: &PublicationId) -> Option<Publication> {
        self.state().held(id).cloned()
    }

    pub fn detail(&self) -> Option<Publication> {
        self.state().detail.clone()
    }

    pub fn close_detail(&self) {
        self.state().detail = None;
    }

    pub fn dismiss_error(&self) {
        self.state().list_error = None;
    }

    #[cfg(test)]
    pub(crate) fn is_transition_pending(&self, id: &PublicationId) -> bool {
        self.state().in_flight.contains(id)
    }

    /// Opens the status dialog for a held record.
    pub fn open_transition(&self, id: &PublicationId) -> Result<TransitionDialog, WorkflowError> {
        let state = self.state();
        let publication = state
            .held(id)
            .cloned()
            .ok_or_else(|| WorkflowError::TransitionFailed(PUBLICATION_NOT_LOADED.to_string()))?;

        Ok(TransitionDialog {
            pending: state.in_flight.contains(id),
            target: publication.status,
            options: self.policy.targets_from(publication.status),
            publication,
        })
    }
}

impl<P: PublicationService> PublicationWorkflow<P> {
    /// Reloads the whole collection.
    ///
    /// On failure the previous collection stays visible and the banner is set.
    pub async fn list(&self) -> Result<PublicationBoard, WorkflowError> {
        let started = self.state().tick();
        let result = self.service.list().await;

        let mut state = self.state();
        match result {
            Ok(fetched) => {
                if state.applied_list.is_some_and(|applied| applied > started) {
                    debug!(started, "dropping publication list overtaken by a newer one");
                    return Ok(state.board());
                }

                let publications = fetched
                    .into_iter()
                    .map(|p| state.newest(p, started))
                    .collect::<Vec<_>>();

                // a lookup started before this list may still answer with an older copy
                let horizon = state
                    .lookups
                    .first()
                    .map_or(started, |oldest| (*oldest).min(started));
                state.publications = publications;
                state.applied_list = Some(started);
                state.confirmed.retain(|_, (confirmed_at, _)| *confirmed_at > horizon);
                state.list_error = None;
                debug!(total = state.publications.len(), "publications loaded");
                Ok(state.board())
            }
            Err(err) => {
                warn!(error = %err, "failed to load publications");
                state.list_error = Some(PUBLICATIONS_UNREACHABLE.to_string());
                Err(WorkflowError::FetchFailed(PUBLICATIONS_UNREACHABLE.to_string()))
            }
        }
    }

    /// Looks a publication up by raw search input.
    ///
    /// Blank input is not a search: `Ok(None)` and no request.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Option<Publication>, WorkflowError> {
        let Ok(id) = PublicationId::try_new(raw_id) else {
            return Ok(None);
        };

        let lookup = {
            let mut state = self.state();
            let started = state.tick();
            state.lookups.insert(started);
            Lookup {
                workflow: self,
                started,
            }
        };
        let result = self.service.get(&id).await;

        match result {
            Ok(publication) if publication.id == id => {
                let mut state = self.state();
                let publication = state.newest(publication, lookup.started);
                state.detail = Some(publication.clone());
                Ok(Some(publication))
            }
            Ok(other) => {
                warn!(requested = %id, received = %other.id, "publication service answered another record");
                Err(WorkflowError::LookupFailed(PUBLICATION_NOT_FOUND.to_string()))
            }
            Err(err) => {
                warn!(publication = %id, error = %err, "publication lookup failed");
                Err(WorkflowError::LookupFailed(PUBLICATION_NOT_FOUND.to_string()))
            }
        }
    }

    /// Requests a status change and reconciles with the service's answer.
    pub async fn transition(
        &self,
        id: &PublicationId,
        target: EditorialStatus,
    ) -> Result<Publication, WorkflowError> {
        let _in_flight = {
            let mut state = self.state();
            let current = state
                .held(id)
                .map(|p| p.status)
                .ok_or_else(|| WorkflowError::TransitionFailed(PUBLICATION_NOT_LOADED.to_string()))?;

            if !self.policy.allows(current, target) {
                return Err(WorkflowError::TransitionNotAllowed {
                    from: current,
                    to: target,
                });
            }
            if !state.in_flight.insert(id.clone()) {
                return Err(WorkflowError::TransitionPending(id.clone()));
            }
            InFlight {
                workflow: self,
                id: id.clone(),
            }
        };

        match self.service.set_status(id, target).await {
            Ok(updated) => {
                let mut state = self.state();
                let confirmed_at = state.tick();
                info!(publication = %updated.id, status = %updated.status, "editorial status updated");
                state.merge(updated.clone(), confirmed_at);
                Ok(updated)
            }
            Err(err) => {
                warn!(publication = %id, target = %target, error = %err, "editorial status change failed");
                Err(WorkflowError::transition_failed(&err))
            }
        }
    }

    /// Validates and submits a new publication, then reloads the collection.
    pub async fn create(&self, draft: &PublicationDraft) -> Result<Publication, WorkflowError> {
        let publication = draft
            .validate()
            .map_err(|fields| WorkflowError::ValidationFailed(SubmitFailure::Fields(fields)))?;

        let created = self.service.create(&publication).await.map_err(|err| {
            warn!(error = %err, "publication creation failed");
            WorkflowError::ValidationFailed(SubmitFailure::from(err))
        })?;
        info!(publication = %created.id, "publication created");

        if let Err(err) = self.list().await {
            debug!(error = %err, "reload after creation failed");
        }
        Ok(created)
    }
}
