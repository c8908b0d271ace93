use std::sync::Arc;

use crate::domain::authors::AuthorRegistry;
use crate::domain::workflow::PublicationWorkflow;
use crate::domain::{AppState, AuthorService, PublicationService};

pub mod http;
pub mod remote;
pub mod settings;

pub struct AppStateImpl<A, P> {
    authors: Arc<AuthorRegistry<A>>,
    publications: Arc<PublicationWorkflow<P>>,
}

impl<A, P> AppStateImpl<A, P> {
    pub fn new(authors: AuthorRegistry<A>, publications: PublicationWorkflow<P>) -> Self {
        Self {
            authors: Arc::new(authors),
            publications: Arc::new(publications),
        }
    }
}

// Derived Clone would require A: Clone and P: Clone
impl<A, P> Clone for AppStateImpl<A, P> {
    fn clone(&self) -> Self {
        Self {
            authors: Arc::clone(&self.authors),
            publications: Arc::clone(&self.publications),
        }
    }
}

impl<A: AuthorService, P: PublicationService> AppState for AppStateImpl<A, P> {
    type A = A;
    type P = P;

    fn authors(&self) -> &AuthorRegistry<Self::A> {
        &self.authors
    }

    fn publications(&self) -> &PublicationWorkflow<Self::P> {
        &self.publications
    }
}
