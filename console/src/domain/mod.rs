use std::future::Future;

use editorial_common::{
    Author, AuthorId, EditorialStatus, NewAuthor, NewPublication, Publication, PublicationId,
};

use crate::domain::authors::AuthorRegistry;
use crate::domain::error::RemoteError;
use crate::domain::workflow::PublicationWorkflow;

pub mod authors;
pub mod error;
pub mod workflow;

#[cfg(test)]
pub mod test_doubles;

/// Port to the remote publication service.
pub trait PublicationService: Send + Sync + 'static {
    /// Full collection, in server order
    fn list(&self) -> impl Future<Output = Result<Vec<Publication>, RemoteError>> + Send;

    /// Single record including its body text
    fn get(
        &self,
        id: &PublicationId,
    ) -> impl Future<Output = Result<Publication, RemoteError>> + Send;

    fn create(
        &self,
        publication: &NewPublication,
    ) -> impl Future<Output = Result<Publication, RemoteError>> + Send;

    /// Ask the service to move a publication to `status`; answers with the
    /// updated record including any field the service derived from it
    fn set_status(
        &self,
        id: &PublicationId,
        status: EditorialStatus,
    ) -> impl Future<Output = Result<Publication, RemoteError>> + Send;
}

/// Port to the remote author service.
pub trait AuthorService: Send + Sync + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<Author>, RemoteError>> + Send;

    fn get(&self, id: &AuthorId) -> impl Future<Output = Result<Author, RemoteError>> + Send;

    fn create(&self, author: &NewAuthor) -> impl Future<Output = Result<Author, RemoteError>> + Send;
}

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type A: AuthorService;
    type P: PublicationService;
    fn authors(&self) -> &AuthorRegistry<Self::A>;
    fn publications(&self) -> &PublicationWorkflow<Self::P>;
}
