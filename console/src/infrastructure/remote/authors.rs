use editorial_common::{Author, AuthorId, NewAuthor};

use crate::domain::AuthorService;
use crate::domain::error::RemoteError;
use crate::infrastructure::remote::RestClient;
use crate::infrastructure::settings::RemoteServiceSettings;

/// Author service over HTTP: `GET /`, `GET /{id}`, `POST /`.
#[derive(Debug, Clone)]
pub struct RemoteAuthors {
    client: RestClient,
}

impl RemoteAuthors {
    pub fn new(settings: &RemoteServiceSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: RestClient::new(settings)?,
        })
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

impl AuthorService for RemoteAuthors {
    async fn list(&self) -> Result<Vec<Author>, RemoteError> {
        let authors: Option<Vec<Author>> = self.client.get(&[]).await?;
        Ok(authors.unwrap_or_default())
    }

    async fn get(&self, id: &AuthorId) -> Result<Author, RemoteError> {
        self.client.get(&[id.as_ref()]).await
    }

    async fn create(&self, author: &NewAuthor) -> Result<Author, RemoteError> {
        self.client.post(&[], author).await
    }
}
