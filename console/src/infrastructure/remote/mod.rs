use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::error::{RemoteError, UNEXPECTED_ERROR};
use crate::infrastructure::settings::RemoteServiceSettings;

mod authors;
mod publications;

pub use authors::RemoteAuthors;
pub use publications::RemotePublications;

/// JSON client bound to the base URL of one remote service.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

/// Error payload shared by both services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    messages: Option<BTreeMap<String, String>>,
    message: Option<String>,
}

impl RestClient {
    pub fn new(settings: &RemoteServiceSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid service url {}", settings.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("service url {} cannot be used as a base", settings.base_url);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .context("failed to build http client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL followed by `segments`, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, RemoteError> {
        send(self.http.get(self.url(segments))).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        send(self.http.post(self.url(segments)).json(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        send(self.http.patch(self.url(segments)).query(query)).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                RemoteError::Service(format!("unreadable response: {err}"))
            } else {
                transport_error(err)
            }
        });
    }

    let body = response.bytes().await.unwrap_or_default();
    tracing::debug!(%status, body = %String::from_utf8_lossy(&body), "remote service refused request");
    Err(classify(status, &body))
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

/// Maps an error response onto the remote error taxonomy.
fn classify(status: StatusCode, body: &[u8]) -> RemoteError {
    if status == StatusCode::NOT_FOUND {
        return RemoteError::NotFound;
    }

    let body = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
    match (status, body) {
        (StatusCode::BAD_REQUEST, ErrorBody { messages: Some(messages), .. })
            if !messages.is_empty() =>
        {
            RemoteError::Validation(messages.into())
        }
        (_, ErrorBody { message: Some(message), .. }) => RemoteError::Service(message),
        _ => RemoteError::Service(UNEXPECTED_ERROR.to_string()),
    }
}
