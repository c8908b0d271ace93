use editorial_common::{EditorialStatus, NewPublication, Publication, PublicationId};

use crate::domain::PublicationService;
use crate::domain::error::RemoteError;
use crate::infrastructure::remote::RestClient;
use crate::infrastructure::settings::RemoteServiceSettings;

/// Publication service over HTTP:
/// `GET /`, `GET /{id}`, `POST /`, `PATCH /{id}/status?status=`.
#[derive(Debug, Clone)]
pub struct RemotePublications {
    client: RestClient,
}

impl RemotePublications {
    pub fn new(settings: &RemoteServiceSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: RestClient::new(settings)?,
        })
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

impl PublicationService for RemotePublications {
    async fn list(&self) -> Result<Vec<Publication>, RemoteError> {
        // an empty collection may come back as `null`
        let publications: Option<Vec<Publication>> = self.client.get(&[]).await?;
        Ok(publications.unwrap_or_default())
    }

    async fn get(&self, id: &PublicationId) -> Result<Publication, RemoteError> {
        self.client.get(&[id.as_ref()]).await
    }

    async fn create(&self, publication: &NewPublication) -> Result<Publication, RemoteError> {
        self.client.post(&[], publication).await
    }

    async fn set_status(
        &self,
        id: &PublicationId,
        status: EditorialStatus,
    ) -> Result<Publication, RemoteError> {
        self.client
            .patch(&[id.as_ref(), "status"], &[("status", status.as_str())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use editorial_common::test_utils::publication_id;
    use editorial_common::{AuthorId, PublicationKind};
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn record(id: &str, status: &str, published_at: Value) -> Value {
        json!({
            "id": id,
            "title": "Rust in practice",
            "authorId": "a-1",
            "summary": "summary",
            "content": "body",
            "tipoPublicacion": "ARTICULO",
            "category": "software",
            "status": status,
            "publishedAt": published_at
        })
    }

    fn service(server: &MockServer, timeout: u64) -> RemotePublications {
        RemotePublications::new(&RemoteServiceSettings {
            base_url: format!("{}/publications", server.uri()),
            request_timeout_seconds: timeout,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/publications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record("p-1", "DRAFT", Value::Null),
                record("p-2", "PUBLISHED", json!("2024-05-01T00:00:00Z")),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let publications = service(&server, 5).list().await.unwrap();

        assert_eq!(publications.len(), 2);
        assert_eq!(publications[1].status, EditorialStatus::Published);
        assert!(publications[1].published_at.is_some());
    }

    #[tokio::test]
    async fn test_list_tolerates_irregular_record() {
        let server = MockServer::start().await;
        let mut irregular = record("p-2", "IN_REVIEW", Value::Null);
        irregular["summary"] = Value::Null;
        irregular["tipoPublicacion"] = json!("POEMARIO");
        Mock::given(method("GET"))
            .and(path("/publications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record("p-1", "DRAFT", Value::Null),
                irregular,
            ])))
            .mount(&server)
            .await;

        let publications = service(&server, 5).list().await.unwrap();

        assert_eq!(publications.len(), 2);
        assert_eq!(publications[1].summary, "");
        assert_eq!(publications[1].kind, PublicationKind::Unrecognized("POEMARIO".into()));
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/publications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
            .mount(&server)
            .await;

        assert!(service(&server, 5).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/publications/unknown-id"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = service(&server, 5)
            .get(&publication_id("unknown-id"))
            .await
            .unwrap_err();

        assert_eq!(err, RemoteError::NotFound);
    }

    #[tokio::test]
    async fn test_set_status_sends_patch_with_query() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/publications/p-1/status"))
            .and(query_param("status", "PUBLISHED"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record("p-1", "PUBLISHED", json!("2024-05-01T00:00:00"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let updated = service(&server, 5)
            .set_status(&publication_id("p-1"), EditorialStatus::Published)
            .await
            .unwrap();

        assert_eq!(updated.status, EditorialStatus::Published);
        assert_eq!(
            updated.published_at.map(|at| at.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejected_transition() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/publications/p-1/status"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "message": "cannot publish a draft" })),
            )
            .mount(&server)
            .await;

        let err = service(&server, 5)
            .set_status(&publication_id("p-1"), EditorialStatus::Published)
            .await
            .unwrap_err();

        assert_eq!(err, RemoteError::Service("cannot publish a draft".into()));
    }

    #[tokio::test]
    async fn test_create_posts_trimmed_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publications"))
            .and(body_json(json!({
                "title": "Rust in practice",
                "authorId": "a-1",
                "summary": "summary",
                "content": "body",
                "tipoPublicacion": "ARTICULO",
                "category": "software"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(record("p-9", "DRAFT", Value::Null)))
            .expect(1)
            .mount(&server)
            .await;

        let created = service(&server, 5)
            .create(&NewPublication {
                title: "Rust in practice".into(),
                author_id: AuthorId::try_new("a-1").unwrap(),
                summary: "summary".into(),
                content: "body".into(),
                kind: PublicationKind::Article,
                category: "software".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, publication_id("p-9"));
    }

    #[tokio::test]
    async fn test_create_field_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publications"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "messages": { "authorId": "author does not exist" }
            })))
            .mount(&server)
            .await;

        let err = service(&server, 5)
            .create(&NewPublication {
                title: "t".into(),
                author_id: AuthorId::try_new("ghost").unwrap(),
                summary: "s".into(),
                content: "c".into(),
                kind: PublicationKind::Other,
                category: "x".into(),
            })
            .await
            .unwrap_err();

        let RemoteError::Validation(fields) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(fields.get("authorId"), Some("author does not exist"));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/publications"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = service(&server, 1).list().await.unwrap_err();

        assert!(matches!(err, RemoteError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let publications = RemotePublications::new(&RemoteServiceSettings {
            base_url: format!("http://127.0.0.1:{port}/publications"),
            request_timeout_seconds: 1,
        })
        .unwrap();

        let err = publications.list().await.unwrap_err();

        assert!(matches!(err, RemoteError::Transport(_)), "{err:?}");
    }
}
