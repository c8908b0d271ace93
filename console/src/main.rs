use crate::domain::authors::AuthorRegistry;
use crate::domain::workflow::PublicationWorkflow;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::remote::{RemoteAuthors, RemotePublications};
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let authors = RemoteAuthors::new(&settings.authors)?;
    let publications = RemotePublications::new(&settings.publications)?;
    tracing::info!(
        authors = %authors.client().base_url(),
        publications = %publications.client().base_url(),
        "remote services configured"
    );

    let policy = settings.workflow.policy();
    if matches!(policy, editorial_common::TransitionPolicy::ServerDecides) {
        tracing::info!("no transition table configured, the publication service decides");
    }

    let state = AppStateImpl::new(
        AuthorRegistry::new(authors),
        PublicationWorkflow::new(publications, policy),
    );

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
