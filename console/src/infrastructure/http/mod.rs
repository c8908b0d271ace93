use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get, patch};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::authors::{
    author_detail, close_author_detail, create_author, dismiss_authors_error, find_author_by_id,
    list_authors, search_author,
};
use crate::infrastructure::http::handlers::health_check;
use crate::infrastructure::http::handlers::publications::{
    change_status, close_publication_detail, create_publication, dismiss_publications_error,
    find_publication_by_id, list_publications, open_transition, publication_detail,
    search_publication,
};

mod api;
mod handlers;
mod querystring;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("listener has no local address")?;
        tracing::info!("listening on {}", address);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

/// Health check plus the `/api` routes, traced per request.
pub fn router<S: AppState>(state: S) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/publications",
            get(list_publications::<S>).post(create_publication::<S>),
        )
        .route("/publications/error", delete(dismiss_publications_error::<S>))
        .route("/publications/search", get(search_publication::<S>))
        .route(
            "/publications/detail",
            get(publication_detail::<S>).delete(close_publication_detail::<S>),
        )
        .route("/publications/{id}", get(find_publication_by_id::<S>))
        .route("/publications/{id}/transition", get(open_transition::<S>))
        .route("/publications/{id}/status", patch(change_status::<S>))
        .route("/authors", get(list_authors::<S>).post(create_author::<S>))
        .route("/authors/error", delete(dismiss_authors_error::<S>))
        .route("/authors/search", get(search_author::<S>))
        .route(
            "/authors/detail",
            get(author_detail::<S>).delete(close_author_detail::<S>),
        )
        .route("/authors/{id}", get(find_author_by_id::<S>))
}
