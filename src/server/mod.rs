//! HTTP server for the feed endpoint

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::feed::{FeedBuilder, FeedError, SiteMetadata};
use crate::Blog;

/// Server state
pub struct ServerState {
    pub feed: FeedBuilder,
    pub collection: String,
    pub site: SiteMetadata,
    pub is_production: bool,
}

/// Router serving the feed at `route`
pub fn router(route: &str, state: ServerState) -> Router {
    Router::new()
        .route(route, get(feed_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the feed server
pub async fn start(blog: &Blog, ip: &str, port: u16, is_production: bool) -> Result<()> {
    let state = ServerState {
        feed: blog.feed_builder(),
        collection: blog.config.feed.collection.clone(),
        site: blog.config.site_metadata()?,
        is_production,
    };
    let route = blog.config.feed.route();
    let app = router(&route, state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Feed available at http://{}:{}{}", ip, port, route);
    if !is_production {
        println!("Development mode: drafts are included.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build and return the feed document
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Result<Response, FeedErrorResponse> {
    let document = state
        .feed
        .build_feed(&state.collection, state.is_production, &state.site)
        .await?;

    Ok(([(header::CONTENT_TYPE, document.content_type)], document.body).into_response())
}

/// A feed failure surfaced as a 500
struct FeedErrorResponse(FeedError);

impl From<FeedError> for FeedErrorResponse {
    fn from(err: FeedError) -> Self {
        Self(err)
    }
}

impl IntoResponse for FeedErrorResponse {
    fn into_response(self) -> Response {
        tracing::error!("Feed generation failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Feed generation failed: {}", self.0),
        )
            .into_response()
    }
}
