//! HTTPS front end: the two grant endpoints and the TLS listener.

mod http;
mod tls;

use std::net::SocketAddr;

use axum::{Router, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{RelayError, TokenRelay};

use self::http::{token_refresh, token_swap};
pub use self::tls::load_tls_config;

pub const TOKEN_SWAP_PATH: &str = "/token_swap";
pub const TOKEN_REFRESH_PATH: &str = "/token_refresh";

#[derive(Debug, Clone)]
pub struct RelayServer {
    relay: TokenRelay,
}

impl RelayServer {
    pub fn new(relay: TokenRelay) -> Self {
        Self { relay }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(TOKEN_SWAP_PATH, post(token_swap))
            .route(TOKEN_REFRESH_PATH, post(token_refresh))
            .layer(TraceLayer::new_for_http())
            .with_state(self.relay.clone())
    }

    pub async fn serve_tls(self, addr: SocketAddr, tls: RustlsConfig) -> Result<(), RelayError> {
        info!(%addr, "listening for token grants");
        axum_server::bind_rustls(addr, tls)
            .serve(self.router().into_make_service())
            .await?;
        Ok(())
    }
}
