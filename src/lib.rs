//! Server-side token swap for Spotify's OAuth 2.0 authorization code flow.
//!
//! Mobile clients post their authorization code or refresh token here; the
//! relay attaches the client secret, calls Spotify's token endpoint and
//! returns the provider's answer untouched, so the secret never ships inside
//! the app.

mod client;
mod config;
mod error;
#[cfg(feature = "server")]
mod server;
mod types;

pub use client::TokenRelay;
pub use config::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_TIMEOUT, DEFAULT_TOKEN_URL, REDIRECT_URI_ENV,
    RelayConfig, TOKEN_URL_ENV,
};
pub use error::RelayError;
#[cfg(feature = "server")]
pub use server::{RelayServer, TOKEN_REFRESH_PATH, TOKEN_SWAP_PATH, load_tls_config};
pub use types::{GrantKind, InboundGrantRequest, OutboundTokenRequest, ProviderResponse};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn setup_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => subscriber.with(fmt::layer().json()).init(),
        _ => subscriber.with(fmt::layer()).init(),
    }
}
