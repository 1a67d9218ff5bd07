use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;
use tracing::debug;

use crate::RelayError;

/// Loads the PEM certificate chain and private key for the listener.
pub async fn load_tls_config(cert: &Path, key: &Path) -> Result<RustlsConfig, RelayError> {
    let cert_pem = read_pem(cert).await?;
    let key_pem = read_pem(key).await?;

    let config = RustlsConfig::from_pem(cert_pem, key_pem)
        .await
        .map_err(|err| RelayError::Tls {
            path: format!("{}, {}", cert.display(), key.display()),
            message: err.to_string(),
        })?;

    debug!(cert = %cert.display(), key = %key.display(), "tls material loaded");
    Ok(config)
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, RelayError> {
    tokio::fs::read(path).await.map_err(|err| RelayError::Tls {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
