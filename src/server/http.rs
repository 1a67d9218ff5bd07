use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{GrantKind, ProviderResponse, RelayError, TokenRelay};

pub(super) async fn token_swap(
    State(relay): State<TokenRelay>,
    body: Bytes,
) -> Result<Response, RelayError> {
    relay_grant(&relay, GrantKind::AuthorizationCodeSwap, &body).await
}

pub(super) async fn token_refresh(
    State(relay): State<TokenRelay>,
    body: Bytes,
) -> Result<Response, RelayError> {
    relay_grant(&relay, GrantKind::RefreshTokenRenewal, &body).await
}

async fn relay_grant(
    relay: &TokenRelay,
    kind: GrantKind,
    body: &[u8],
) -> Result<Response, RelayError> {
    let upstream = relay.exchange(kind, body).await?;
    Ok(pass_through(upstream))
}

fn pass_through(upstream: ProviderResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
        .into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, format!("error: '{self}'")).into_response()
    }
}
