use std::fmt;

use bytes::Bytes;
use url::form_urlencoded;

use crate::{RelayConfig, RelayError};

const REDACTED: &str = "REDACTED";
const SENSITIVE_FIELDS: &[&str] = &["code", "refresh_token", "client_secret"];

/// The two grants the relay knows how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    AuthorizationCodeSwap,
    RefreshTokenRenewal,
}

impl GrantKind {
    /// Value sent upstream as `grant_type`.
    pub fn grant_type(self) -> &'static str {
        match self {
            GrantKind::AuthorizationCodeSwap => "authorization_code",
            GrantKind::RefreshTokenRenewal => "refresh_token",
        }
    }

    /// Inbound field carried over to the provider for this grant.
    pub fn field(self) -> &'static str {
        match self {
            GrantKind::AuthorizationCodeSwap => "code",
            GrantKind::RefreshTokenRenewal => "refresh_token",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.grant_type())
    }
}

/// Form fields submitted by the mobile client.
#[derive(Debug, Clone, Default)]
pub struct InboundGrantRequest {
    pairs: Vec<(String, String)>,
}

impl InboundGrantRequest {
    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// Fails on non UTF-8 input, on `;` separators and on `%` escapes that
    /// are not followed by two hex digits.
    pub fn decode(body: &[u8]) -> Result<Self, RelayError> {
        let text = std::str::from_utf8(body).map_err(|err| RelayError::InvalidRequestBody {
            message: err.to_string(),
        })?;
        check_form_syntax(text)?;

        let pairs = form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect();
        Ok(Self { pairs })
    }

    /// First value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Re-encodes the fields for logging with grant secrets masked.
    pub fn redacted(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            if SENSITIVE_FIELDS.contains(&key.as_str()) {
                serializer.append_pair(key, REDACTED);
            } else {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

fn check_form_syntax(text: &str) -> Result<(), RelayError> {
    if let Some(at) = text.find(';') {
        return Err(RelayError::InvalidRequestBody {
            message: format!("invalid semicolon separator at byte {at}"),
        });
    }

    let bytes = text.as_bytes();
    let mut index = 0;
    while let Some(offset) = bytes[index..].iter().position(|byte| *byte == b'%') {
        let at = index + offset;
        let well_formed = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(RelayError::InvalidRequestBody {
                message: format!("invalid percent escape at byte {at}"),
            });
        }
        index = at + 3;
    }
    Ok(())
}

/// Form sent to the provider's token endpoint.
#[derive(Clone)]
pub struct OutboundTokenRequest {
    pairs: Vec<(&'static str, String)>,
}

impl OutboundTokenRequest {
    pub fn new(kind: GrantKind, config: &RelayConfig, inbound: &InboundGrantRequest) -> Self {
        let field = kind.field();
        let value = inbound.get(field).unwrap_or_default().to_string();

        Self {
            pairs: vec![
                ("grant_type", kind.grant_type().to_string()),
                ("client_id", config.client_id.clone()),
                ("client_secret", config.client_secret.clone()),
                ("redirect_uri", config.redirect_uri.clone()),
                (field, value),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

/// Whatever the provider answered, untouched.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Bytes,
}
