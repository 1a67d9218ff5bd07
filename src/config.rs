use std::fmt;
use std::time::Duration;

use url::Url;

use crate::RelayError;

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_ENV: &str = "SPOTIFY_AUTH_REDIRECT_URI";
pub const TOKEN_URL_ENV: &str = "SPOTIFY_TOKEN_URL";

/// Credentials and upstream settings, fixed for the life of the process.
#[derive(Clone)]
pub struct RelayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token_url(mut self, token_url: impl AsRef<str>) -> Result<Self, RelayError> {
        let url = Url::parse(token_url.as_ref())?;
        self.token_url = url.to_string();
        Ok(self)
    }

    /// Sets the deadline for each token endpoint call. A zero deadline would
    /// fail every grant, so it is refused.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RelayError> {
        if timeout.is_zero() {
            return Err(RelayError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Every required
    /// variable must be present and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| RelayError::MissingEnv {
                    name: name.to_string(),
                })
        };

        let config = Self::new(
            required(CLIENT_ID_ENV)?,
            required(CLIENT_SECRET_ENV)?,
            required(REDIRECT_URI_ENV)?,
        );

        match lookup(TOKEN_URL_ENV).filter(|value| !value.is_empty()) {
            Some(token_url) => config.with_token_url(token_url),
            None => Ok(config),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const COMPLETE: &[(&str, &str)] = &[
        (CLIENT_ID_ENV, "client-id"),
        (CLIENT_SECRET_ENV, "client-secret"),
        (REDIRECT_URI_ENV, "myapp://spotify-login-callback"),
    ];

    #[test]
    fn from_lookup_reads_required_values() {
        let config = RelayConfig::from_lookup(lookup_from(COMPLETE)).unwrap();
        assert_eq!(config.client_id, "client-id");
        assert_eq!(config.client_secret, "client-secret");
        assert_eq!(config.redirect_uri, "myapp://spotify-login-callback");
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn from_lookup_fails_when_any_required_value_is_unset() {
        for missing in [CLIENT_ID_ENV, CLIENT_SECRET_ENV, REDIRECT_URI_ENV] {
            let vars: Vec<_> = COMPLETE
                .iter()
                .copied()
                .filter(|(name, _)| *name != missing)
                .collect();
            match RelayConfig::from_lookup(lookup_from(&vars)) {
                Err(RelayError::MissingEnv { name }) => assert_eq!(name, missing),
                other => panic!("expected MissingEnv for {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_lookup_treats_empty_as_missing() {
        let vars: Vec<_> = COMPLETE
            .iter()
            .map(|(name, value)| {
                if *name == CLIENT_SECRET_ENV {
                    (*name, "")
                } else {
                    (*name, *value)
                }
            })
            .collect();
        let result = RelayConfig::from_lookup(lookup_from(&vars));
        assert!(
            matches!(result, Err(RelayError::MissingEnv { ref name }) if name == CLIENT_SECRET_ENV)
        );
    }

    #[test]
    fn from_lookup_honours_token_url_override() {
        let mut vars = COMPLETE.to_vec();
        vars.push((TOKEN_URL_ENV, "http://127.0.0.1:9000/api/token"));
        let config = RelayConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.token_url, "http://127.0.0.1:9000/api/token");
    }

    #[test]
    fn from_lookup_rejects_invalid_token_url() {
        let mut vars = COMPLETE.to_vec();
        vars.push((TOKEN_URL_ENV, "not a url"));
        let result = RelayConfig::from_lookup(lookup_from(&vars));
        assert!(matches!(result, Err(RelayError::InvalidTokenUrl(_))));
    }

    #[test]
    fn with_timeout_rejects_zero() {
        let result = RelayConfig::new("client-id", "client-secret", "myapp://cb")
            .with_timeout(Duration::ZERO);
        assert!(matches!(result, Err(RelayError::ZeroTimeout)));
    }

    #[test]
    fn with_timeout_accepts_positive_deadline() {
        let config = RelayConfig::new("client-id", "client-secret", "myapp://cb")
            .with_timeout(Duration::from_millis(250))
            .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn debug_output_hides_client_secret() {
        let config = RelayConfig::new("client-id", "super-secret", "myapp://cb");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("client-id"));
        assert!(!rendered.contains("super-secret"));
    }
}
