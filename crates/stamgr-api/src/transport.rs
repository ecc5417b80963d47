// Transport session: one cookie-carrying HTTPS client per controller session.
//
// Knows nothing about the controller envelope. Every exchange yields the
// parsed JSON body (or `Value::Null` for an empty 2xx body); interpreting
// that body is the caller's job.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

const USER_AGENT: &str = concat!("stamgr/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt carried in an error.
const BODY_PREVIEW: usize = 200;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed controllers).
    DangerAcceptInvalid,
}

impl From<bool> for TlsMode {
    /// `true` verifies against the system store, `false` skips verification.
    fn from(verify: bool) -> Self {
        if verify {
            Self::System
        } else {
            Self::DangerAcceptInvalid
        }
    }
}

/// Settings fixed for the lifetime of a [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` wired to the given cookie jar.
    fn build_client(&self, jar: Arc<Jar>) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// HTTPS exchange layer with session-cookie persistence.
///
/// Cookies set by any response are stored in the instance's jar and sent on
/// every later request, which is what keeps a controller login alive. The
/// jar belongs to exactly one session; build a separate `Transport` for
/// every independent session.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    /// Build a transport with a fresh, empty cookie jar.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client(Arc::new(Jar::default()))?;
        Ok(Self { http })
    }

    /// Issue a GET, URL-encoding `query` (an empty slice sends no query string).
    pub async fn get(&self, url: Url, query: &[(&str, &str)]) -> Result<Value, Error> {
        debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let resp = builder.send().await?;

        Self::read_json(resp).await
    }

    /// Issue a POST with `body` serialized as JSON (no body when `None`).
    pub async fn post(&self, url: Url, body: Option<&Value>) -> Result<Value, Error> {
        debug!("POST {}", url);

        let mut builder = self.http.post(url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;

        Self::read_json(resp).await
    }

    /// Issue a GET and ignore whatever comes back.
    ///
    /// Only a transport failure is an error. Used for logout, which
    /// answers with a redirect to an HTML login page on most firmware.
    pub async fn get_discard(&self, url: Url) -> Result<(), Error> {
        debug!("GET {}", url);

        let _resp = self.http.get(url).send().await?;
        Ok(())
    }

    /// Read the body as JSON.
    ///
    /// The HTTP status alone never fails a call that carries JSON: the
    /// controller reports rejected logins and commands inside the envelope,
    /// often alongside a 4xx status.
    async fn read_json(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(status = status.as_u16(), len = body.len(), "response received");

        if body.trim().is_empty() {
            return if status.is_success() {
                Ok(Value::Null)
            } else {
                Err(Error::Http {
                    status: status.as_u16(),
                    body,
                })
            };
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW).collect();
            if status.is_success() {
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            } else {
                Error::Http {
                    status: status.as_u16(),
                    body: preview,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_flag_maps_to_tls_mode() {
        assert_eq!(TlsMode::from(true), TlsMode::System);
        assert_eq!(TlsMode::from(false), TlsMode::DangerAcceptInvalid);
    }

    #[test]
    fn missing_ca_cert_is_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/stamgr-ca.pem")),
            timeout: None,
        };
        let err = Transport::new(&config).err();
        assert!(matches!(err, Some(Error::Tls(_))), "got: {err:?}");
    }

    #[test]
    fn default_transport_builds() {
        assert!(Transport::new(&TransportConfig::default()).is_ok());
    }
}
