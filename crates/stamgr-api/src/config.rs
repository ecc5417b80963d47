// ── Session configuration ──
//
// Describes *where* and *as whom* to connect. Never touches disk or the
// environment: the embedding application builds a `SessionConfig` and
// hands it to `Controller::connect`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig};

/// Controller API generation.
///
/// Only affects payload shape: v2 controllers reject the `ap_mac` hint on
/// guest authorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    /// v3 and later (site-scoped API).
    #[default]
    V3,
}

impl ApiVersion {
    /// Whether `authorize-guest` may carry an `ap_mac` field.
    pub fn supports_ap_mac(self) -> bool {
        !matches!(self, Self::V2)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(format!("unknown API version '{other}' (expected v2 or v3)")),
        }
    }
}

/// Connection parameters for one controller session.
///
/// Defaults: port 8443, site `"default"`, TLS verification on, API v3,
/// no request timeout.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    site: String,
    tls: TlsMode,
    api_version: ApiVersion,
    timeout: Option<Duration>,
    base_url: Option<Url>,
}

impl SessionConfig {
    pub const DEFAULT_PORT: u16 = 8443;
    pub const DEFAULT_SITE: &'static str = "default";

    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            username: username.into(),
            password,
            site: Self::DEFAULT_SITE.into(),
            tls: TlsMode::System,
            api_version: ApiVersion::default(),
            timeout: None,
            base_url: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// `false` skips certificate validation for every call of the session.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.tls = TlsMode::from(verify);
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the derived `https://{host}:{port}/` root with an explicit one
    /// (reverse proxies, plain-HTTP test servers).
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn tls(&self) -> &TlsMode {
        &self.tls
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Controller root, always ending in `/`.
    pub fn base_url(&self) -> Result<Url, Error> {
        let mut url = match &self.base_url {
            Some(url) => url.clone(),
            None => Url::parse(&format!("https://{}:{}/", self.host, self.port))?,
        };
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Site API root: `{base}api/s/{site}/`, with the site percent-encoded
    /// as a single path segment.
    pub fn site_api_url(&self) -> Result<Url, Error> {
        if matches!(self.site.as_str(), "" | "." | "..") {
            return Err(Error::InvalidSite(self.site.clone()));
        }
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidSite(self.site.clone()))?
            .pop_if_empty()
            .extend(["api", "s", self.site.as_str(), ""]);
        Ok(url)
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
