// Controller session
//
// Owns one `Transport` and the login/logout lifecycle around it. Every
// request goes out through `get`/`post`, which route the body through the
// envelope check before the caller sees anything.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiVersion, SessionConfig};
use crate::envelope::{self, ApiData};
use crate::error::Error;
use crate::transport::Transport;

/// Authentication state of a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// An authenticated session against one controller site.
///
/// Obtained only through [`Controller::connect`] (or [`Controller::scoped`]),
/// so a `Controller` in hand is always logged in. Release it with
/// [`Controller::close`]; a client dropped while still logged in schedules
/// a best-effort logout on the current Tokio runtime.
///
/// One instance is one session. Calls are not serialized internally, so
/// callers needing independent sessions should connect independent clients.
#[derive(Debug)]
pub struct Controller {
    transport: Transport,
    base_url: Url,
    api_url: Url,
    logout_url: Url,
    api_version: ApiVersion,
    state: SessionState,
}

impl Controller {
    /// Build the transport and log in.
    ///
    /// Fails with [`Error::Api`] carrying the controller's message if the
    /// login is rejected; no client is returned in that case.
    pub async fn connect(config: SessionConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        let api_url = config.site_api_url()?;
        let logout_url = base_url.join("logout")?;

        debug!("controller for {}", base_url);

        let transport = Transport::new(&config.transport())?;
        let mut controller = Self {
            transport,
            base_url,
            api_url,
            logout_url,
            api_version: config.api_version(),
            state: SessionState::LoggedOut,
        };

        controller
            .login(config.username(), config.password())
            .await?;
        Ok(controller)
    }

    /// Connect, run `f` against the session, then close it.
    ///
    /// The session is released whether `f` succeeds or fails; `f`'s result
    /// is returned as-is.
    pub async fn scoped<T, E, F>(config: SessionConfig, f: F) -> Result<T, E>
    where
        E: From<Error>,
        F: AsyncFnOnce(&Self) -> Result<T, E>,
    {
        let controller = Self::connect(config).await?;
        let result = f(&controller).await;
        controller.close().await;
        result
    }

    /// Log out and release the session.
    ///
    /// Logout is best-effort: failures are logged and swallowed.
    pub async fn close(mut self) {
        self.logout().await;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Controller root (`https://host:port/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a site-scoped URL: `{base}api/s/{site}/{path}`.
    pub fn site_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.api_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `url` and unwrap the envelope.
    pub async fn get(&self, url: Url, query: &[(&str, &str)]) -> Result<ApiData, Error> {
        let body = self.transport.get(url, query).await?;
        envelope::unwrap(body)
    }

    /// POST `body` to `url` and unwrap the envelope.
    pub async fn post(&self, url: Url, body: Option<&Value>) -> Result<ApiData, Error> {
        let body = self.transport.post(url, body).await?;
        envelope::unwrap(body)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// `POST /api/login`. The session cookie lands in the transport's jar.
    async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.base_url.join("api/login")?;
        debug!(username, "logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        // An empty reply unwraps to "no data", which counts as success.
        self.post(url, Some(&body)).await?;

        self.state = SessionState::LoggedIn;
        debug!("login successful");
        Ok(())
    }

    /// `GET /logout`, at most once per session.
    async fn logout(&mut self) {
        if self.state != SessionState::LoggedIn {
            return;
        }
        self.state = SessionState::LoggedOut;

        debug!("logging out at {}", self.logout_url);
        match self.transport.get_discard(self.logout_url.clone()).await {
            Ok(()) => debug!("logout complete"),
            Err(e) => warn!(error = %e, "logout failed; session left to expire"),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if self.state != SessionState::LoggedIn {
            return;
        }
        self.state = SessionState::LoggedOut;

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("controller dropped outside a Tokio runtime; skipping logout");
            return;
        };

        debug!("controller dropped without close; logging out in background");
        let transport = self.transport.clone();
        let url = self.logout_url.clone();
        handle.spawn(async move {
            if let Err(e) = transport.get_discard(url).await {
                warn!(error = %e, "background logout failed");
            }
        });
    }
}
