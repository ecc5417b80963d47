// Station (client) endpoints
//
// Reads via stat/sta and stat/device, commands via cmd/stamgr. Every
// operation returns the unwrapped envelope `data` as-is. The controller
// accepts most commands for MACs it has never seen, so a successful return
// does not prove the station exists.

use tracing::debug;

use crate::command::{GuestAuthorization, StaCommand, sta_command};
use crate::controller::Controller;
use crate::envelope::ApiData;
use crate::error::Error;

impl Controller {
    /// List all currently connected clients (stations).
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn get_clients(&self) -> Result<ApiData, Error> {
        let url = self.site_url("stat/sta")?;
        debug!("listing connected clients");
        self.get(url, &[]).await
    }

    /// List adopted devices (access points, switches, gateways).
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn get_aps(&self) -> Result<ApiData, Error> {
        let url = self.site_url("stat/device")?;
        debug!("listing devices");
        self.get(url, &[]).await
    }

    /// Authorize a guest client on the hotspot portal.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "authorize-guest", ...}`.
    /// Optional limits are sent only when set to a non-zero value; `ap_mac`
    /// is never sent to a v2 controller.
    pub async fn authorize_guest(&self, guest: &GuestAuthorization) -> Result<ApiData, Error> {
        debug!(mac = %guest.mac, minutes = guest.minutes, "authorizing guest");
        let body = guest.to_command(self.api_version());
        self.post(self.site_url("cmd/stamgr")?, Some(&body)).await
    }

    /// Revoke a guest authorization.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unauthorize-guest", "mac": "..."}`
    pub async fn unauthorize_guest(&self, mac: &str) -> Result<ApiData, Error> {
        debug!(mac, "unauthorizing guest");
        self.stamgr(StaCommand::UnauthorizeGuest, mac).await
    }

    /// Disconnect (kick) a client. It is not blocked and may reconnect.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "kick-sta", "mac": "..."}`
    pub async fn kick_sta(&self, mac: &str) -> Result<ApiData, Error> {
        debug!(mac, "kicking client");
        self.stamgr(StaCommand::KickSta, mac).await
    }

    /// Block a client by MAC address until unblocked.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_sta(&self, mac: &str) -> Result<ApiData, Error> {
        debug!(mac, "blocking client");
        self.stamgr(StaCommand::BlockSta, mac).await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_sta(&self, mac: &str) -> Result<ApiData, Error> {
        debug!(mac, "unblocking client");
        self.stamgr(StaCommand::UnblockSta, mac).await
    }

    async fn stamgr(&self, cmd: StaCommand, mac: &str) -> Result<ApiData, Error> {
        let body = sta_command(cmd, mac);
        self.post(self.site_url("cmd/stamgr")?, Some(&body)).await
    }
}
