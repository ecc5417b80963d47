// stamgr-api: Async session client for the UniFi controller station-manager API.
//
// `Controller` logs in, issues site-scoped queries and `cmd/stamgr`
// commands, unwraps the `{meta, data}` envelope, and logs out on close.

pub mod clients;
pub mod command;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod transport;

pub use command::{CommandBuilder, GuestAuthorization, StaCommand};
pub use config::{ApiVersion, SessionConfig};
pub use controller::{Controller, SessionState};
pub use envelope::{ApiData, Record};
pub use error::Error;
pub use transport::{TlsMode, Transport, TransportConfig};
