// Response envelope
//
// Every controller reply is `{ "meta": { "rc", "msg" }, "data": [...] }`,
// with both keys optional. `unwrap` is the single choke point through which
// every controller-reported failure passes, for GET and POST alike.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Error;

/// One loosely-typed record from a `data` array.
///
/// The controller's record schema varies by firmware, so records stay as
/// open JSON objects (MACs, names, timestamps, limits, ...).
pub type Record = Map<String, Value>;

/// The unwrapped payload of a successful call: `None` when the envelope
/// carried no `data` key.
pub type ApiData = Option<Vec<Record>>;

/// Result code signalling success.
pub const RC_OK: &str = "ok";

/// Controller response envelope. `data` stays raw until `meta` has been
/// checked, so a rejection is reported whatever its payload looks like.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Envelope {
    /// Check `meta`, then hand back `data` as records.
    pub fn into_data(self) -> Result<ApiData, Error> {
        if let Some(meta) = self.meta {
            if meta.rc != RC_OK {
                trace!(rc = %meta.rc, "controller rejected request");
                let message = meta.msg.unwrap_or_else(|| meta.rc.clone());
                return Err(Error::Api {
                    code: meta.rc,
                    message,
                });
            }
        }
        match self.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Vec::<Record>::deserialize(&data)
                .map(Some)
                .map_err(|e| Error::Deserialization {
                    message: format!("envelope data is not a list of records: {e}"),
                    body: data.to_string(),
                }),
        }
    }
}

/// Validate a parsed response body and unwrap its `data`.
///
/// A JSON `null` (empty body) is "no data". Anything that is not an object
/// shaped like an envelope is a deserialization failure.
pub fn unwrap(body: Value) -> Result<ApiData, Error> {
    if body.is_null() {
        return Ok(None);
    }

    let envelope = Envelope::deserialize(&body).map_err(|e| Error::Deserialization {
        message: format!("not a controller envelope: {e}"),
        body: body.to_string(),
    })?;

    envelope.into_data()
}
