use std::time::Duration;

use reqwest::Url;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, warn};

use super::transport::{Completion, ResponseData};

pub(crate) const PROBE_CLOSE_REASON: &str =
    "just testing connectivity with the Integration Test Server";

/// Opens a websocket and closes it with a normal closure as soon as it is
/// up. No application data is exchanged. A peer that answers the upgrade
/// with a plain HTTP status yields that response.
pub(super) async fn open_and_close(url: &Url, connect_timeout: Option<Duration>) -> Completion {
    debug!("Opening websocket {}", url);
    let connect = connect_async(url.as_str());
    let connected = match connect_timeout {
        Some(limit) => match timeout(limit, connect).await {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!("Websocket {} did not open within {:?}", url, limit);
                return Completion::Unreachable {
                    reason: format!("connection timed out after {:?}", limit),
                };
            }
        },
        None => connect.await,
    };

    match connected {
        Ok((mut stream, _response)) => {
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: PROBE_CLOSE_REASON.into(),
            };
            if let Err(err) = stream.close(Some(frame)).await {
                debug!("Websocket close handshake failed: {}", err);
            }
            Completion::ProbeOpened
        }
        Err(WsError::Http(response)) => {
            warn!(
                "Websocket {} refused the upgrade with status {}",
                url,
                response.status()
            );
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_owned(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .body()
                .as_deref()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            Completion::Response(ResponseData {
                status: response.status().as_u16(),
                headers,
                body,
                ..ResponseData::default()
            })
        }
        Err(err) => {
            warn!("Websocket {} failed to open: {}", url, err);
            Completion::Unreachable {
                reason: format!("failed to open websocket connection: {}", err),
            }
        }
    }
}
