//! Per-connection message loop

use crate::protocol::{decode, ProtocolError};
use crate::router::EventRouter;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::Instrument;
use uuid::Uuid;

/// Counters reported when a session ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub messages: u64,
    pub replies: u64,
    pub decode_errors: u64,
}

/// Complete the WebSocket handshake on `stream` and serve it until it closes.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: EventRouter,
) -> anyhow::Result<SessionStats> {
    let span = tracing::info_span!("session", id = %Uuid::new_v4(), %peer);

    async move {
        let ws = tokio_tungstenite::accept_async(stream).await?;
        tracing::info!("Client connected");

        let stats = run_session(ws, &router).await;
        tracing::info!(
            "Client disconnected (messages={}, replies={}, decode_errors={})",
            stats.messages,
            stats.replies,
            stats.decode_errors
        );
        Ok::<_, anyhow::Error>(stats)
    }
    .instrument(span)
    .await
}

/// Extract the JSON text carried by a frame.
///
/// `Ok(None)` means the frame carries no payload for the router.
fn frame_text(frame: Message) -> Result<Option<String>, ProtocolError> {
    match frame {
        Message::Text(text) => Ok(Some(text)),
        Message::Binary(bytes) => Ok(Some(std::str::from_utf8(&bytes)?.to_owned())),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => Ok(None),
    }
}

/// Read, route and reply until the peer goes away.
///
/// Messages are handled strictly in arrival order and each reply is written
/// before the next frame is read. Bad frames are logged and skipped.
pub async fn run_session<S>(mut ws: WebSocketStream<S>, router: &EventRouter) -> SessionStats
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stats = SessionStats::default();

    while let Some(frame) = ws.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Transport closed: {}", e);
                break;
            }
        };

        if frame.is_close() {
            break;
        }

        let decoded = frame_text(frame).and_then(|text| text.as_deref().map(decode).transpose());
        let message = match decoded {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(e) => {
                stats.decode_errors += 1;
                tracing::warn!("Error processing message: {}", e);
                continue;
            }
        };
        stats.messages += 1;

        let Some(reply) = router.route(message).await else {
            continue;
        };

        if let Err(e) = ws.send(Message::Text(reply.to_json())).await {
            tracing::debug!("Failed to send reply: {}", e);
            break;
        }
        stats.replies += 1;
    }

    stats
}
