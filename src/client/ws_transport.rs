use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::{debug, error, trace};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error, Message};
use tokio_tungstenite::tungstenite::http::StatusCode;
use crate::client::transport::{Transport, TransportError, TransportLink};

/// WebSocket transport against the `/api/ws` route of the server.
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        WsTransport { url: url.into() }
    }
}

#[async_trait]
impl Transport for WsTransport {

    async fn connect(&self) -> Result<TransportLink, TransportError> {
        debug!("Connecting to websocket '{}'...", self.url);
        let (ws_stream, _) = match connect_async(self.url.as_str()).await {
            Ok(connection) => connection,
            Err(Error::Http(response)) if response.status() == StatusCode::UNAUTHORIZED => {
                error!("Unauthorized ws connection to '{}'", self.url);
                return Err(TransportError::Unauthorized(self.url.clone()));
            }
            Err(err) => {
                return Err(TransportError::Connect { url: self.url.clone(), reason: err.to_string() });
            }
        };
        debug!("WebSocket handshake has been successfully completed");

        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (incoming_tx, incoming) = mpsc::unbounded_channel::<String>();
        let (mut write, mut read) = ws_stream.split();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outgoing_rx.recv() => {
                        let Some(text) = outbound else {
                            // the owner dropped the link
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        };
                        trace!("Sending text frame {text}");
                        if let Err(err) = write.send(Message::Text(text.into())).await {
                            debug!("Send loop error: {err:?}");
                            break;
                        }
                    }
                    inbound = read.next() => {
                        match inbound {
                            Some(Ok(Message::Text(text))) => {
                                if incoming_tx.send(text.to_string()).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Server closed the websocket");
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                debug!("Receive loop error: {err:?}");
                                break;
                            }
                        }
                    }
                }
            }
            debug!("WebSocket connection closed");
        });

        Ok(TransportLink { outgoing, incoming })
    }
}
