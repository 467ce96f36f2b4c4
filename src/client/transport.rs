use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[derive(Debug, Error)]
pub enum TransportError {

    #[error("Unable to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The server refused the handshake, retrying won't help.
    #[error("Connection to {0} was rejected as unauthorized")]
    Unauthorized(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Unauthorized(_))
    }
}

/// One established duplex connection. Dropping `outgoing` closes it, the end of `incoming`
/// means the server side is gone.
pub struct TransportLink {
    pub outgoing: UnboundedSender<String>,
    pub incoming: UnboundedReceiver<String>,
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self) -> Result<TransportLink, TransportError>;
}
