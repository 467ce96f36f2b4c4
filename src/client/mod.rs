mod config;
mod transport;
mod ws_transport;
mod local_transport;
mod subscription_manager;

pub use config::ClientConfig;
pub use transport::{Transport, TransportError, TransportLink};
pub use ws_transport::WsTransport;
pub use local_transport::LocalTransport;
pub use subscription_manager::{ConnectionState, EventCallback, SubscriptionId, SubscriptionManager};
