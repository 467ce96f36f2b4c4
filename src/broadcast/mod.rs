mod room;
mod notification;
mod registry;
mod room_router;
mod event_publisher;

pub use room::{RoomKey, RoomKeyError};
pub use notification::{ClientCommand, EventKind, Notification, RoomAction, RoomEvent};
pub use registry::{ConnectionId, ConnectionRegistry};
pub use room_router::{Frame, PublishReport, RoomRouter};
pub use event_publisher::{EventPublisher, RoomEventPublisher};
