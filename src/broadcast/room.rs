use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const PROPERTY_PREFIX: &str = "property";
const USER_PREFIX: &str = "user";

/// Topic key of a room. On the wire it is `property:<id>` or `user:<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoomKey {
    /// Interest in one listing's availability and applications.
    Property(Uuid),
    /// Interest in one user's booking feed.
    User(Uuid),
}

#[derive(Debug, Error, PartialEq)]
pub enum RoomKeyError {

    #[error("Room key '{0}' has no '<family>:<id>' shape")]
    MissingSeparator(String),

    #[error("Unknown room family '{0}'")]
    UnknownFamily(String),

    #[error("Invalid id in room key: {0}")]
    InvalidId(String),
}

impl RoomKey {

    pub fn property(property_id: Uuid) -> Self {
        RoomKey::Property(property_id)
    }

    pub fn user(user_id: Uuid) -> Self {
        RoomKey::User(user_id)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKey::Property(id) => write!(f, "{PROPERTY_PREFIX}:{id}"),
            RoomKey::User(id) => write!(f, "{USER_PREFIX}:{id}"),
        }
    }
}

impl FromStr for RoomKey {
    type Err = RoomKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((family, id)) = s.split_once(':') else {
            return Err(RoomKeyError::MissingSeparator(s.to_string()));
        };
        let id = Uuid::try_parse(id).map_err(|_| RoomKeyError::InvalidId(id.to_string()))?;
        match family {
            PROPERTY_PREFIX => Ok(RoomKey::Property(id)),
            USER_PREFIX => Ok(RoomKey::User(id)),
            other => Err(RoomKeyError::UnknownFamily(other.to_string())),
        }
    }
}

impl TryFrom<String> for RoomKey {
    type Error = RoomKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoomKey> for String {
    fn from(key: RoomKey) -> Self {
        key.to_string()
    }
}
