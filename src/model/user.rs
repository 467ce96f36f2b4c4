use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;
use crate::errors::HttpError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of a write-path route. Tokens are verified upstream, this only reads the
/// forwarded subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| HttpError::unauthorized("Missing user identity."))?;

        let subject = header
            .to_str()
            .map_err(|_| HttpError::unauthorized("Invalid user identity."))?;

        Uuid::try_parse(subject)
            .map(CurrentUser)
            .map_err(|_| HttpError::unauthorized("Invalid user identity."))
    }
}
