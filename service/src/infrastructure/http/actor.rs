use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::identifiers::ActorId;
use crate::infrastructure::http::api::ApiError;

/// Header carrying the id of the authenticated user, set by the gateway in front of the service
pub const ACTOR_HEADER: &str = "x-workflow-actor";

/// Actor performing the request
#[derive(Debug, Clone)]
pub struct Actor(pub ActorId);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("{} header is missing", ACTOR_HEADER)))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized(format!("{} header is not valid text", ACTOR_HEADER)))?;

        ActorId::try_new(value)
            .map(Actor)
            .map_err(|e| ApiError::Unauthorized(format!("invalid {} header: {}", ACTOR_HEADER, e)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<Actor, ApiError> {
        let (mut parts, _) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_actor_from_header() {
        let request = Request::builder()
            .header(ACTOR_HEADER, "alice")
            .body(())
            .unwrap();
        let Actor(actor) = extract(request).await.unwrap();
        assert_eq!(actor.as_ref(), "alice");
    }

    #[tokio::test]
    async fn test_missing_or_blank_header() {
        let missing = Request::builder().body(()).unwrap();
        assert!(matches!(extract(missing).await, Err(ApiError::Unauthorized(_))));

        let blank = Request::builder().header(ACTOR_HEADER, " ").body(()).unwrap();
        assert!(matches!(extract(blank).await, Err(ApiError::Unauthorized(_))));
    }
}
