use super::request::{HttpRequest, HttpRequestRejection};
use crate::dto::Dto;
use crate::error::{DtoError, format_context};
use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use porter_domain::flags::Flags;
use serde_json::json;
use std::borrow::Cow;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Extractor building `D` from every field of the incoming request.
///
/// ```rust,ignore
/// async fn create_user(Hydrated(user): Hydrated<UserData>) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Hydrated<D>(pub D);

impl<D> Deref for Hydrated<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<D> DerefMut for Hydrated<D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HydratedRejection {
    #[error("Invalid request{}: {source}", format_context(.context))]
    Request { source: HttpRequestRejection, context: Option<Cow<'static, str>> },

    #[error("Invalid DTO source{}: {source}", format_context(.context))]
    Dto { source: DtoError, context: Option<Cow<'static, str>> },
}

impl HydratedRejection {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Request { .. } => StatusCode::BAD_REQUEST,
            Self::Dto { source, .. } if source.is_malformed_json() => StatusCode::BAD_REQUEST,
            Self::Dto { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<HttpRequestRejection> for HydratedRejection {
    #[inline]
    fn from(source: HttpRequestRejection) -> Self {
        Self::Request { source, context: None }
    }
}

impl From<DtoError> for HydratedRejection {
    #[inline]
    fn from(source: DtoError) -> Self {
        Self::Dto { source, context: None }
    }
}

impl IntoResponse for HydratedRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        let code =
            if status == StatusCode::BAD_REQUEST { "BAD_REQUEST" } else { "UNPROCESSABLE_ENTITY" };
        debug!(status = status.as_u16(), error = %self, "Rejecting request");
        let body = json!({ "error": { "code": code, "message": self.to_string() } });
        (status, Json(body)).into_response()
    }
}

impl<D, S> FromRequest<S> for Hydrated<D>
where
    D: Dto + Send,
    S: Send + Sync,
{
    type Rejection = HydratedRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request = <HttpRequest as FromRequest<S>>::from_request(req, state).await?;
        Ok(Self(D::from_request(&request, Flags::NONE)?))
    }
}
