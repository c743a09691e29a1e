use crate::error::AppError;
use crate::models::User;
use crate::startup::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mongodb::bson::doc;

/// Authenticated caller, as asserted by the upstream identity layer.
///
/// The `X-User-ID` header is set by the trusted front door after session
/// validation; this service never sees credentials.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Missing X-User-ID header")))?;

        tracing::Span::current().record("user_id", user_id);

        Ok(CurrentUser(user_id.to_string()))
    }
}

/// Caller with the admin role on their user record.
///
/// The capability is an explicit role claim, not an email heuristic.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user_id) = CurrentUser::from_request_parts(parts, state).await?;

        let user = state
            .db
            .users()
            .find_one(doc! { "_id": &user_id }, None)
            .await?
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Unknown user")))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Admin privileges required"
            )));
        }

        Ok(AdminUser(user))
    }
}
