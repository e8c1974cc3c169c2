use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::error::AppError;
use crate::middleware::permission::require_principal;
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

/// Claims of a valid bearer token, any role.
pub struct AuthClaims(pub TokenClaims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::unauthorized("Missing bearer token"))?;

        let claims = state.jwt.verify(bearer.token())?;
        Ok(AuthClaims(claims))
    }
}

/// Claims of a principal; other roles are rejected with 403.
///
/// Must be listed before any body extractor so that authorization runs first.
pub struct PrincipalClaims(pub TokenClaims);

impl FromRequestParts<AppState> for PrincipalClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        require_principal(&claims)?;
        Ok(PrincipalClaims(claims))
    }
}
