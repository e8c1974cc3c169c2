use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::error::AppError;
use crate::utils::jwt::TokenClaims;

/// The single role check for administrative operations.
pub fn require_principal(claims: &TokenClaims) -> Result<(), AppError> {
    if claims.role != RoleEnum::Principal {
        tracing::warn!(user_id = %claims.sub, role = ?claims.role, "principal role required");
        return Err(AppError::forbidden("Principal role required"));
    }
    Ok(())
}
