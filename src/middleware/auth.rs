use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Channel, Role},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

pub fn ensure_manager(user: &AuthUser) -> Result<(), AppError> {
    if user.role != Role::Manager {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Cart and checkout are channel operations; the seller's role fixes which
/// channel every cart line targets.
pub fn ensure_seller(user: &AuthUser) -> Result<Channel, AppError> {
    match user.role {
        Role::Seller(channel) => Ok(channel),
        Role::Manager => Err(AppError::Forbidden),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::BadRequest("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::BadRequest("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;

        let role = Role::from_str(&decoded.claims.role)
            .ok_or_else(|| AppError::BadRequest("Unknown role in token".into()))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seller_check_yields_the_channel() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Seller(Channel::Shopee),
        };
        assert_eq!(ensure_seller(&user).unwrap(), Channel::Shopee);
        assert!(ensure_manager(&user).is_err());
    }

    #[test]
    fn manager_cannot_act_as_seller() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Manager,
        };
        assert!(ensure_manager(&user).is_ok());
        assert!(matches!(ensure_seller(&user), Err(AppError::Forbidden)));
    }
}
