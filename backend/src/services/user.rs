//! User service for authentication and profiles
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService, TokenKind};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRepository};
use fitness_tracker_shared::types::{
    AuthResponse, AuthTokens, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile,
};
use fitness_tracker_shared::validation::{describe, required_text};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Emails are stored and compared in this form
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        let req = RegisterRequest {
            email: normalize_email(&req.email),
            ..req
        };
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        let name = required_text("Name", &req.name).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(
            pool,
            NewUser {
                name,
                email: req.email,
                password_hash,
                profile: req.profile,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        tracing::info!(user_id = %user.id, "User registered");

        let tokens = jwt_service.issue_pair(user.id).map_err(ApiError::Internal)?;
        Ok(AuthResponse {
            user: user.into_profile(),
            tokens,
        })
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: LoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        let user = UserRepository::find_by_email(pool, &normalize_email(&req.email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = jwt_service.issue_pair(user.id).map_err(ApiError::Internal)?;
        Ok(AuthResponse {
            user: user.into_profile(),
            tokens,
        })
    }

    /// Trade a refresh token for a new pair
    pub async fn refresh(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        // The account may have been deleted since the token was issued
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        jwt_service.issue_pair(user_id).map_err(ApiError::Internal)
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into_profile())
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        let name = req
            .name
            .as_deref()
            .map(|name| required_text("Name", name))
            .transpose()
            .map_err(ApiError::Validation)?;

        let user = UserRepository::update_profile(pool, user_id, name.as_deref(), &req.profile)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
