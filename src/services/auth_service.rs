//! Authentication service: registration, login, token verification.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Password, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, hex encoded
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Registration input, already validated at the boundary
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role is fixed at registration; defaults to student
    pub role: Option<Role>,
}

/// Token plus the user it authenticates, returned by register/login
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Authentication operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, input: RegisterInput) -> AppResult<AuthPayload>;

    /// Login and return a JWT token
    async fn login(&self, email: String, password: String) -> AppResult<AuthPayload>;

    /// Verify a JWT token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id.to_hex(),
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

/// Concrete implementation backed by the identity store.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, input: RegisterInput) -> AppResult<AuthPayload> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = User::new(
            input.name,
            input.email,
            password_hash,
            input.role.unwrap_or(Role::Student),
        );
        self.users.insert(&user).await?;

        let token = generate_token(&user, &self.config)?;
        Ok(AuthPayload { token, user })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthPayload> {
        let user = self.users.find_by_email(&email).await?;

        // Verify against a dummy hash when the user does not exist, so
        // response timing cannot be used to enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored_hash = user
            .as_ref()
            .map(|u| u.password.as_str())
            .unwrap_or(dummy_hash);

        let password_valid = Password::from_hash(stored_hash.to_string()).verify(&password);

        let Some(user) = user else {
            return Err(AppError::InvalidCredentials);
        };
        if !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token(&user, &self.config)?;
        Ok(AuthPayload { token, user })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

impl Claims {
    /// Parse the subject back into an id.
    pub fn user_id(&self) -> AppResult<ObjectId> {
        ObjectId::parse_str(&self.sub).map_err(|_| AppError::Unauthorized)
    }
}
