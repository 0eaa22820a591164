//! User service: profile lookup and admin listing.

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;

use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: ObjectId) -> AppResult<User>;

    /// Every registered user (admin only, enforced at the route)
    async fn list_users(&self) -> AppResult<Vec<User>>;
}

pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: ObjectId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }
}
