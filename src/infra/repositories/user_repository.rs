//! User repository: Mongo-backed access to the `users` collection.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::Collection;

use crate::domain::User;
use crate::errors::AppResult;
use crate::infra::Database;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Name of the users collection
pub const USERS_COLLECTION: &str = "users";

/// Identity-store access used by the auth and enrollment flows.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> AppResult<()>;

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<User>>;

    /// Atomically add a course to `enrolledCourses` iff it is absent.
    ///
    /// Returns `false` when the user was already enrolled (or does not
    /// exist); the membership check and the add are a single
    /// conditional update, so concurrent enrolls cannot both pass.
    async fn add_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool>;

    /// Remove a course from `enrolledCourses`. Returns `true` if the
    /// user was enrolled.
    async fn remove_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool>;

    async fn add_created_course(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<()>;

    async fn remove_created_course(&self, user_id: ObjectId, course_id: ObjectId)
        -> AppResult<()>;

    /// Pull a deleted course out of every user's `enrolledCourses`.
    /// Returns the number of users touched.
    async fn remove_course_from_all(&self, course_id: ObjectId) -> AppResult<u64>;
}

/// Concrete Mongo-backed implementation
pub struct UserStore {
    users: Collection<User>,
}

impl UserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let cursor = self.users.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<User>> {
        let cursor = self
            .users
            .find(doc! { "_id": { "$in": ids } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool> {
        let result = self
            .users
            .update_one(
                // The $ne guard makes check-and-add one atomic update
                doc! { "_id": user_id, "enrolledCourses": { "$ne": course_id } },
                doc! {
                    "$addToSet": { "enrolledCourses": course_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn remove_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool> {
        let result = self
            .users
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$pull": { "enrolledCourses": course_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn add_created_course(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<()> {
        self.users
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$addToSet": { "createdCourses": course_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(())
    }

    async fn remove_created_course(
        &self,
        user_id: ObjectId,
        course_id: ObjectId,
    ) -> AppResult<()> {
        self.users
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$pull": { "createdCourses": course_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(())
    }

    async fn remove_course_from_all(&self, course_id: ObjectId) -> AppResult<u64> {
        let result = self
            .users
            .update_many(
                doc! { "enrolledCourses": course_id },
                doc! { "$pull": { "enrolledCourses": course_id } },
                None,
            )
            .await?;
        Ok(result.modified_count)
    }
}
