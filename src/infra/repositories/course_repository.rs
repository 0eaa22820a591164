//! Course repository: Mongo-backed access to the `courses` collection.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::{options::FindOptions, Collection};

use crate::domain::{Course, Rating, Review};
use crate::errors::AppResult;
use crate::infra::Database;
use crate::types::PagePlan;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Name of the courses collection
pub const COURSES_COLLECTION: &str = "courses";

/// Course-store access. Filter documents are built by the query
/// builder in the service layer; this trait only executes them.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert(&self, course: &Course) -> AppResult<()>;

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Course>>;

    /// Run a paginated search: newest first, `total` counted over the
    /// whole predicate ignoring skip/limit.
    async fn search(&self, filter: Document, plan: PagePlan) -> AppResult<(Vec<Course>, u64)>;

    /// All courses owned by an instructor, newest first, regardless of
    /// published state.
    async fn find_by_instructor(&self, instructor: ObjectId) -> AppResult<Vec<Course>>;

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<Course>>;

    /// Every published course (recommendation grounding catalog).
    async fn list_published(&self) -> AppResult<Vec<Course>>;

    /// Apply a partial update; returns the updated course, or `None`
    /// if it no longer exists.
    async fn update_fields(&self, id: ObjectId, update: Document) -> AppResult<Option<Course>>;

    /// Delete a course record. Returns `true` if a record was removed.
    async fn delete(&self, id: ObjectId) -> AppResult<bool>;

    /// Atomically add a user to the course roster iff absent.
    async fn add_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool>;

    async fn remove_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool>;

    /// Persist a new review together with the recomputed aggregate.
    async fn push_review(
        &self,
        course_id: ObjectId,
        review: Review,
        rating: Rating,
    ) -> AppResult<()>;
}

/// Concrete Mongo-backed implementation
pub struct CourseStore {
    courses: Collection<Course>,
}

impl CourseStore {
    pub fn new(db: &Database) -> Self {
        Self {
            courses: db.collection(COURSES_COLLECTION),
        }
    }
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn insert(&self, course: &Course) -> AppResult<()> {
        self.courses.insert_one(course, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Course>> {
        Ok(self.courses.find_one(doc! { "_id": id }, None).await?)
    }

    async fn search(&self, filter: Document, plan: PagePlan) -> AppResult<(Vec<Course>, u64)> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .skip(plan.skip())
            .limit(plan.limit as i64)
            .build();

        let cursor = self.courses.find(filter.clone(), options).await?;
        let items: Vec<Course> = cursor.try_collect().await?;
        // Count ignores skip/limit so totalPages stays stable per page
        let total = self.courses.count_documents(filter, None).await?;
        Ok((items, total))
    }

    async fn find_by_instructor(&self, instructor: ObjectId) -> AppResult<Vec<Course>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self
            .courses
            .find(doc! { "instructor": instructor }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<Course>> {
        let cursor = self
            .courses
            .find(doc! { "_id": { "$in": ids } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_published(&self) -> AppResult<Vec<Course>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self
            .courses
            .find(doc! { "isPublished": true }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_fields(&self, id: ObjectId, update: Document) -> AppResult<Option<Course>> {
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .courses
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update, "$currentDate": { "updatedAt": true } },
                options,
            )
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        let result = self.courses.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn add_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool> {
        let result = self
            .courses
            .update_one(
                doc! { "_id": course_id, "enrolled": { "$ne": user_id } },
                doc! {
                    "$addToSet": { "enrolled": user_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn remove_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool> {
        let result = self
            .courses
            .update_one(
                doc! { "_id": course_id },
                doc! {
                    "$pull": { "enrolled": user_id },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn push_review(
        &self,
        course_id: ObjectId,
        review: Review,
        rating: Rating,
    ) -> AppResult<()> {
        self.courses
            .update_one(
                doc! { "_id": course_id },
                doc! {
                    "$push": { "reviews": bson::to_bson(&review)? },
                    "$set": { "rating": bson::to_bson(&rating)? },
                    "$currentDate": { "updatedAt": true },
                },
                None,
            )
            .await?;
        Ok(())
    }
}
