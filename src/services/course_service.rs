//! Course catalog service: listing, search, CRUD and reviews.
//!
//! Filter construction is pure and lives here; repositories only
//! execute the documents this module builds.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::domain::{
    require_owner_or_role, Course, CreateCourse, CreateReview, Review, Role, UpdateCourse,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{CourseRepository, UserRepository};
use crate::types::{PagePlan, Paginated};

/// Catalog query parameters. Every field is optional; absent fields
/// impose no constraint. Unknown category or level values match no
/// documents rather than failing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CourseQuery {
    /// Exact category match
    pub category: Option<String>,
    /// Exact level match (beginner, intermediate, advanced)
    pub level: Option<String>,
    /// Free-text search over title, description, category and tags
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl CourseQuery {
    pub fn plan(&self) -> PagePlan {
        PagePlan::from_request(self.page, self.limit)
    }

    /// Trimmed search term, or `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Structural constraints shared by both search strategies
    fn base_filter(&self) -> Document {
        let mut filter = Document::new();
        if let Some(category) = self.category.as_deref() {
            filter.insert("category", category);
        }
        if let Some(level) = self.level.as_deref() {
            filter.insert("level", level);
        }
        filter
    }

    /// Filters for the public catalog. `isPublished: true` is always
    /// part of the predicate; callers cannot opt out of it.
    ///
    /// Returns the primary filter and, when a search term is present,
    /// the substring fallback used when the text query is unavailable
    /// or matches nothing.
    pub fn public_filters(&self) -> (Document, Option<Document>) {
        let mut primary = self.base_filter();
        primary.insert("isPublished", true);

        let Some(term) = self.search_term() else {
            return (primary, None);
        };

        let mut fallback = primary.clone();
        primary.insert("$text", doc! { "$search": term });
        fallback.insert("$or", substring_clauses(term));
        (primary, Some(fallback))
    }
}

/// Case-insensitive substring predicates over the searchable fields,
/// with regex metacharacters escaped so user input stays literal.
fn substring_clauses(term: &str) -> Vec<Document> {
    let pattern = regex::escape(term);
    ["title", "description", "category", "tags"]
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(
                *field,
                doc! { "$regex": pattern.as_str(), "$options": "i" },
            );
            clause
        })
        .collect()
}

/// Build the `$set` document for a partial course update. Absent
/// fields are omitted and therefore untouched.
fn update_document(input: &UpdateCourse) -> AppResult<Document> {
    let mut set = Document::new();
    if let Some(title) = input.title.as_deref() {
        set.insert("title", title);
    }
    if let Some(description) = input.description.as_deref() {
        set.insert("description", description);
    }
    if let Some(content) = input.content.as_deref() {
        set.insert("content", content);
    }
    if let Some(category) = input.category.as_deref() {
        set.insert("category", category);
    }
    if let Some(thumbnail) = input.thumbnail.as_deref() {
        set.insert("thumbnail", thumbnail);
    }
    if let Some(duration) = input.duration {
        set.insert("duration", duration);
    }
    if let Some(level) = input.level {
        set.insert("level", level.as_str());
    }
    if let Some(tags) = &input.tags {
        set.insert("tags", bson::to_bson(tags)?);
    }
    if let Some(is_published) = input.is_published {
        set.insert("isPublished", is_published);
    }
    Ok(set)
}

/// Course catalog operations.
#[async_trait]
pub trait CourseService: Send + Sync {
    /// Published courses matching the query, paginated
    async fn list_public(&self, query: CourseQuery) -> AppResult<Paginated<Course>>;

    async fn get_course(&self, id: ObjectId) -> AppResult<Course>;

    /// Create a course owned by `instructor`
    async fn create_course(&self, instructor: ObjectId, input: CreateCourse) -> AppResult<Course>;

    /// Partially update a course. Only the owning instructor or an
    /// admin may update.
    async fn update_course(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
        input: UpdateCourse,
    ) -> AppResult<Course>;

    /// All courses owned by `instructor`, including drafts
    async fn instructor_courses(&self, instructor: ObjectId) -> AppResult<Vec<Course>>;

    /// Add a review from an enrolled student and recompute the rating
    async fn add_review(
        &self,
        caller_id: ObjectId,
        course_id: ObjectId,
        input: CreateReview,
    ) -> AppResult<Course>;
}

pub struct CourseCatalog {
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
}

impl CourseCatalog {
    pub fn new(courses: Arc<dyn CourseRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { courses, users }
    }

    /// Run the `$text` search, retrying with the substring filter when
    /// the text index is missing or the text query matches nothing.
    /// Word stemming makes `$text` miss partial-word terms; the
    /// substring pass catches those.
    async fn search_with_fallback(
        &self,
        primary: Document,
        fallback: Option<Document>,
        plan: PagePlan,
    ) -> AppResult<(Vec<Course>, u64)> {
        let result = self.courses.search(primary, plan).await;
        let fallback = match (&result, fallback) {
            (Ok((_, 0)), Some(fallback)) => {
                tracing::debug!("text search matched nothing, retrying as substring search");
                fallback
            }
            (Err(e), Some(fallback)) if e.is_missing_text_index() => {
                tracing::warn!("text index unavailable, falling back to substring search");
                fallback
            }
            _ => return result,
        };
        self.courses.search(fallback, plan).await
    }
}

#[async_trait]
impl CourseService for CourseCatalog {
    async fn list_public(&self, query: CourseQuery) -> AppResult<Paginated<Course>> {
        let plan = query.plan();
        let (primary, fallback) = query.public_filters();
        let (items, total) = self.search_with_fallback(primary, fallback, plan).await?;
        Ok(Paginated::new(items, plan, total))
    }

    async fn get_course(&self, id: ObjectId) -> AppResult<Course> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Course"))
    }

    async fn create_course(&self, instructor: ObjectId, input: CreateCourse) -> AppResult<Course> {
        let course = Course::new(instructor, input);
        self.courses.insert(&course).await?;
        self.users.add_created_course(instructor, course.id).await?;
        Ok(course)
    }

    async fn update_course(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
        input: UpdateCourse,
    ) -> AppResult<Course> {
        let course = self.get_course(course_id).await?;
        require_owner_or_role(&caller_id, caller_role, &course.instructor, &[Role::Admin])?;

        let set = update_document(&input)?;
        if set.is_empty() {
            return Ok(course);
        }
        self.courses
            .update_fields(course_id, set)
            .await?
            .ok_or(AppError::NotFound("Course"))
    }

    async fn instructor_courses(&self, instructor: ObjectId) -> AppResult<Vec<Course>> {
        self.courses.find_by_instructor(instructor).await
    }

    async fn add_review(
        &self,
        caller_id: ObjectId,
        course_id: ObjectId,
        input: CreateReview,
    ) -> AppResult<Course> {
        let mut course = self.get_course(course_id).await?;
        if !course.has_student(&caller_id) {
            return Err(AppError::Forbidden);
        }

        let review = Review {
            user: caller_id,
            rating: input.rating,
            comment: input.comment,
            date: Utc::now(),
        };
        course.add_review(review.clone());
        self.courses
            .push_review(course_id, review, course.rating.clone())
            .await?;
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_filter_always_requires_published() {
        let (primary, fallback) = CourseQuery::default().public_filters();
        assert_eq!(primary.get_bool("isPublished"), Ok(true));
        assert!(fallback.is_none());

        let query = CourseQuery {
            search: Some("rust".into()),
            ..Default::default()
        };
        let (primary, fallback) = query.public_filters();
        assert_eq!(primary.get_bool("isPublished"), Ok(true));
        assert_eq!(
            fallback.and_then(|f| f.get_bool("isPublished").ok()),
            Some(true)
        );
    }

    #[test]
    fn category_and_level_are_exact_matches() {
        let query = CourseQuery {
            category: Some("design".into()),
            level: Some("advanced".into()),
            ..Default::default()
        };
        let (primary, _) = query.public_filters();
        assert_eq!(primary.get_str("category"), Ok("design"));
        assert_eq!(primary.get_str("level"), Ok("advanced"));
    }

    #[test]
    fn search_builds_text_query_with_substring_fallback() {
        let query = CourseQuery {
            search: Some("  rust async  ".into()),
            ..Default::default()
        };
        let (primary, fallback) = query.public_filters();
        let text = primary.get_document("$text").unwrap();
        assert_eq!(text.get_str("$search"), Ok("rust async"));

        let fallback = fallback.unwrap();
        let clauses = fallback.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 4);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = CourseQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        let (primary, fallback) = query.public_filters();
        assert!(!primary.contains_key("$text"));
        assert!(fallback.is_none());
    }

    #[test]
    fn fallback_escapes_regex_metacharacters() {
        let clauses = substring_clauses("c++ (intro)");
        let first = clauses[0].get_document("title").unwrap();
        let pattern = first.get_str("$regex").unwrap();
        assert!(pattern.contains(r"c\+\+"));
        assert_eq!(first.get_str("$options"), Ok("i"));
    }

    #[test]
    fn update_document_only_includes_present_fields() {
        let set = update_document(&UpdateCourse {
            title: Some("New title".into()),
            is_published: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(set.get_str("title"), Ok("New title"));
        assert_eq!(set.get_bool("isPublished"), Ok(true));
        assert!(!set.contains_key("description"));
        assert!(!set.contains_key("level"));
    }

    #[test]
    fn empty_update_produces_empty_document() {
        let set = update_document(&UpdateCourse::default()).unwrap();
        assert!(set.is_empty());
    }
}
