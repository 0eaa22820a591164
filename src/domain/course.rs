//! Course domain entity and related types.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{DEFAULT_DURATION_MINUTES, DEFAULT_THUMBNAIL};

/// Course difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Beginner
    }
}

/// Aggregate rating, derived from `reviews`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub average: f64,
    pub count: i64,
}

/// A single course review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub user: ObjectId,
    pub rating: i32,
    pub comment: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
}

/// Course document. Serialized shape matches the `courses` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub instructor: ObjectId,
    pub thumbnail: String,
    pub content: String,
    /// Duration in minutes
    pub duration: i64,
    pub level: Level,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Roster: ids of enrolled users
    #[serde(default)]
    pub enrolled: Vec<ObjectId>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub is_published: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Build a new course owned by `instructor` from validated input
    pub fn new(instructor: ObjectId, input: CreateCourse) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            instructor,
            thumbnail: input
                .thumbnail
                .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string()),
            content: input.content,
            duration: input.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
            level: input.level.unwrap_or_default(),
            category: input.category,
            tags: input.tags.unwrap_or_default(),
            enrolled: Vec::new(),
            rating: Rating::default(),
            reviews: Vec::new(),
            is_published: input.is_published.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a review and synchronously recompute the aggregate rating.
    ///
    /// The aggregate is always derived from `reviews`; it is never
    /// adjusted incrementally, so the two cannot drift.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.recompute_rating();
        self.updated_at = Utc::now();
    }

    /// Recompute `rating` from the full review list
    pub fn recompute_rating(&mut self) {
        let count = self.reviews.len() as i64;
        let average = if count == 0 {
            0.0
        } else {
            let sum: i64 = self.reviews.iter().map(|r| i64::from(r.rating)).sum();
            sum as f64 / count as f64
        };
        self.rating = Rating { average, count };
    }

    pub fn has_student(&self, user_id: &ObjectId) -> bool {
        self.enrolled.contains(user_id)
    }
}

/// Course creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    #[validate(length(min = 1, message = "Course title is required"))]
    #[schema(example = "Rust for Backend Engineers")]
    pub title: String,
    #[validate(length(min = 1, message = "Course description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Course content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "Course category is required"))]
    #[schema(example = "programming")]
    pub category: String,
    pub thumbnail: Option<String>,
    /// Duration in minutes (defaults to 60)
    pub duration: Option<i64>,
    pub level: Option<Level>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// Course update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    #[validate(length(min = 1, message = "Course title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Course description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Course content cannot be empty"))]
    pub content: Option<String>,
    #[validate(length(min = 1, message = "Course category cannot be empty"))]
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<i64>,
    pub level: Option<Level>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// Review submission payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "Review comment is required"))]
    pub comment: String,
}

/// Review as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub user: String,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            user: review.user.to_hex(),
            rating: review.rating,
            comment: review.comment.clone(),
            date: review.date,
        }
    }
}

/// Course as returned to clients (ids rendered as hex strings)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[schema(example = "650c5f1a2ab5e7a1dcd3b2f4")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub thumbnail: String,
    pub content: String,
    pub duration: i64,
    pub level: Level,
    pub category: String,
    pub tags: Vec<String>,
    pub enrolled: Vec<String>,
    pub enrolled_count: usize,
    pub rating: Rating,
    pub reviews: Vec<ReviewResponse>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.to_hex(),
            title: course.title,
            description: course.description,
            instructor: course.instructor.to_hex(),
            thumbnail: course.thumbnail,
            content: course.content,
            duration: course.duration,
            level: course.level,
            category: course.category,
            tags: course.tags,
            enrolled_count: course.enrolled.len(),
            enrolled: course.enrolled.iter().map(|id| id.to_hex()).collect(),
            rating: course.rating,
            reviews: course.reviews.iter().map(ReviewResponse::from).collect(),
            is_published: course.is_published,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course::new(
            ObjectId::new(),
            CreateCourse {
                title: "T".into(),
                description: "D".into(),
                content: "C".into(),
                category: "cat".into(),
                thumbnail: None,
                duration: None,
                level: None,
                tags: None,
                is_published: None,
            },
        )
    }

    #[test]
    fn defaults_match_the_schema() {
        let c = course();
        assert_eq!(c.duration, 60);
        assert_eq!(c.level, Level::Beginner);
        assert_eq!(c.thumbnail, DEFAULT_THUMBNAIL);
        assert!(!c.is_published);
        assert_eq!(c.rating.count, 0);
    }

    #[test]
    fn rating_is_recomputed_from_reviews() {
        let mut c = course();
        for rating in [5, 4, 3] {
            c.add_review(Review {
                user: ObjectId::new(),
                rating,
                comment: "ok".into(),
                date: Utc::now(),
            });
        }
        assert_eq!(c.rating.count, 3);
        assert!((c.rating.average - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_reviews_yield_zero_rating() {
        let mut c = course();
        c.recompute_rating();
        assert_eq!(c.rating.count, 0);
        assert_eq!(c.rating.average, 0.0);
    }
}
