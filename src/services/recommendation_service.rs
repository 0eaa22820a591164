//! Catalog-grounded course recommendations.
//!
//! The completion model is never asked an open question: every call
//! carries the current published catalog in the system prompt and
//! instructs the model to recommend only from it, citing course ids.
//! Every invocation, successful or not, is recorded in the usage log.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use crate::config::{GROUNDING_SNIPPET_CHARS, RECOMMENDATION_ENDPOINT};
use crate::domain::Course;
use crate::errors::{AppError, AppResult};
use crate::infra::{ApiLogEntry, ApiLogRepository, CompletionClient, CourseRepository, UsageStats};

const EMPTY_CATALOG_MESSAGE: &str =
    "There are no published courses available yet, so I cannot recommend any. \
     Please check back once courses have been added.";

/// A produced recommendation
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub recommendations: String,
    pub tokens_used: i64,
}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Produce recommendations for `prompt`, grounded in the published
    /// catalog.
    async fn recommend(&self, caller_id: ObjectId, prompt: String) -> AppResult<Recommendation>;

    /// Platform-wide usage totals
    async fn usage_stats(&self) -> AppResult<UsageStats>;

    /// Usage totals for one caller
    async fn user_usage(&self, user_id: ObjectId) -> AppResult<UsageStats>;
}

pub struct Recommender {
    courses: Arc<dyn CourseRepository>,
    logs: Arc<dyn ApiLogRepository>,
    llm: Option<Arc<dyn CompletionClient>>,
}

impl Recommender {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        logs: Arc<dyn ApiLogRepository>,
        llm: Option<Arc<dyn CompletionClient>>,
    ) -> Self {
        Self {
            courses,
            logs,
            llm,
        }
    }

    async fn log_invocation(
        &self,
        caller_id: ObjectId,
        prompt: &str,
        started: Instant,
        outcome: &AppResult<Recommendation>,
    ) {
        let entry = ApiLogEntry {
            endpoint: RECOMMENDATION_ENDPOINT.to_string(),
            user_id: caller_id,
            prompt: prompt.to_string(),
            tokens_used: outcome.as_ref().map(|r| r.tokens_used).unwrap_or(0),
            request_time: started.elapsed().as_millis() as i64,
            success: outcome.is_ok(),
            error_message: outcome
                .as_ref()
                .err()
                .map(ToString::to_string)
                .unwrap_or_default(),
            created_at: Utc::now(),
        };
        // A log write failure must never change the caller's outcome
        if let Err(e) = self.logs.append(entry).await {
            tracing::error!(error = %e, "failed to record usage-log entry");
        }
    }

    async fn produce(&self, prompt: &str) -> AppResult<Recommendation> {
        let catalog = self.courses.list_published().await?;
        if catalog.is_empty() {
            // Nothing to ground on: answer locally, no upstream call
            return Ok(Recommendation {
                recommendations: EMPTY_CATALOG_MESSAGE.to_string(),
                tokens_used: 0,
            });
        }

        let llm = self
            .llm
            .as_ref()
            .ok_or(AppError::NotConfigured("completion service"))?;

        let system_prompt = grounding_prompt(&catalog);
        let completion = llm.complete(&system_prompt, prompt).await?;
        Ok(Recommendation {
            recommendations: completion.text,
            tokens_used: completion.tokens_used,
        })
    }
}

/// System prompt carrying the full published catalog. Each course line
/// includes its id so answers can cite real courses.
fn grounding_prompt(catalog: &[Course]) -> String {
    let mut prompt = String::from(
        "You are a course advisor for an online learning platform. \
         Recommend 3 to 5 courses ONLY from the catalog below. Refer to \
         each recommended course by its title and include its ID in the \
         form (ID: <id>). If nothing in the catalog fits, say so instead \
         of inventing courses.\n\nCatalog:\n",
    );
    for course in catalog {
        prompt.push_str(&format!(
            "- (ID: {}) {} [{}/{}]: {}\n",
            course.id.to_hex(),
            course.title,
            course.level.as_str(),
            course.category,
            snippet(&course.description, GROUNDING_SNIPPET_CHARS),
        ));
    }
    prompt
}

/// Truncate on a char boundary, appending an ellipsis when cut
fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[async_trait]
impl RecommendationService for Recommender {
    async fn recommend(&self, caller_id: ObjectId, prompt: String) -> AppResult<Recommendation> {
        let started = Instant::now();
        let outcome = self.produce(&prompt).await;
        self.log_invocation(caller_id, &prompt, started, &outcome)
            .await;
        outcome
    }

    async fn usage_stats(&self) -> AppResult<UsageStats> {
        self.logs.usage_stats().await
    }

    async fn user_usage(&self, user_id: ObjectId) -> AppResult<UsageStats> {
        self.logs.user_usage(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateCourse;

    fn course(title: &str, description: &str) -> Course {
        Course::new(
            ObjectId::new(),
            CreateCourse {
                title: title.into(),
                description: description.into(),
                content: "c".into(),
                category: "programming".into(),
                thumbnail: None,
                duration: None,
                level: None,
                tags: None,
                is_published: Some(true),
            },
        )
    }

    #[test]
    fn grounding_prompt_cites_course_ids() {
        let c = course("Rust Basics", "Learn Rust from scratch");
        let prompt = grounding_prompt(std::slice::from_ref(&c));
        assert!(prompt.contains(&format!("(ID: {})", c.id.to_hex())));
        assert!(prompt.contains("Rust Basics"));
        assert!(prompt.contains("[beginner/programming]"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "x".repeat(500);
        let c = course("T", &long);
        let prompt = grounding_prompt(std::slice::from_ref(&c));
        assert!(!prompt.contains(&long));
        assert!(prompt.contains(&format!("{}...", "x".repeat(GROUNDING_SNIPPET_CHARS))));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        assert_eq!(snippet("héllo", 10), "héllo");
        assert_eq!(snippet("ééééé", 3), "ééé...");
    }
}
