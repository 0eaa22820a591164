//! API usage log: append-only records of recommendation-proxy calls.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppResult;
use crate::infra::Database;

#[cfg(feature = "test-utils")]
use mockall::automock;

/// Name of the usage-log collection
pub const APILOGS_COLLECTION: &str = "apilogs";

/// One logged invocation of an external API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLogEntry {
    pub endpoint: String,
    pub user_id: ObjectId,
    pub prompt: String,
    pub tokens_used: i64,
    /// Wall-clock latency in milliseconds
    pub request_time: i64,
    pub success: bool,
    pub error_message: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Aggregated usage numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub total_tokens: i64,
    pub request_count: i64,
}

#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait ApiLogRepository: Send + Sync {
    async fn append(&self, entry: ApiLogEntry) -> AppResult<()>;

    /// Platform-wide totals across all callers.
    async fn usage_stats(&self) -> AppResult<UsageStats>;

    /// Totals for a single caller.
    async fn user_usage(&self, user_id: ObjectId) -> AppResult<UsageStats>;
}

/// Concrete Mongo-backed implementation
pub struct ApiLogStore {
    logs: Collection<ApiLogEntry>,
}

impl ApiLogStore {
    pub fn new(db: &Database) -> Self {
        Self {
            logs: db.collection(APILOGS_COLLECTION),
        }
    }

    async fn aggregate_usage(&self, filter: Option<bson::Document>) -> AppResult<UsageStats> {
        let mut pipeline = Vec::new();
        if let Some(filter) = filter {
            pipeline.push(doc! { "$match": filter });
        }
        pipeline.push(doc! {
            "$group": {
                "_id": null,
                "totalTokens": { "$sum": "$tokensUsed" },
                "requestCount": { "$sum": 1 },
            }
        });

        let mut cursor = self.logs.aggregate(pipeline, None).await?;
        let Some(row) = cursor.try_next().await? else {
            return Ok(UsageStats::default());
        };

        Ok(UsageStats {
            total_tokens: row
                .get_i64("totalTokens")
                .or_else(|_| row.get_i32("totalTokens").map(i64::from))
                .unwrap_or(0),
            request_count: row
                .get_i64("requestCount")
                .or_else(|_| row.get_i32("requestCount").map(i64::from))
                .unwrap_or(0),
        })
    }
}

#[async_trait]
impl ApiLogRepository for ApiLogStore {
    async fn append(&self, entry: ApiLogEntry) -> AppResult<()> {
        self.logs.insert_one(entry, None).await?;
        Ok(())
    }

    async fn usage_stats(&self) -> AppResult<UsageStats> {
        self.aggregate_usage(None).await
    }

    async fn user_usage(&self, user_id: ObjectId) -> AppResult<UsageStats> {
        self.aggregate_usage(Some(doc! { "userId": user_id })).await
    }
}
