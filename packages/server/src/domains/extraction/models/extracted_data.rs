use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{Company, Person};
use crate::common::{ExtractedDataId, PageRequest};
use crate::error::{ExtractionError, Result};

const COLUMNS: &str = "id, url, people, companies, created_at, updated_at";

/// What the model returns for one page.
///
/// Both lists are required in the completion; unknown keys are rejected so a
/// response that drifts from the schema surfaces as a malformed extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractedEntities {
    /// Companies mentioned on the page
    pub companies: Vec<Company>,

    /// People mentioned on the page
    pub people: Vec<Person>,
}

/// One persisted extraction run for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtractedData {
    pub id: ExtractedDataId,
    pub url: String,
    #[sqlx(json)]
    pub people: Vec<Person>,
    #[sqlx(json)]
    pub companies: Vec<Company>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExtractedData {
    pub url: String,
    pub people: Vec<Person>,
    pub companies: Vec<Company>,
}

impl NewExtractedData {
    pub fn from_entities(url: impl Into<String>, entities: ExtractedEntities) -> Self {
        Self {
            url: url.into(),
            people: entities.people,
            companies: entities.companies,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ExtractionError::invalid_argument("url must not be empty"));
        }
        Ok(())
    }
}

/// History filter. Empty url and `None` bounds mean "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDataSearch {
    pub url: String,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ExtractedDataSearch {
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.limit = Some(page.limit());
        self.offset = page.offset();
        self
    }

    /// Whether `record` passes the url and date filters (pagination aside).
    pub fn matches(&self, record: &ExtractedData) -> bool {
        (self.url.is_empty() || record.url == self.url)
            && self.created_at_from.map_or(true, |from| record.created_at >= from)
            && self.created_at_to.map_or(true, |to| record.created_at <= to)
    }
}

impl ExtractedData {
    /// Insert a new run. The database stamps `created_at` and `updated_at`.
    pub async fn insert(new: &NewExtractedData, pool: &PgPool) -> Result<Self> {
        new.validate()?;

        let record = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO extracted_data (url, people, companies)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new.url)
        .bind(Json(&new.people))
        .bind(Json(&new.companies))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Most recent run for `url`, if any.
    pub async fn find_latest_by_url(url: &str, pool: &PgPool) -> Result<Option<Self>> {
        if url.trim().is_empty() {
            return Err(ExtractionError::invalid_argument("url must not be empty"));
        }

        let record = sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM extracted_data
            WHERE url = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(url)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(id: ExtractedDataId, pool: &PgPool) -> Result<Option<Self>> {
        if id.is_unset() {
            return Err(ExtractionError::invalid_argument("id must be set"));
        }

        let record = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM extracted_data WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Runs matching `search`, newest first.
    pub async fn search(search: &ExtractedDataSearch, pool: &PgPool) -> Result<Vec<Self>> {
        let records = sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM extracted_data
            WHERE ($1 = '' OR url = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            OFFSET $5
            "#
        ))
        .bind(&search.url)
        .bind(search.created_at_from)
        .bind(search.created_at_to)
        .bind(search.limit)
        .bind(search.offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Replace the entities of an existing run and bump `updated_at`.
    pub async fn update_entities(
        id: ExtractedDataId,
        entities: &ExtractedEntities,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        if id.is_unset() {
            return Err(ExtractionError::invalid_argument("id must be set"));
        }

        let record = sqlx::query_as::<_, Self>(&format!(
            r#"
            UPDATE extracted_data
            SET people = $2, companies = $3, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(&entities.people))
        .bind(Json(&entities.companies))
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
