//! SQLite storage implementation.
//!
//! A file-based backend covering every storage trait. Good for:
//! - Local development
//! - Single-operator harvest runs
//! - Testing with persistent data
//!
//! Requires the `sqlite` feature.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{HarvestError, Result};
use crate::traits::{
    AuditStore, ContentStore, DocumentStore, EntityStore, LinkStore, UpsertOutcome,
};
use crate::types::{
    AuditRecord, AuthorityLevel, ContentEntity, DiscoveredLink, DocumentType, EntitySource,
    Grade, Intervention, LinkStatus, ProcessingStatus, RawContent, ReviewStatus, SourceDocument,
    SourceKind,
};

/// SQLite-backed harvest store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite:harvest.db?mode=rwc` - File, created if missing
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(HarvestError::storage)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS discovered_links (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                discovered_from TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                priority INTEGER NOT NULL,
                jurisdiction_hint TEXT,
                error_message TEXT,
                discovered_at TEXT NOT NULL,
                scraped_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_links_status_priority
                ON discovered_links(status, priority);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS raw_content (
                id TEXT PRIMARY KEY,
                source_url TEXT NOT NULL,
                source_kind TEXT NOT NULL,
                body TEXT NOT NULL,
                content_hash TEXT NOT NULL UNIQUE,
                file_path TEXT,
                file_size_bytes INTEGER,
                page_count INTEGER,
                extraction_method TEXT NOT NULL,
                word_count INTEGER NOT NULL,
                processing_status TEXT NOT NULL DEFAULT 'pending',
                fetched_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS source_documents (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                document_type TEXT NOT NULL,
                source_url TEXT NOT NULL UNIQUE,
                organization TEXT,
                jurisdiction TEXT,
                authority_level TEXT NOT NULL,
                file_path TEXT,
                page_count INTEGER,
                downloaded_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interventions (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                kind TEXT NOT NULL,
                geography TEXT NOT NULL DEFAULT '[]',
                target_cohort TEXT NOT NULL DEFAULT '[]',
                consent_level TEXT NOT NULL,
                review_status TEXT NOT NULL,
                permitted_uses TEXT NOT NULL DEFAULT '[]',
                source_url TEXT NOT NULL,
                source_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_interventions_name
                ON interventions(name COLLATE NOCASE);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entity_sources (
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                source_document_id TEXT NOT NULL,
                page_numbers TEXT,
                section_reference TEXT,
                citation_context TEXT,
                PRIMARY KEY (entity_type, entity_id, source_document_id)
            );

            CREATE TABLE IF NOT EXISTS content_entities (
                raw_content_id TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                extraction_method TEXT NOT NULL,
                extraction_confidence REAL NOT NULL,
                PRIMARY KEY (raw_content_id, entity_type, entity_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_trail (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                data_fingerprint TEXT NOT NULL,
                source_url TEXT,
                score INTEGER NOT NULL,
                grade TEXT NOT NULL,
                issues TEXT NOT NULL DEFAULT '[]',
                scraper_name TEXT NOT NULL,
                data_type TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(HarvestError::storage)
}

fn parse_datetime(s: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(HarvestError::storage)
}

// Row types for sqlx queries

#[derive(Debug, FromRow)]
struct LinkRow {
    id: String,
    url: String,
    discovered_from: String,
    status: String,
    priority: i64,
    jurisdiction_hint: Option<String>,
    error_message: Option<String>,
    discovered_at: String,
    scraped_at: Option<String>,
}

impl LinkRow {
    fn into_link(self) -> Result<DiscoveredLink> {
        Ok(DiscoveredLink {
            id: parse_uuid(&self.id)?,
            url: self.url,
            discovered_from: self.discovered_from,
            status: LinkStatus::parse(&self.status)
                .ok_or_else(|| HarvestError::storage_msg(format!("bad status: {}", self.status)))?,
            priority: self.priority as i32,
            jurisdiction_hint: self.jurisdiction_hint,
            error_message: self.error_message,
            discovered_at: parse_datetime(&self.discovered_at)?,
            scraped_at: self.scraped_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ContentRow {
    id: String,
    source_url: String,
    source_kind: String,
    body: String,
    content_hash: String,
    file_path: Option<String>,
    file_size_bytes: Option<i64>,
    page_count: Option<i64>,
    extraction_method: String,
    word_count: i64,
    processing_status: String,
    fetched_at: String,
}

impl ContentRow {
    fn into_content(self) -> Result<RawContent> {
        Ok(RawContent {
            id: parse_uuid(&self.id)?,
            source_url: self.source_url,
            source_kind: SourceKind::parse(&self.source_kind).ok_or_else(|| {
                HarvestError::storage_msg(format!("bad source kind: {}", self.source_kind))
            })?,
            body: self.body,
            content_hash: self.content_hash,
            file_path: self.file_path,
            file_size_bytes: self.file_size_bytes.map(|v| v as u64),
            page_count: self.page_count.map(|v| v as u32),
            extraction_method: self.extraction_method,
            word_count: self.word_count as u64,
            processing_status: ProcessingStatus::parse(&self.processing_status).ok_or_else(
                || {
                    HarvestError::storage_msg(format!(
                        "bad processing status: {}",
                        self.processing_status
                    ))
                },
            )?,
            fetched_at: parse_datetime(&self.fetched_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    title: String,
    document_type: String,
    source_url: String,
    organization: Option<String>,
    jurisdiction: Option<String>,
    authority_level: String,
    file_path: Option<String>,
    page_count: Option<i64>,
    downloaded_at: String,
}

impl DocumentRow {
    fn into_document(self) -> Result<SourceDocument> {
        Ok(SourceDocument {
            id: parse_uuid(&self.id)?,
            title: self.title,
            document_type: DocumentType::parse(&self.document_type).ok_or_else(|| {
                HarvestError::storage_msg(format!("bad document type: {}", self.document_type))
            })?,
            source_url: self.source_url,
            organization: self.organization,
            jurisdiction: self.jurisdiction,
            authority_level: AuthorityLevel::parse(&self.authority_level).ok_or_else(|| {
                HarvestError::storage_msg(format!(
                    "bad authority level: {}",
                    self.authority_level
                ))
            })?,
            file_path: self.file_path,
            page_count: self.page_count.map(|v| v as u32),
            downloaded_at: parse_datetime(&self.downloaded_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct InterventionRow {
    id: String,
    name: String,
    description: String,
    kind: String,
    geography: String,
    target_cohort: String,
    consent_level: String,
    review_status: String,
    permitted_uses: String,
    source_url: String,
    source_date: String,
}

impl InterventionRow {
    fn into_intervention(self) -> Result<Intervention> {
        Ok(Intervention {
            id: parse_uuid(&self.id)?,
            name: self.name,
            description: self.description,
            kind: self.kind,
            geography: serde_json::from_str(&self.geography)?,
            target_cohort: serde_json::from_str(&self.target_cohort)?,
            consent_level: self.consent_level,
            review_status: ReviewStatus::parse(&self.review_status).ok_or_else(|| {
                HarvestError::storage_msg(format!("bad review status: {}", self.review_status))
            })?,
            permitted_uses: serde_json::from_str(&self.permitted_uses)?,
            source_url: self.source_url,
            source_date: parse_datetime(&self.source_date)?,
        })
    }
}

#[async_trait]
impl LinkStore for SqliteStore {
    async fn insert_link(&self, link: &DiscoveredLink) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO discovered_links
                (id, url, discovered_from, status, priority, jurisdiction_hint, discovered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(link.id.to_string())
        .bind(&link.url)
        .bind(&link.discovered_from)
        .bind(link.status.as_str())
        .bind(link.priority)
        .bind(&link.jurisdiction_hint)
        .bind(link.discovered_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn pending_batch(
        &self,
        limit: usize,
        priority_ceiling: Option<i32>,
    ) -> Result<Vec<DiscoveredLink>> {
        let rows = match priority_ceiling {
            Some(ceiling) => {
                sqlx::query_as::<_, LinkRow>(
                    r#"
                    SELECT id, url, discovered_from, status, priority, jurisdiction_hint,
                           error_message, discovered_at, scraped_at
                    FROM discovered_links
                    WHERE status = 'pending' AND priority <= ?
                    ORDER BY priority DESC, discovered_at ASC
                    LIMIT ?
                    "#,
                )
                .bind(ceiling)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, LinkRow>(
                    r#"
                    SELECT id, url, discovered_from, status, priority, jurisdiction_hint,
                           error_message, discovered_at, scraped_at
                    FROM discovered_links
                    WHERE status = 'pending'
                    ORDER BY priority DESC, discovered_at ASC
                    LIMIT ?
                    "#,
                )
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(HarvestError::storage)?;

        rows.into_iter().map(|r| r.into_link()).collect()
    }

    async fn mark_link(&self, id: Uuid, status: LinkStatus, error: Option<String>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE discovered_links
            SET status = ?, error_message = ?, scraped_at = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(&error)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    async fn count_pending(&self) -> Result<usize> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM discovered_links WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(HarvestError::storage)?;

        Ok(count.0 as usize)
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn upsert_content(&self, content: &RawContent) -> Result<UpsertOutcome> {
        // check-then-insert as a single conditional upsert so concurrent
        // fetches of identical bytes cannot race into duplicate rows
        let result = sqlx::query(
            r#"
            INSERT INTO raw_content
                (id, source_url, source_kind, body, content_hash, file_path,
                 file_size_bytes, page_count, extraction_method, word_count,
                 processing_status, fetched_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(content_hash) DO NOTHING
            "#,
        )
        .bind(content.id.to_string())
        .bind(&content.source_url)
        .bind(content.source_kind.as_str())
        .bind(&content.body)
        .bind(&content.content_hash)
        .bind(&content.file_path)
        .bind(content.file_size_bytes.map(|v| v as i64))
        .bind(content.page_count.map(|v| v as i64))
        .bind(&content.extraction_method)
        .bind(content.word_count as i64)
        .bind(content.processing_status.as_str())
        .bind(content.fetched_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        if result.rows_affected() > 0 {
            return Ok(UpsertOutcome {
                id: content.id,
                created: true,
            });
        }

        let (id,): (String,) =
            sqlx::query_as("SELECT id FROM raw_content WHERE content_hash = ?")
                .bind(&content.content_hash)
                .fetch_one(&self.pool)
                .await
                .map_err(HarvestError::storage)?;

        Ok(UpsertOutcome {
            id: parse_uuid(&id)?,
            created: false,
        })
    }

    async fn get_content(&self, id: Uuid) -> Result<Option<RawContent>> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT id, source_url, source_kind, body, content_hash, file_path,
                   file_size_bytes, page_count, extraction_method, word_count,
                   processing_status, fetched_at
            FROM raw_content WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        match row {
            Some(r) => Ok(Some(r.into_content()?)),
            None => Ok(None),
        }
    }

    async fn complete_content(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE raw_content SET processing_status = 'completed' WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(HarvestError::storage)?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn upsert_document(&self, document: &SourceDocument) -> Result<UpsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO source_documents
                (id, title, document_type, source_url, organization, jurisdiction,
                 authority_level, file_path, page_count, downloaded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(source_url) DO NOTHING
            "#,
        )
        .bind(document.id.to_string())
        .bind(&document.title)
        .bind(document.document_type.as_str())
        .bind(&document.source_url)
        .bind(&document.organization)
        .bind(&document.jurisdiction)
        .bind(document.authority_level.as_str())
        .bind(&document.file_path)
        .bind(document.page_count.map(|v| v as i64))
        .bind(document.downloaded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        if result.rows_affected() > 0 {
            return Ok(UpsertOutcome {
                id: document.id,
                created: true,
            });
        }

        let (id,): (String,) =
            sqlx::query_as("SELECT id FROM source_documents WHERE source_url = ?")
                .bind(&document.source_url)
                .fetch_one(&self.pool)
                .await
                .map_err(HarvestError::storage)?;

        Ok(UpsertOutcome {
            id: parse_uuid(&id)?,
            created: false,
        })
    }

    async fn get_document_by_url(&self, url: &str) -> Result<Option<SourceDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, title, document_type, source_url, organization, jurisdiction,
                   authority_level, file_path, page_count, downloaded_at
            FROM source_documents WHERE source_url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        match row {
            Some(r) => Ok(Some(r.into_document()?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn find_intervention_by_name(&self, name: &str) -> Result<Option<Intervention>> {
        let row = sqlx::query_as::<_, InterventionRow>(
            r#"
            SELECT id, name, description, kind, geography, target_cohort, consent_level,
                   review_status, permitted_uses, source_url, source_date
            FROM interventions WHERE name = ? COLLATE NOCASE
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        match row {
            Some(r) => Ok(Some(r.into_intervention()?)),
            None => Ok(None),
        }
    }

    async fn insert_intervention(&self, intervention: &Intervention) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO interventions
                (id, name, description, kind, geography, target_cohort, consent_level,
                 review_status, permitted_uses, source_url, source_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(intervention.id.to_string())
        .bind(&intervention.name)
        .bind(&intervention.description)
        .bind(&intervention.kind)
        .bind(serde_json::to_string(&intervention.geography)?)
        .bind(serde_json::to_string(&intervention.target_cohort)?)
        .bind(&intervention.consent_level)
        .bind(intervention.review_status.as_str())
        .bind(serde_json::to_string(&intervention.permitted_uses)?)
        .bind(&intervention.source_url)
        .bind(intervention.source_date.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    async fn upsert_entity_source(&self, edge: &EntitySource) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO entity_sources
                (entity_type, entity_id, source_document_id, page_numbers,
                 section_reference, citation_context)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(entity_type, entity_id, source_document_id) DO UPDATE SET
                page_numbers = excluded.page_numbers,
                section_reference = excluded.section_reference,
                citation_context = excluded.citation_context
            "#,
        )
        .bind(&edge.entity_type)
        .bind(edge.entity_id.to_string())
        .bind(edge.source_document_id.to_string())
        .bind(&edge.page_numbers)
        .bind(&edge.section_reference)
        .bind(&edge.citation_context)
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    async fn upsert_content_entity(&self, edge: &ContentEntity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO content_entities
                (raw_content_id, entity_type, entity_id, extraction_method,
                 extraction_confidence)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(raw_content_id, entity_type, entity_id) DO UPDATE SET
                extraction_method = excluded.extraction_method,
                extraction_confidence = excluded.extraction_confidence
            "#,
        )
        .bind(edge.raw_content_id.to_string())
        .bind(&edge.entity_type)
        .bind(edge.entity_id.to_string())
        .bind(&edge.extraction_method)
        .bind(edge.extraction_confidence)
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    async fn count_interventions(&self) -> Result<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interventions")
            .fetch_one(&self.pool)
            .await
            .map_err(HarvestError::storage)?;

        Ok(count.0 as usize)
    }
}

#[async_trait]
impl AuditStore for SqliteStore {
    async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_trail
                (id, timestamp, data_fingerprint, source_url, score, grade, issues,
                 scraper_name, data_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.timestamp.to_rfc3339())
        .bind(&record.data_fingerprint)
        .bind(&record.source_url)
        .bind(record.score as i64)
        .bind(record.grade.as_str())
        .bind(serde_json::to_string(&record.issues)?)
        .bind(&record.scraper_name)
        .bind(&record.data_type)
        .execute(&self.pool)
        .await
        .map_err(HarvestError::storage)?;

        Ok(())
    }

    async fn count_audits(&self) -> Result<usize> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_trail")
            .fetch_one(&self.pool)
            .await
            .map_err(HarvestError::storage)?;

        Ok(count.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_link_roundtrip() {
        let store = test_store().await;
        let link = DiscoveredLink::new("https://www.aihw.gov.au/youth-justice", "seed", 10)
            .with_jurisdiction("National");

        assert!(store.insert_link(&link).await.unwrap());
        assert!(!store.insert_link(&link).await.unwrap());

        let batch = store.pending_batch(10, None).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].url, link.url);
        assert_eq!(batch[0].jurisdiction_hint.as_deref(), Some("National"));
    }

    #[tokio::test]
    async fn test_batch_ordering_and_ceiling() {
        let store = test_store().await;
        for (url, priority) in [
            ("https://a.gov.au/one", 1),
            ("https://a.gov.au/ten", 10),
            ("https://a.gov.au/five", 5),
        ] {
            store
                .insert_link(&DiscoveredLink::new(url, "seed", priority))
                .await
                .unwrap();
        }

        let all = store.pending_batch(10, None).await.unwrap();
        let priorities: Vec<i32> = all.iter().map(|l| l.priority).collect();
        assert_eq!(priorities, vec![10, 5, 1]);

        let capped = store.pending_batch(10, Some(5)).await.unwrap();
        assert_eq!(capped.len(), 2);
        assert!(capped.iter().all(|l| l.priority <= 5));
    }

    #[tokio::test]
    async fn test_mark_link_only_moves_pending() {
        let store = test_store().await;
        let link = DiscoveredLink::new("https://a.gov.au/x", "seed", 5);
        store.insert_link(&link).await.unwrap();

        store
            .mark_link(link.id, LinkStatus::Error, Some("timeout".into()))
            .await
            .unwrap();
        store
            .mark_link(link.id, LinkStatus::Scraped, None)
            .await
            .unwrap();

        assert_eq!(store.count_pending().await.unwrap(), 0);
        let batch = store.pending_batch(10, None).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_content_hash_dedup() {
        let store = test_store().await;
        let first = RawContent::new(
            "https://a.gov.au/x",
            SourceKind::Webpage,
            "same body",
            "firecrawl",
        );
        let second = RawContent::new(
            "https://a.gov.au/y",
            SourceKind::Pdf,
            "same body",
            "pdf-extract",
        );

        let one = store.upsert_content(&first).await.unwrap();
        let two = store.upsert_content(&second).await.unwrap();

        assert!(one.created);
        assert!(!two.created);
        assert_eq!(one.id, two.id);
    }

    #[tokio::test]
    async fn test_document_upsert_by_url() {
        let store = test_store().await;
        let doc = SourceDocument::from_url("https://www.aihw.gov.au/annual-report-2024.pdf");

        let one = store.upsert_document(&doc).await.unwrap();
        let again = SourceDocument::from_url("https://www.aihw.gov.au/annual-report-2024.pdf");
        let two = store.upsert_document(&again).await.unwrap();

        assert!(one.created);
        assert!(!two.created);
        assert_eq!(one.id, two.id);

        let fetched = store
            .get_document_by_url("https://www.aihw.gov.au/annual-report-2024.pdf")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, one.id);
    }

    #[tokio::test]
    async fn test_intervention_name_lookup_is_case_insensitive() {
        let store = test_store().await;
        let entity = Intervention::new(
            "Youth Koori Court",
            "Culturally adapted court process",
            "Diversion",
            "https://www.courts.vic.gov.au",
        )
        .with_geography(vec!["VIC".to_string()]);

        store.insert_intervention(&entity).await.unwrap();

        let found = store
            .find_intervention_by_name("youth koori court")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, entity.id);
        assert_eq!(found.geography, vec!["VIC".to_string()]);
        assert_eq!(found.review_status, ReviewStatus::Approved);
    }

    #[tokio::test]
    async fn test_edge_upserts_are_idempotent() {
        let store = test_store().await;
        let entity_id = Uuid::new_v4();
        let doc_id = Uuid::new_v4();
        let content_id = Uuid::new_v4();

        let source_edge = EntitySource::new("intervention", entity_id, doc_id)
            .with_citation_context("Extracted from https://a.gov.au");
        store.upsert_entity_source(&source_edge).await.unwrap();
        store.upsert_entity_source(&source_edge).await.unwrap();

        let content_edge = ContentEntity::new(content_id, "intervention", entity_id);
        store.upsert_content_entity(&content_edge).await.unwrap();
        store.upsert_content_entity(&content_edge).await.unwrap();

        let (sources,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entity_sources")
            .fetch_one(store.pool())
            .await
            .unwrap();
        let (contents,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content_entities")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(sources, 1);
        assert_eq!(contents, 1);
    }

    #[tokio::test]
    async fn test_audit_append() {
        let store = test_store().await;
        let validation = crate::types::Validation {
            valid: true,
            score: 92,
            issues: vec![],
            grade: Grade::A,
        };
        let record = AuditRecord::new(
            &serde_json::json!({"name": "Program"}),
            &validation,
            Some("https://www.aihw.gov.au".to_string()),
            "link-follower",
            "intervention",
        );

        store.append_audit(&record).await.unwrap();
        assert_eq!(store.count_audits().await.unwrap(), 1);
    }
}
