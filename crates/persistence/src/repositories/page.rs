//! Page repository for database operations.

use domain::models::{NewPage, PageChanges};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PageEntity;
use crate::metrics::{timed, QueryTimer};

const PAGE_COLUMNS: &str =
    "id, name, slug, title, description, is_published, template, created_at, updated_at";

/// Repository for page-related database operations.
#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    /// Creates a new PageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List pages, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pages");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {} FROM pages ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            PAGE_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count all pages.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pages");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a page by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_page_by_id");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {} FROM pages WHERE id = $1",
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a page by slug, optionally restricted to published pages.
    pub async fn find_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_page_by_slug");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {} FROM pages WHERE slug = $1 AND ($2 = false OR is_published = true)",
            PAGE_COLUMNS
        ))
        .bind(slug)
        .bind(published_only)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new page.
    pub async fn create(&self, page: &NewPage) -> Result<PageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            INSERT INTO pages (name, slug, title, description, is_published, template)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(&page.name)
        .bind(&page.slug)
        .bind(&page.title)
        .bind(&page.description)
        .bind(page.is_published)
        .bind(&page.template)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply partial changes to a page. Returns None if the page does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &PageChanges,
    ) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            UPDATE pages SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                is_published = COALESCE($6, is_published),
                template = COALESCE($7, template),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.is_published)
        .bind(&changes.template)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a page together with its components.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        timed("delete_page_cascade", self.delete_cascade_tx(id)).await
    }

    async fn delete_cascade_tx(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM page_components WHERE page_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
